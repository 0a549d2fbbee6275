use serde::{Deserialize, Serialize};

use crate::analytics::{
    breakdown_by, distinct_count, fraud_distribution, fraud_heatmap, fraud_split,
    most_frequent_fraud, scatter, summarize, time_series, CategoryBreakdown, CategoryCount,
    FraudHeatmap, FraudSplit, ScatterProjection, SummaryKpis, TimeBucketStats, NOT_APPLICABLE,
};
use crate::logging::{log, obj, v_num, Domain, Level, ProfileScope};
use crate::record::{Category, Transaction};

/// Narrative panel: headline figures plus the most common fraud context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_transactions: usize,
    pub fraud_transactions: usize,
    pub fraud_rate: f64,
    pub total_amount: f64,
    pub fraud_amount: f64,
    pub unique_locations: usize,
    pub unique_devices: usize,
    pub unique_transaction_types: usize,
    pub most_fraud_location: String,
    pub most_fraud_device: String,
    pub most_fraud_transaction_type: String,
}

impl DashboardSummary {
    pub fn from_records(records: &[Transaction], kpis: &SummaryKpis) -> Self {
        let most = |category| {
            most_frequent_fraud(records, category).unwrap_or_else(|| NOT_APPLICABLE.to_string())
        };
        Self {
            total_transactions: kpis.total,
            fraud_transactions: kpis.fraud_count,
            fraud_rate: kpis.fraud_rate,
            total_amount: kpis.total_amount,
            fraud_amount: kpis.total_fraud_amount,
            unique_locations: distinct_count(records, Category::Location),
            unique_devices: distinct_count(records, Category::Device),
            unique_transaction_types: distinct_count(records, Category::TransactionType),
            most_fraud_location: most(Category::Location),
            most_fraud_device: most(Category::Device),
            most_fraud_transaction_type: most(Category::TransactionType),
        }
    }
}

/// Every view the dashboard renders, computed from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub kpis: SummaryKpis,
    pub fraud_split: FraudSplit,
    pub by_transaction_type: Vec<CategoryBreakdown>,
    pub by_device: Vec<CategoryBreakdown>,
    pub fraud_by_device: Vec<CategoryCount>,
    pub time_series: Vec<TimeBucketStats>,
    pub heatmap: FraudHeatmap,
    pub scatter: ScatterProjection,
    pub summary: DashboardSummary,
}

impl DashboardReport {
    pub fn build(records: &[Transaction]) -> Self {
        let _scope =
            ProfileScope::with_context("build_report", &[("rows", v_num(records.len() as f64))]);
        let kpis = summarize(records);
        let summary = DashboardSummary::from_records(records, &kpis);
        let report = Self {
            generated_at: crate::logging::ts_now(),
            fraud_split: fraud_split(records),
            by_transaction_type: breakdown_by(records, Category::TransactionType),
            by_device: breakdown_by(records, Category::Device),
            fraud_by_device: fraud_distribution(records, Category::Device),
            time_series: time_series(records),
            heatmap: fraud_heatmap(records),
            scatter: scatter(records),
            kpis,
            summary,
        };
        log(
            Level::Debug,
            Domain::Aggregate,
            "report_built",
            obj(&[
                ("rows", v_num(report.kpis.total as f64)),
                ("fraud_rate", v_num(report.kpis.fraud_rate)),
                ("time_buckets", v_num(report.time_series.len() as f64)),
                ("locations", v_num(report.heatmap.locations.len() as f64)),
            ]),
        );
        report
    }
}
