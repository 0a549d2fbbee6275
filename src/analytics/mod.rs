//! Aggregation engine: pure folds over an immutable transaction snapshot.
//!
//! ```text
//! &[Transaction] ──┬─► summary    (KPIs, fraud/legit split)
//!                  ├─► breakdown  (per-category counts, most frequent fraud)
//!                  ├─► temporal   (hourly series, location × hour matrix)
//!                  └─► scatter    (amount × frequency projection)
//! ```
//!
//! Every function is total: an empty slice produces zero counts, 0.0 rates
//! and `None` for "most frequent" lookups. Nothing here allocates shared
//! state or logs, so all of it is reentrant.

pub mod breakdown;
pub mod scatter;
pub mod summary;
pub mod temporal;

pub use breakdown::{
    breakdown_by, distinct_count, fraud_distribution, most_frequent_fraud, CategoryBreakdown,
    CategoryCount, NOT_APPLICABLE,
};
pub use scatter::{scatter, ScatterPoint, ScatterProjection};
pub use summary::{fraud_split, summarize, FraudSplit, SplitBucket, SummaryKpis};
pub use temporal::{fraud_heatmap, time_series, FraudHeatmap, TimeBucket, TimeBucketStats};

/// `part / total * 100`, or 0.0 when `total` is zero.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::record::Transaction;

    pub fn tx(
        id: &str,
        amount: &str,
        time: &str,
        location: &str,
        device: &str,
        kind: &str,
        is_fraud: &str,
    ) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            amount: amount.to_string(),
            time: time.to_string(),
            location: location.to_string(),
            device: device.to_string(),
            transaction_type: kind.to_string(),
            account_age_days: "100".to_string(),
            num_transactions_last_24h: "3".to_string(),
            is_fraud: is_fraud.to_string(),
        }
    }
}
