use serde::{Deserialize, Serialize};

use super::percentage;
use crate::record::{FraudFlag, Transaction};

/// Headline numbers for the KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryKpis {
    pub total: usize,
    pub fraud_count: usize,
    /// Percent of all records flagged "1"; 0.0 for an empty dataset.
    pub fraud_rate: f64,
    pub total_fraud_amount: f64,
    pub total_amount: f64,
}

pub fn summarize(records: &[Transaction]) -> SummaryKpis {
    let mut kpis = SummaryKpis {
        total: records.len(),
        ..Default::default()
    };
    for tx in records {
        let amount = tx.amount_value();
        kpis.total_amount += amount;
        if tx.is_fraud() {
            kpis.fraud_count += 1;
            kpis.total_fraud_amount += amount;
        }
    }
    kpis.fraud_rate = percentage(kpis.fraud_count, kpis.total);
    kpis
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitBucket {
    pub count: usize,
    pub percentage: f64,
}

/// Two-bucket fraud/legitimate split.
///
/// Percentages are taken against the full record count, so records whose flag
/// is neither "1" nor "0" lower both percentages without appearing in either
/// bucket. They are reported in `unrecognized` so the gap is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudSplit {
    pub fraud: SplitBucket,
    pub legitimate: SplitBucket,
    pub unrecognized: usize,
    pub total: usize,
}

pub fn fraud_split(records: &[Transaction]) -> FraudSplit {
    let (mut fraud, mut legitimate, mut unrecognized) = (0usize, 0usize, 0usize);
    for tx in records {
        match tx.flag() {
            FraudFlag::Fraud => fraud += 1,
            FraudFlag::Legitimate => legitimate += 1,
            FraudFlag::Unrecognized => unrecognized += 1,
        }
    }
    let total = records.len();
    FraudSplit {
        fraud: SplitBucket {
            count: fraud,
            percentage: percentage(fraud, total),
        },
        legitimate: SplitBucket {
            count: legitimate,
            percentage: percentage(legitimate, total),
        },
        unrecognized,
        total,
    }
}
