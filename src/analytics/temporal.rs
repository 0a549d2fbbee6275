use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::percentage;
use crate::record::{parse_hour, Transaction};

/// Hour-of-day grouping key.
///
/// Text that parses as an hour is keyed by the number, so "7" and "07" land in
/// one bucket. Anything else keeps its raw (trimmed) text and sorts after
/// every numeric bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBucket {
    Hour(i64),
    Unparsed(String),
}

impl TimeBucket {
    pub fn of(raw: &str) -> Self {
        match parse_hour(raw) {
            Some(h) => TimeBucket::Hour(h),
            None => TimeBucket::Unparsed(raw.trim().to_string()),
        }
    }

    pub fn hour(&self) -> Option<i64> {
        match self {
            TimeBucket::Hour(h) => Some(*h),
            TimeBucket::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Hour(h) => write!(f, "{}:00", h),
            TimeBucket::Unparsed(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucketStats {
    /// Display label, "H:00" for numeric buckets.
    pub label: String,
    pub hour: Option<i64>,
    pub count: usize,
    pub fraud_count: usize,
    pub fraud_rate: f64,
    pub fraud_amount: f64,
}

#[derive(Default)]
struct BucketAcc {
    count: usize,
    fraud_count: usize,
    fraud_amount: f64,
}

/// Per-hour counts, fraud rate and fraud amount in ascending hour order.
pub fn time_series(records: &[Transaction]) -> Vec<TimeBucketStats> {
    let mut buckets: BTreeMap<TimeBucket, BucketAcc> = BTreeMap::new();
    for tx in records {
        let acc = buckets.entry(TimeBucket::of(&tx.time)).or_default();
        acc.count += 1;
        if tx.is_fraud() {
            acc.fraud_count += 1;
            acc.fraud_amount += tx.amount_value();
        }
    }
    buckets
        .into_iter()
        .map(|(bucket, acc)| TimeBucketStats {
            label: bucket.to_string(),
            hour: bucket.hour(),
            count: acc.count,
            fraud_count: acc.fraud_count,
            fraud_rate: percentage(acc.fraud_count, acc.count),
            fraud_amount: acc.fraud_amount,
        })
        .collect()
}

/// Fraud amount per (location, hour) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudHeatmap {
    /// Row keys, first-appearance order.
    pub locations: Vec<String>,
    /// Column labels, ascending hour order.
    pub time_slots: Vec<String>,
    /// `cells[row][col]` for `locations[row]` × `time_slots[col]`.
    pub cells: Vec<Vec<f64>>,
    /// Largest cell; 0.0 when every cell is 0.
    pub max_value: f64,
}

impl FraudHeatmap {
    /// Cell value scaled to [0, 1] against `max_value`; 0.0 when the matrix is empty.
    pub fn intensity(&self, value: f64) -> f64 {
        if self.max_value > 0.0 {
            value / self.max_value
        } else {
            0.0
        }
    }

    pub fn cell(&self, location: &str, time_slot: &str) -> Option<f64> {
        let row = self.locations.iter().position(|l| l == location)?;
        let col = self.time_slots.iter().position(|t| t == time_slot)?;
        self.cells.get(row)?.get(col).copied()
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}

pub fn fraud_heatmap(records: &[Transaction]) -> FraudHeatmap {
    let mut locations: Vec<&str> = Vec::new();
    let mut row_of: HashMap<&str, usize> = HashMap::new();
    let mut slots: BTreeSet<TimeBucket> = BTreeSet::new();
    for tx in records {
        if !row_of.contains_key(tx.location.as_str()) {
            row_of.insert(tx.location.as_str(), locations.len());
            locations.push(tx.location.as_str());
        }
        slots.insert(TimeBucket::of(&tx.time));
    }
    let slots: Vec<TimeBucket> = slots.into_iter().collect();
    let col_of: BTreeMap<&TimeBucket, usize> =
        slots.iter().enumerate().map(|(i, b)| (b, i)).collect();

    let mut cells = vec![vec![0.0; slots.len()]; locations.len()];
    for tx in records.iter().filter(|tx| tx.is_fraud()) {
        let bucket = TimeBucket::of(&tx.time);
        if let (Some(&row), Some(&col)) = (row_of.get(tx.location.as_str()), col_of.get(&bucket)) {
            cells[row][col] += tx.amount_value();
        }
    }

    let max_value = cells
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);

    FraudHeatmap {
        locations: locations.into_iter().map(str::to_string).collect(),
        time_slots: slots.iter().map(ToString::to_string).collect(),
        cells,
        max_value,
    }
}
