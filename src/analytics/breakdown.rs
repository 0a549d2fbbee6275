use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::record::{Category, FraudFlag, Transaction};

/// Display sentinel for a "most frequent" lookup over zero fraud records.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub fraud_count: usize,
    pub legitimate_count: usize,
    /// Records in this group whose flag is neither "1" nor "0".
    pub unrecognized_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Index of each distinct value in first-appearance order.
struct FirstSeen<'a, T> {
    index: HashMap<&'a str, usize>,
    entries: Vec<(&'a str, T)>,
}

impl<'a, T: Default> FirstSeen<'a, T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &'a str) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key, T::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }
}

/// Fraud vs. legitimate counts per category value, ordered by first appearance.
pub fn breakdown_by(records: &[Transaction], category: Category) -> Vec<CategoryBreakdown> {
    let mut groups: FirstSeen<(usize, usize, usize)> = FirstSeen::new();
    for tx in records {
        let counts = groups.entry(category.value(tx));
        match tx.flag() {
            FraudFlag::Fraud => counts.0 += 1,
            FraudFlag::Legitimate => counts.1 += 1,
            FraudFlag::Unrecognized => counts.2 += 1,
        }
    }
    groups
        .entries
        .into_iter()
        .map(|(key, (fraud, legit, other))| CategoryBreakdown {
            category: key.to_string(),
            fraud_count: fraud,
            legitimate_count: legit,
            unrecognized_count: other,
        })
        .collect()
}

fn fraud_counts<'a>(records: &'a [Transaction], category: Category) -> FirstSeen<'a, usize> {
    let mut counts: FirstSeen<usize> = FirstSeen::new();
    for tx in records.iter().filter(|tx| tx.is_fraud()) {
        *counts.entry(category.value(tx)) += 1;
    }
    counts
}

/// Fraud count per category value, dropping values with no fraud at all.
pub fn fraud_distribution(records: &[Transaction], category: Category) -> Vec<CategoryCount> {
    let mut seen: FirstSeen<usize> = FirstSeen::new();
    for tx in records {
        let count = seen.entry(category.value(tx));
        if tx.is_fraud() {
            *count += 1;
        }
    }
    seen.entries
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(key, count)| CategoryCount {
            category: key.to_string(),
            count,
        })
        .collect()
}

/// Category value with the most fraud records.
///
/// Ties go to the value seen first in the input: the scan only replaces the
/// current best on a strictly greater count. `None` when nothing is fraud.
pub fn most_frequent_fraud(records: &[Transaction], category: Category) -> Option<String> {
    let counts = fraud_counts(records, category);
    let mut best: Option<(&str, usize)> = None;
    for (key, count) in counts.entries {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key.to_string())
}

pub fn distinct_count(records: &[Transaction], category: Category) -> usize {
    records
        .iter()
        .map(|tx| category.value(tx))
        .collect::<HashSet<_>>()
        .len()
}
