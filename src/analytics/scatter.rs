use serde::{Deserialize, Serialize};

use crate::record::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub amount: f64,
    /// Transactions in the preceding 24h.
    pub frequency: f64,
    pub is_fraud: bool,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterProjection {
    pub fraud: Vec<ScatterPoint>,
    /// Everything not flagged "1", including unrecognized flags.
    pub legitimate: Vec<ScatterPoint>,
}

impl ScatterProjection {
    pub fn len(&self) -> usize {
        self.fraud.len() + self.legitimate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&Transaction> for ScatterPoint {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount_value(),
            frequency: tx.frequency_value(),
            is_fraud: tx.is_fraud(),
            id: tx.transaction_id.clone(),
        }
    }
}

pub fn scatter(records: &[Transaction]) -> ScatterProjection {
    let (fraud, legitimate) = records
        .iter()
        .map(ScatterPoint::from)
        .partition(|p| p.is_fraud);
    ScatterProjection { fraud, legitimate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::tx;

    #[test]
    fn test_scatter_partitions_in_order() {
        let mut a = tx("a", "10.5", "1", "NY", "d", "t", "1");
        a.num_transactions_last_24h = "7".into();
        let b = tx("b", "x", "1", "NY", "d", "t", "0");
        let c = tx("c", "3", "1", "NY", "d", "t", "maybe");
        let d = tx("d", "4", "1", "NY", "d", "t", "1");
        let proj = scatter(&[a, b, c, d]);

        let fraud_ids: Vec<&str> = proj.fraud.iter().map(|p| p.id.as_str()).collect();
        let legit_ids: Vec<&str> = proj.legitimate.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(fraud_ids, vec!["a", "d"]);
        assert_eq!(legit_ids, vec!["b", "c"]);
        assert_eq!(proj.fraud[0].amount, 10.5);
        assert_eq!(proj.fraud[0].frequency, 7.0);
        assert_eq!(proj.legitimate[0].amount, 0.0);
        assert_eq!(proj.len(), 4);
    }

    #[test]
    fn test_scatter_empty() {
        assert!(scatter(&[]).is_empty());
    }
}
