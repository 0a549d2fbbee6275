use serde::{Deserialize, Serialize};

/// Column order of the published dataset and of CSV exports.
pub const EXPECTED_COLUMNS: [&str; 9] = [
    "transaction_id",
    "amount",
    "time",
    "location",
    "device",
    "transaction_type",
    "account_age_days",
    "num_transactions_last_24h",
    "is_fraud",
];

/// One row of the dataset. Every field is kept as the raw text it was loaded
/// from; numeric views are derived on demand with a zero fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub amount: String,
    pub time: String,
    pub location: String,
    pub device: String,
    pub transaction_type: String,
    pub account_age_days: String,
    pub num_transactions_last_24h: String,
    pub is_fraud: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FraudFlag {
    Fraud,
    Legitimate,
    /// Anything other than the literal "1" or "0".
    Unrecognized,
}

impl Transaction {
    pub fn flag(&self) -> FraudFlag {
        match self.is_fraud.as_str() {
            "1" => FraudFlag::Fraud,
            "0" => FraudFlag::Legitimate,
            _ => FraudFlag::Unrecognized,
        }
    }

    pub fn is_fraud(&self) -> bool {
        self.flag() == FraudFlag::Fraud
    }

    pub fn amount_value(&self) -> f64 {
        parse_numeric(&self.amount)
    }

    pub fn frequency_value(&self) -> f64 {
        parse_numeric(&self.num_transactions_last_24h)
    }

    pub fn hour(&self) -> Option<i64> {
        parse_hour(&self.time)
    }

    /// Returns false for unknown column names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "transaction_id" => &mut self.transaction_id,
            "amount" => &mut self.amount,
            "time" => &mut self.time,
            "location" => &mut self.location,
            "device" => &mut self.device,
            "transaction_type" => &mut self.transaction_type,
            "account_age_days" => &mut self.account_age_days,
            "num_transactions_last_24h" => &mut self.num_transactions_last_24h,
            "is_fraud" => &mut self.is_fraud,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Categorical columns the engine can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Location,
    Device,
    TransactionType,
}

impl Category {
    pub fn value<'a>(&self, tx: &'a Transaction) -> &'a str {
        match self {
            Category::Location => &tx.location,
            Category::Device => &tx.device,
            Category::TransactionType => &tx.transaction_type,
        }
    }

}

/// Decimal parse with a zero fallback for empty, malformed or non-finite text.
pub fn parse_numeric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Integer-prefix parse: optional sign then leading digits ("07" and "7h" are 7).
pub fn parse_hour(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value = rest[..digits_end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
