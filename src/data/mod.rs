//! Dataset loading: CSV decoding, data-quality profiling and sources.

pub mod source;

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::record::{FraudFlag, Transaction, EXPECTED_COLUMNS};

pub use source::{fetch_dataset, load_dataset, source_for, DatasetSource, FileSource, HttpSource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub expected: Vec<String>,
    pub missing: Vec<String>,
    pub ok: bool,
    pub message: String,
}

/// Data-quality manifest for one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub source: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub columns: Vec<String>,
    pub schema: SchemaReport,
    /// Rows with fewer values than header columns; the gaps load as "".
    pub short_rows: u64,
    /// Non-empty amounts that fall back to 0.
    pub unparsable_amounts: u64,
    /// Fraud flags other than "1"/"0"; such rows sit in neither bucket.
    pub unrecognized_flags: u64,
    pub fraud_rows: u64,
    pub warnings: Vec<String>,
    pub generated_at: String,
}

struct Table {
    header: Vec<String>,
    rows: Vec<StringRecord>,
}

/// Decodes one physical line; quoting never spans a line break.
fn read_line(builder: &ReaderBuilder, line: &str) -> Result<Option<StringRecord>, LoadError> {
    let mut reader = builder.from_reader(line.as_bytes());
    Ok(reader.records().next().transpose()?)
}

fn read_table(text: &str) -> Result<Table, LoadError> {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(record) = read_line(&builder, line)? else {
            continue;
        };
        match header {
            None => {
                header = Some(
                    record
                        .iter()
                        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                        .collect(),
                );
            }
            Some(_) => rows.push(record),
        }
    }
    let header = header.ok_or(LoadError::MissingHeader)?;
    Ok(Table { header, rows })
}

fn to_transaction(header: &[String], row: &StringRecord) -> Transaction {
    let mut tx = Transaction::default();
    for (idx, name) in header.iter().enumerate() {
        let value = row.get(idx).unwrap_or("");
        tx.set_field(name, value.to_string());
    }
    tx
}

/// Decodes delimited text into records.
///
/// The first non-blank line names the columns; later lines map onto them by
/// position. Missing trailing values and absent columns load as empty strings,
/// extra values and unknown columns are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<Transaction>, LoadError> {
    let table = read_table(text)?;
    Ok(table
        .rows
        .iter()
        .map(|row| to_transaction(&table.header, row))
        .collect())
}

pub fn validate_schema(columns: &[String]) -> SchemaReport {
    let expected: Vec<String> = EXPECTED_COLUMNS.iter().map(|s| s.to_string()).collect();
    let missing: Vec<String> = expected
        .iter()
        .filter(|c| !columns.contains(c))
        .cloned()
        .collect();
    let ok = missing.is_empty();
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("schema mismatch: missing {:?}", missing)
    };
    SchemaReport {
        columns: columns.to_vec(),
        expected,
        missing,
        ok,
        message,
    }
}

pub fn profile_dataset(source: &str, text: &str) -> DatasetProfile {
    let hash_sha256 = sha256_hex(text.as_bytes());
    let mut warnings = Vec::new();
    let table = match read_table(text) {
        Ok(t) => t,
        Err(err) => {
            warnings.push(format!("unreadable: {}", err));
            Table {
                header: Vec::new(),
                rows: Vec::new(),
            }
        }
    };

    let schema = validate_schema(&table.header);
    if !schema.ok {
        warnings.push(schema.message.clone());
    }

    let (mut short_rows, mut unparsable_amounts, mut unrecognized_flags, mut fraud_rows) =
        (0u64, 0u64, 0u64, 0u64);
    for (line, row) in table.rows.iter().enumerate() {
        if row.len() < table.header.len() {
            short_rows += 1;
        }
        let tx = to_transaction(&table.header, row);
        let amount = tx.amount.trim();
        if !amount.is_empty() && !amount.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
            unparsable_amounts += 1;
            warnings.push(format!("bad_amount: row={} value={:?}", line + 1, tx.amount));
        }
        match tx.flag() {
            FraudFlag::Fraud => fraud_rows += 1,
            FraudFlag::Legitimate => {}
            FraudFlag::Unrecognized => {
                unrecognized_flags += 1;
                warnings.push(format!(
                    "unrecognized_flag: row={} value={:?}",
                    line + 1,
                    tx.is_fraud
                ));
            }
        }
    }
    if short_rows > 0 {
        warnings.push(format!("short_rows: {}", short_rows));
    }

    DatasetProfile {
        source: source.to_string(),
        hash_sha256,
        row_count: table.rows.len() as u64,
        columns: table.header,
        schema,
        short_rows,
        unparsable_amounts,
        unrecognized_flags,
        fraud_rows,
        warnings,
        generated_at: Utc::now().to_rfc3339(),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "transaction_id,amount,time,location,device,transaction_type,account_age_days,num_transactions_last_24h,is_fraud";

    #[test]
    fn test_parse_maps_by_header_position() {
        let text = format!("{}\nT1,120.5,3,NY,Mobile,purchase,40,2,1\n", HEADER);
        let rows = parse_csv(&text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_id, "T1");
        assert_eq!(rows[0].amount, "120.5");
        assert_eq!(rows[0].is_fraud, "1");
    }

    #[test]
    fn test_parse_respects_reordered_columns() {
        let text = "is_fraud,location,amount\n0,LA,5\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows[0].location, "LA");
        assert_eq!(rows[0].amount, "5");
        assert_eq!(rows[0].device, "");
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let text = format!("{}\r\n\r\n T1 , 10 ,1,NY,ATM,withdrawal,1,1, 0 \r\n   \n", HEADER);
        let rows = parse_csv(&text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_id, "T1");
        assert_eq!(rows[0].amount, "10");
        assert_eq!(rows[0].is_fraud, "0");
    }

    #[test]
    fn test_short_row_fills_empty() {
        let text = format!("{}\nT1,10,4\n", HEADER);
        let rows = parse_csv(&text).unwrap();
        assert_eq!(rows[0].time, "4");
        assert_eq!(rows[0].location, "");
        assert_eq!(rows[0].is_fraud, "");
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        let text = "transaction_id,location,is_fraud\nT1,\"Austin, TX\",1\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows[0].location, "Austin, TX");
        assert_eq!(rows[0].is_fraud, "1");
    }

    #[test]
    fn test_unbalanced_quote_stays_on_its_line() {
        let text = format!(
            "{}\nT1,10,1,\"NY,Mobile,purchase,1,1,1\nT2,20,2,LA,ATM,withdrawal,5,1,0\nT3,30,3,SF,POS,purchase,9,2,1\n",
            HEADER
        );
        let rows = parse_csv(&text).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
        assert!(!rows[0].location.contains('\n'));
        assert_eq!(rows[1].location, "LA");
        assert_eq!(rows[2].is_fraud, "1");

        let profile = profile_dataset("inline", &text);
        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.fraud_rows, 1);
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse_csv(""), Err(LoadError::MissingHeader)));
        assert!(matches!(parse_csv("\n  \n"), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        assert!(parse_csv(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_schema_reports_missing_columns() {
        let cols: Vec<String> = vec!["transaction_id".into(), "amount".into()];
        let report = validate_schema(&cols);
        assert!(!report.ok);
        assert!(report.missing.contains(&"is_fraud".to_string()));

        let full: Vec<String> = EXPECTED_COLUMNS.iter().map(|s| s.to_string()).collect();
        assert!(validate_schema(&full).ok);
    }

    #[test]
    fn test_profile_counts_quality_issues() {
        let text = format!(
            "{}\nT1,abc,1,NY,Mobile,p,1,1,1\nT2,10,1,NY,Mobile,p,1,1,maybe\nT3,5,2\n",
            HEADER
        );
        let profile = profile_dataset("inline", &text);
        assert_eq!(profile.row_count, 3);
        assert!(profile.schema.ok);
        assert_eq!(profile.unparsable_amounts, 1);
        assert_eq!(profile.unrecognized_flags, 2);
        assert_eq!(profile.short_rows, 1);
        assert_eq!(profile.fraud_rows, 1);
        assert_eq!(profile.hash_sha256, sha256_hex(text.as_bytes()));
    }

    #[test]
    fn test_profile_of_empty_payload() {
        let profile = profile_dataset("inline", "");
        assert_eq!(profile.row_count, 0);
        assert!(!profile.schema.ok);
        assert!(profile.warnings.iter().any(|w| w.starts_with("unreadable")));
    }

    #[test]
    fn test_manifest_path() {
        let p = default_manifest_path(Path::new("/data/fraud.csv"));
        assert_eq!(p, PathBuf::from("/data/fraud.csv.manifest.json"));
    }
}
