//! Raw-record export for downloadable reports.

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ExportError;
use crate::logging::log_export;
use crate::record::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

/// Header row plus one line per record; values containing commas or quotes
/// are quoted.
pub fn to_csv(records: &[Transaction]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    for tx in records {
        writer.serialize(tx)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(io::Error::new(e.error().kind(), e.error().to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn to_json(records: &[Transaction]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn render(format: ReportFormat, records: &[Transaction]) -> Result<String, ExportError> {
    match format {
        ReportFormat::Csv => to_csv(records),
        ReportFormat::Json => to_json(records),
    }
}

/// `fraud_report_YYYY-MM-DD.<ext>`
pub fn report_file_name(format: ReportFormat, date: NaiveDate) -> String {
    format!("fraud_report_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Writes today's report into `dir`, creating it if needed.
pub fn write_report(
    dir: &Path,
    format: ReportFormat,
    records: &[Transaction],
) -> Result<PathBuf, ExportError> {
    let body = render(format, records)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(format, Utc::now().date_naive()));
    fs::write(&path, body)?;
    log_export(format.extension(), &path.display().to_string(), records.len());
    Ok(path)
}
