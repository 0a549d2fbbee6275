use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fraudscope::data::{fetch_dataset, load_dataset, profile_dataset, FileSource, HttpSource};
use fraudscope::error::LoadError;
use fraudscope::export::{write_report, ReportFormat};
use fraudscope::fetch::retry::RetryConfig;
use fraudscope::record::Transaction;
use fraudscope::report::DashboardReport;
use tempfile::TempDir;

const CSV: &str = "\
transaction_id,amount,time,location,device,transaction_type,account_age_days,num_transactions_last_24h,is_fraud
T1,250.00,2,Chicago,Mobile,purchase,120,3,1
T2,40.10,2,Chicago,Desktop,transfer,800,1,0

T3,999.99,14,Miami,ATM,withdrawal,5,9,1
T4,12.00,9,Miami,POS,purchase,300,2,0
";

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        base_delay_ms: 1,
        jitter_factor: 0.0,
        ..RetryConfig::default()
    }
}

/// Serves canned responses in order, repeating the last one, and counts
/// the requests it answered.
fn spawn_http(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let idx = counter.fetch_add(1, Ordering::SeqCst).min(responses.len() - 1);
            let (status, body) = responses[idx];
            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                503 => "Service Unavailable",
                _ => "Status",
            };
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason,
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body.as_bytes());
            let _ = stream.flush();
        }
    });
    (format!("http://{}/fraud.csv", addr), hits)
}

#[tokio::test]
async fn loads_file_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fraud.csv");
    fs::write(&path, CSV).unwrap();

    let records = load_dataset(&FileSource::new(&path)).await;
    assert_eq!(records.len(), 4);
    assert_eq!(records[2].transaction_id, "T3");
    assert_eq!(records[2].device, "ATM");

    let report = DashboardReport::build(&records);
    assert_eq!(report.kpis.fraud_count, 2);
    assert!((report.kpis.total_fraud_amount - 1249.99).abs() < 1e-6);
    assert_eq!(report.summary.most_fraud_location, "Chicago");
}

#[tokio::test]
async fn missing_file_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let source = FileSource::new(dir.path().join("absent.csv"));

    assert!(matches!(fetch_dataset(&source).await, Err(LoadError::Io(_))));
    assert!(load_dataset(&source).await.is_empty());
}

#[tokio::test]
async fn headerless_file_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.csv");
    fs::write(&path, "\n\n").unwrap();
    let source = FileSource::new(&path);

    assert!(matches!(fetch_dataset(&source).await, Err(LoadError::MissingHeader)));
    assert!(load_dataset(&source).await.is_empty());
}

#[tokio::test]
async fn unreachable_http_source_degrades_to_empty() {
    let source =
        HttpSource::new("http://127.0.0.1:9/fraud.csv", Duration::from_secs(2), fast_retry(0))
            .unwrap();
    assert!(load_dataset(&source).await.is_empty());
}

#[tokio::test]
async fn http_source_retries_unavailable_then_loads() {
    let (url, hits) = spawn_http(vec![(503, "busy"), (200, CSV)]);
    let source = HttpSource::new(&url, Duration::from_secs(5), fast_retry(3)).unwrap();

    let records = load_dataset(&source).await;
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].transaction_id, "T1");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn http_not_found_is_not_retried() {
    let (url, hits) = spawn_http(vec![(404, "missing")]);
    let source = HttpSource::new(&url, Duration::from_secs(5), fast_retry(3)).unwrap();

    assert!(matches!(fetch_dataset(&source).await, Err(LoadError::Status(404))));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(load_dataset(&source).await.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn exported_csv_loads_back_identically() {
    let dir = TempDir::new().unwrap();
    let mut records: Vec<Transaction> = fraudscope::data::parse_csv(CSV).unwrap();
    records[0].location = "Austin, TX".to_string();

    let path = write_report(dir.path(), ReportFormat::Csv, &records).unwrap();
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("fraud_report_") && n.ends_with(".csv"))
        .unwrap_or(false));

    let reloaded = load_dataset(&FileSource::new(&path)).await;
    assert_eq!(reloaded, records);
}

#[test]
fn profile_flags_quality_issues() {
    let text = format!("{}T5,abc,3,Miami,POS,purchase,1,1,Y\n", CSV);
    let profile = profile_dataset("inline", &text);
    assert_eq!(profile.row_count, 5);
    assert_eq!(profile.fraud_rows, 2);
    assert_eq!(profile.unparsable_amounts, 1);
    assert_eq!(profile.unrecognized_flags, 1);
    assert!(profile.schema.ok);
}
