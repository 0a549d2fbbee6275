use fraudscope::data::{default_manifest_path, profile_dataset};
use fraudscope::record::EXPECTED_COLUMNS;
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/fraud_dataset.csv".to_string());
    let path = PathBuf::from(path);

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("failed to read {}: {}", path.display(), err);
            std::process::exit(1);
        }
    };

    let profile = profile_dataset(&path.display().to_string(), &text);
    if !profile.schema.ok {
        eprintln!("{}", profile.schema.message);
        eprintln!("expected columns: {:?}", EXPECTED_COLUMNS);
        std::process::exit(2);
    }

    eprintln!(
        "data_quality rows={} fraud_rows={} short_rows={} bad_amounts={} unrecognized_flags={}",
        profile.row_count,
        profile.fraud_rows,
        profile.short_rows,
        profile.unparsable_amounts,
        profile.unrecognized_flags
    );

    let out_path = default_manifest_path(&path);
    let payload = json!({ "manifest": profile });
    let body = match serde_json::to_string_pretty(&payload) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(4);
        }
    };
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());
}
