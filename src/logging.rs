//! Structured JSON-lines logging.
//!
//! Every record is one JSON object on stderr (stdout carries the report):
//! `{"ts", "run_id", "seq", "lvl", "component", "event", "data"}`.
//! `LOG_LEVEL` sets the minimum level, `LOG_DOMAINS` (comma list or "all")
//! filters by domain, and `LOG_FILE` additionally appends every record to a
//! file.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::parse(&v))
            .unwrap_or(Level::Info)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Load,      // Dataset parsing and profiling
    Fetch,     // HTTP acquisition, retries
    Aggregate, // Analytics runs
    Export,    // CSV/JSON report files
    System,    // Startup, config, shutdown
    Profile,   // Timing scopes
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Load => "load",
            Domain::Fetch => "fetch",
            Domain::Aggregate => "aggregate",
            Domain::Export => "export",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        domain_enabled(std::env::var("LOG_DOMAINS").ok().as_deref(), *self)
    }
}

fn domain_enabled(filter: Option<&str>, domain: Domain) -> bool {
    match filter {
        None | Some("all") | Some("") => true,
        Some(domains) => domains.split(',').any(|d| d.trim() == domain.as_str()),
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

struct RunContext {
    run_id: String,
    file: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let file = std::env::var("LOG_FILE").ok().and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(f) => Some(Mutex::new(BufWriter::new(f))),
                Err(err) => {
                    eprintln!("[log] failed to open {}: {}", path, err);
                    None
                }
            }
        });
        RunContext { run_id, file }
    })
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let ctx = ensure_run_context();
    let line = render(&ctx.run_id, level, domain, event, fields);
    if let Some(file) = &ctx.file {
        if let Ok(mut w) = file.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
    eprintln!("{}", line);
}

fn render(
    run_id: &str,
    level: Level,
    domain: Domain,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_dataset_loaded(source: &str, rows: usize, elapsed_ms: f64) {
    log(
        Level::Info,
        Domain::Load,
        "dataset_loaded",
        obj(&[
            ("source", v_str(source)),
            ("rows", json!(rows)),
            ("elapsed_ms", v_num(elapsed_ms)),
        ]),
    );
}

pub fn log_load_failure(source: &str, error: &str) {
    log(
        Level::Error,
        Domain::Load,
        "dataset_unavailable",
        obj(&[
            ("source", v_str(source)),
            ("error", v_str(error)),
            ("msg", v_str("continuing with an empty dataset")),
        ]),
    );
}

pub fn log_export(format: &str, path: &str, rows: usize) {
    log(
        Level::Info,
        Domain::Export,
        "report_written",
        obj(&[
            ("format", v_str(format)),
            ("path", v_str(path)),
            ("rows", json!(rows)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits elapsed milliseconds at trace level when dropped.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(self.elapsed_ms()));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}
