pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod record;
pub mod report;
