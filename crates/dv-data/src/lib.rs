//! Data loading for the dashboard: delimited-text ingestion and configuration

pub mod config;
pub mod parse;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::DashboardConfig;
pub use parse::{parse_reader, parse_str, CsvOptions, LoadedTable, ParseWarning};
pub use sources::{CsvSource, DataSource, TextSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("No header row found in {0}")]
    EmptyInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error(transparent)]
    Core(#[from] dv_core::CoreError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::Config(error.to_string())
    }
}
