//! Error types for gc-io.

use thiserror::Error;

/// Errors that can occur while reading inputs or writing results.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record violates the input contract (missing or unparsable field,
    /// negative weight, unknown node reference).  `record` is 0-based and
    /// excludes the header row.
    #[error("malformed record {record}: {reason}")]
    Malformed { record: usize, reason: String },
}

/// Alias for `Result<T, DataError>`.
pub type DataResult<T> = Result<T, DataError>;
