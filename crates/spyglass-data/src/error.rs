//! Error types for table loading.

use thiserror::Error;

/// Errors raised while loading or serializing the bar table.
///
/// Malformed support/resistance cells never surface here; they degrade
/// to an empty level list at the row.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("unparsable timestamp {value:?} at row {row}")]
    Timestamp { row: usize, value: String },
    #[error("invalid number {value:?} in column '{column}' at row {row}")]
    Number {
        row: usize,
        column: &'static str,
        value: String,
    },
}
