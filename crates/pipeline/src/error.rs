//! Errors raised while writing or reading labeled examples.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line parsed as JSON but does not have the expected shape
    #[error("Format error at line {line}: {reason}")]
    Format { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, SerializeError>;
