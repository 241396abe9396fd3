//! Error types for the data-loader crate.
//!
//! Every failure is raised where it is detected and carries enough context
//! (file, line, field) to point at the offending record.

use thiserror::Error;

/// Errors that can occur while loading, indexing or splitting rating data
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line could not be parsed into a record
    ///
    /// This is the malformed-input case: a field that should be numeric
    /// isn't, or a value is missing.
    #[error("Format error at line {line} in {file}: {reason}")]
    Format {
        file: String,
        line: usize,
        reason: String,
    },

    /// Number of fields in a line is outside the accepted range
    #[error("Expected {min_expected} to {max_expected} fields but found {found} at line {line} in {file}")]
    FieldCountMismatch {
        file: String,
        line: usize,
        min_expected: usize,
        max_expected: usize,
        found: usize,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
