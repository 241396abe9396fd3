//! Pipeline from loaded records to trainer-ready files.
//!
//! This crate provides:
//! - Label derivation for regression and binary classification
//! - JSON lines serialization of labeled examples (and reading them back)
//! - The request body for scoring examples against a prediction service
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{LabelTask, write_json_lines_to_path};
//!
//! let task = LabelTask::Classification { threshold: 3.0 };
//! let train = task.apply(&train_records);
//! let validation = task.apply(&validation_records);
//!
//! write_json_lines_to_path(Path::new("out/train.jsonl"), &train)?;
//! write_json_lines_to_path(Path::new("out/validation.jsonl"), &validation)?;
//! ```

pub mod error;
pub mod labels;
pub mod serializer;

// Re-export main types
pub use error::{Result, SerializeError};
pub use data_loader::binarize;
pub use labels::{
    class_balance, to_classification_label, to_regression_label, LabelTask,
    LabeledExample,
};
pub use serializer::{
    inference_payload, read_json_lines, read_json_lines_from_path, write_json_lines,
    write_json_lines_to_path,
};
