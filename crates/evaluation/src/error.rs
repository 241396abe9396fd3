//! Errors raised by predictors and the scorer.

use data_loader::{ItemId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Predictions and labels must pair up one to one
    #[error("Length mismatch: {predictions} predictions for {labels} labels")]
    LengthMismatch { predictions: usize, labels: usize },

    /// A mean was requested over zero values
    #[error("Cannot compute {what} over an empty dataset")]
    EmptyDataset { what: String },

    /// Cold-start user: no ratings in the training index
    #[error("Unknown user {user_id}: no training ratings")]
    UnknownUser { user_id: UserId },

    /// Cold-start item: no ratings in the training index
    #[error("Unknown item {item_id}: no training ratings")]
    UnknownItem { item_id: ItemId },

    /// A prediction could not be turned into a number
    #[error("Invalid prediction at position {index}: {reason}")]
    InvalidPrediction { index: usize, reason: String },

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl EvaluationError {
    /// True for lookups that failed because the id was absent from training data
    pub fn is_cold_start(&self) -> bool {
        matches!(
            self,
            EvaluationError::UnknownUser { .. } | EvaluationError::UnknownItem { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EvaluationError>;
