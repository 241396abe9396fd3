//! Core trait for anything that scores (user, item) pairs.
//!
//! The baselines implement it directly. A remote model fits behind the same
//! seam by overriding `predict_batch` with a single request.

use crate::error::Result;
use data_loader::{ItemId, UserId};

pub trait Predictor: Send + Sync {
    /// Returns the name of this predictor (for logging and reports)
    fn name(&self) -> &str;

    /// Predict the score `user_id` would give `item_id`
    fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f32>;

    /// Predict a batch of pairs, in order
    ///
    /// Stops at the first failing pair; no partial output is returned.
    fn predict_batch(&self, pairs: &[(UserId, ItemId)]) -> Result<Vec<f32>> {
        pairs
            .iter()
            .map(|&(user_id, item_id)| self.predict(user_id, item_id))
            .collect()
    }
}
