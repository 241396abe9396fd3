//! Baseline predictors used to sanity-check trained models.
//!
//! - [`GlobalMeanPredictor`]: the same constant, the mean training rating,
//!   for every query
//! - [`UserMeanPredictor`]: the mean rating the user gave in training
//! - [`ItemMeanPredictor`]: the mean rating the item received in training
//!
//! The per-user and per-item predictors fail on cold-start ids instead of
//! guessing. Callers that want a fallback wrap them in [`FallbackPredictor`].

use crate::error::{EvaluationError, Result};
use crate::traits::Predictor;
use data_loader::{binarize, ItemId, RatingIndex, Record, UserId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Whether predictors return the continuous mean or a binary class
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionMode {
    Regression,
    /// Binarize with `value > threshold`, the same rule used for labels
    Classification { threshold: f32 },
}

impl PredictionMode {
    pub fn apply(&self, value: f32) -> f32 {
        match *self {
            PredictionMode::Regression => value,
            PredictionMode::Classification { threshold } => binarize(value, threshold),
        }
    }
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(sum, count), v| (sum + v as f64, count + 1));
    if count == 0 {
        None
    } else {
        Some((sum / count as f64) as f32)
    }
}

// Index buckets are never empty
fn bucket_mean(ratings: impl ExactSizeIterator<Item = f32>) -> f32 {
    let count = ratings.len();
    let sum: f64 = ratings.map(|r| r as f64).sum();
    (sum / count as f64) as f32
}

/// Predicts the mean of all training ratings
#[derive(Debug, Clone)]
pub struct GlobalMeanPredictor {
    mean: f32,
    mode: PredictionMode,
}

impl GlobalMeanPredictor {
    /// Fails with `EmptyDataset` when there are no training records
    pub fn fit(records: &[Record], mode: PredictionMode) -> Result<Self> {
        let mean = mean(records.iter().map(|r| r.rating)).ok_or_else(|| {
            EvaluationError::EmptyDataset {
                what: "global mean rating".to_string(),
            }
        })?;
        debug!("Global mean rating over {} records: {:.4}", records.len(), mean);
        Ok(Self { mean, mode })
    }

    /// The unbinarized training mean
    pub fn mean(&self) -> f32 {
        self.mean
    }
}

impl Predictor for GlobalMeanPredictor {
    fn name(&self) -> &str {
        "GlobalMeanPredictor"
    }

    fn predict(&self, _user_id: UserId, _item_id: ItemId) -> Result<f32> {
        Ok(self.mode.apply(self.mean))
    }
}

/// Predicts the mean rating the user gave in training
#[derive(Debug, Clone)]
pub struct UserMeanPredictor {
    means: HashMap<UserId, f32>,
    mode: PredictionMode,
}

impl UserMeanPredictor {
    pub fn fit(index: &RatingIndex, mode: PredictionMode) -> Self {
        let means: HashMap<UserId, f32> = index
            .users()
            .map(|(user_id, bucket)| (user_id, bucket_mean(bucket.iter().map(|r| r.rating))))
            .collect();
        debug!("Fitted mean rating for {} users", means.len());
        Self { means, mode }
    }

    /// The unbinarized mean for a user, if known
    pub fn user_mean(&self, user_id: UserId) -> Option<f32> {
        self.means.get(&user_id).copied()
    }
}

impl Predictor for UserMeanPredictor {
    fn name(&self) -> &str {
        "UserMeanPredictor"
    }

    fn predict(&self, user_id: UserId, _item_id: ItemId) -> Result<f32> {
        self.user_mean(user_id)
            .map(|m| self.mode.apply(m))
            .ok_or(EvaluationError::UnknownUser { user_id })
    }
}

/// Predicts the mean rating the item received in training
#[derive(Debug, Clone)]
pub struct ItemMeanPredictor {
    means: HashMap<ItemId, f32>,
    mode: PredictionMode,
}

impl ItemMeanPredictor {
    pub fn fit(index: &RatingIndex, mode: PredictionMode) -> Self {
        let means: HashMap<ItemId, f32> = index
            .items()
            .map(|(item_id, bucket)| (item_id, bucket_mean(bucket.iter().map(|r| r.rating))))
            .collect();
        debug!("Fitted mean rating for {} items", means.len());
        Self { means, mode }
    }

    pub fn item_mean(&self, item_id: ItemId) -> Option<f32> {
        self.means.get(&item_id).copied()
    }
}

impl Predictor for ItemMeanPredictor {
    fn name(&self) -> &str {
        "ItemMeanPredictor"
    }

    fn predict(&self, _user_id: UserId, item_id: ItemId) -> Result<f32> {
        self.item_mean(item_id)
            .map(|m| self.mode.apply(m))
            .ok_or(EvaluationError::UnknownItem { item_id })
    }
}

/// Uses `primary`, and `fallback` only when `primary` hits a cold-start id
///
/// Other errors from `primary` are returned as-is.
#[derive(Debug, Clone)]
pub struct FallbackPredictor<P, F> {
    primary: P,
    fallback: F,
    name: String,
}

impl<P: Predictor, F: Predictor> FallbackPredictor<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        let name = format!("{}+{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

impl<P: Predictor, F: Predictor> Predictor for FallbackPredictor<P, F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f32> {
        self.predict_counted(user_id, item_id).map(|(score, _)| score)
    }

    /// Same as per-pair `predict`, with a single warning for the whole batch
    fn predict_batch(&self, pairs: &[(UserId, ItemId)]) -> Result<Vec<f32>> {
        let mut fallbacks = 0usize;
        let scores = pairs
            .iter()
            .map(|&(user_id, item_id)| {
                let (score, fell_back) = self.predict_counted(user_id, item_id)?;
                fallbacks += fell_back as usize;
                Ok(score)
            })
            .collect::<Result<Vec<f32>>>()?;
        if fallbacks > 0 {
            warn!(
                "{} of {} pairs were cold starts for {}; used {}",
                fallbacks,
                pairs.len(),
                self.primary.name(),
                self.fallback.name()
            );
        }
        Ok(scores)
    }
}

impl<P: Predictor, F: Predictor> FallbackPredictor<P, F> {
    /// The score, and whether the fallback produced it
    fn predict_counted(&self, user_id: UserId, item_id: ItemId) -> Result<(f32, bool)> {
        match self.primary.predict(user_id, item_id) {
            Ok(score) => Ok((score, false)),
            Err(e) if e.is_cold_start() => {
                debug!("{}; falling back to {}", e, self.fallback.name());
                Ok((self.fallback.predict(user_id, item_id)?, true))
            }
            Err(e) => Err(e),
        }
    }
}
