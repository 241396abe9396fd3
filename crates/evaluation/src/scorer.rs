//! Scoring predictions against ground-truth labels.
//!
//! Predictions may be bare numbers or [`Prediction`](crate::response::Prediction)
//! objects; anything implementing [`Score`] works. Inputs must have equal,
//! non-zero length. Sums are accumulated in f64.

use crate::error::{EvaluationError, Result};
use crate::response::{to_scores, Score};
use std::fmt;

fn check_lengths(predictions: usize, labels: usize, what: &str) -> Result<()> {
    if predictions != labels {
        return Err(EvaluationError::LengthMismatch {
            predictions,
            labels,
        });
    }
    if labels == 0 {
        return Err(EvaluationError::EmptyDataset {
            what: what.to_string(),
        });
    }
    Ok(())
}

/// `sum((p_i - l_i)^2) / n`
pub fn mean_squared_error<P: Score>(predictions: &[P], labels: &[f32]) -> Result<f64> {
    check_lengths(predictions.len(), labels.len(), "mean squared error")?;
    let scores = to_scores(predictions)?;

    let total: f64 = scores
        .iter()
        .zip(labels)
        .map(|(&p, &l)| {
            let diff = p - l as f64;
            diff * diff
        })
        .sum();
    Ok(total / labels.len() as f64)
}

pub fn root_mean_squared_error<P: Score>(predictions: &[P], labels: &[f32]) -> Result<f64> {
    mean_squared_error(predictions, labels).map(f64::sqrt)
}

/// Fraction of predictions whose class matches the label
///
/// A prediction is class 1 when `score > threshold` (strictly), else 0.
/// The comparison is done in f64. Labels are expected to be 0.0 or 1.0.
pub fn thresholded_accuracy<P: Score>(
    predictions: &[P],
    labels: &[f32],
    threshold: f64,
) -> Result<f64> {
    check_lengths(predictions.len(), labels.len(), "accuracy")?;
    let scores = to_scores(predictions)?;

    let correct = scores
        .iter()
        .zip(labels)
        .filter(|&(&score, &label)| {
            let class = if score > threshold { 1.0 } else { 0.0 };
            class == label as f64
        })
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// Metrics for one predictor on one validation set
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub predictor: String,
    pub count: usize,
    pub mse: Option<f64>,
    pub rmse: Option<f64>,
    pub accuracy: Option<f64>,
}

impl EvaluationReport {
    pub fn regression<P: Score>(predictor: &str, predictions: &[P], labels: &[f32]) -> Result<Self> {
        let mse = mean_squared_error(predictions, labels)?;
        Ok(Self {
            predictor: predictor.to_string(),
            count: labels.len(),
            mse: Some(mse),
            rmse: Some(mse.sqrt()),
            accuracy: None,
        })
    }

    pub fn classification<P: Score>(
        predictor: &str,
        predictions: &[P],
        labels: &[f32],
        threshold: f64,
    ) -> Result<Self> {
        Ok(Self {
            predictor: predictor.to_string(),
            count: labels.len(),
            mse: None,
            rmse: None,
            accuracy: Some(thresholded_accuracy(predictions, labels, threshold)?),
        })
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} examples:", self.predictor, self.count)?;
        if let Some(mse) = self.mse {
            write!(f, " MSE {:.4}", mse)?;
        }
        if let Some(rmse) = self.rmse {
            write!(f, " RMSE {:.4}", rmse)?;
        }
        if let Some(accuracy) = self.accuracy {
            write!(f, " accuracy {:.4}", accuracy)?;
        }
        Ok(())
    }
}
