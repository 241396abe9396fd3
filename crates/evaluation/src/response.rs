//! Result shapes returned by prediction services.
//!
//! A service answers either with bare numbers or with objects carrying a
//! `scores` list, whose first element is the predicted value:
//!
//! ```text
//! {"predictions": [3.7, 4.1]}
//! {"predictions": [{"scores": [3.7]}, {"scores": [4.1]}]}
//! [{"scores": [0.82, 0.18], "predicted_label": 1}]
//! ```
//!
//! Both shapes go through [`Score`] so the scorer never cares which one it got.

use crate::error::{EvaluationError, Result};
use serde::{Deserialize, Serialize};

/// One prediction in either of the two shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Value(f64),
    /// Extra fields next to `scores` are ignored
    Scored { scores: Vec<f64> },
}

/// Anything the scorer can read a single number from
///
/// Scores are read as f64 so that service output keeps its full precision
/// up to the threshold comparison.
pub trait Score {
    /// `index` is the position in the batch, used for error reporting
    fn score(&self, index: usize) -> Result<f64>;
}

impl Score for f32 {
    fn score(&self, _index: usize) -> Result<f64> {
        Ok(*self as f64)
    }
}

impl Score for f64 {
    fn score(&self, _index: usize) -> Result<f64> {
        Ok(*self)
    }
}

impl Score for Prediction {
    fn score(&self, index: usize) -> Result<f64> {
        match self {
            Prediction::Value(value) => Ok(*value),
            Prediction::Scored { scores } => {
                scores
                    .first()
                    .copied()
                    .ok_or_else(|| EvaluationError::InvalidPrediction {
                        index,
                        reason: "empty scores list".to_string(),
                    })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Envelope { predictions: Vec<Prediction> },
    List(Vec<Prediction>),
}

/// Parse a service response body into its predictions, in order
///
/// Accepts `{"predictions": [...]}` or a bare JSON array.
pub fn parse_response(body: &str) -> Result<Vec<Prediction>> {
    let parsed: ResponseBody =
        serde_json::from_str(body).map_err(|e| EvaluationError::InvalidResponse(e.to_string()))?;
    Ok(match parsed {
        ResponseBody::Envelope { predictions } => predictions,
        ResponseBody::List(predictions) => predictions,
    })
}

/// Normalize any score shape into plain numbers
pub fn to_scores<P: Score>(predictions: &[P]) -> Result<Vec<f64>> {
    predictions
        .iter()
        .enumerate()
        .map(|(index, p)| p.score(index))
        .collect()
}
