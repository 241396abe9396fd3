//! # Evaluation Crate
//!
//! Baseline predictors and the metrics used to compare them with a
//! trained model.
//!
//! ## Components
//!
//! ### Predictors
//! - `GlobalMeanPredictor`: one constant for every query
//! - `UserMeanPredictor` / `ItemMeanPredictor`: per-id training means,
//!   failing on cold-start ids
//! - `FallbackPredictor`: explicit cold-start policy combining two predictors
//!
//! ### Scoring
//! - `mean_squared_error` for regression
//! - `thresholded_accuracy` for binary classification
//! - `parse_response` for the two result shapes a prediction service returns
//!
//! ## Example Usage
//!
//! ```ignore
//! use evaluation::{GlobalMeanPredictor, PredictionMode, Predictor, mean_squared_error};
//!
//! let baseline = GlobalMeanPredictor::fit(&train, PredictionMode::Regression)?;
//! let predictions = baseline.predict_batch(&pairs)?;
//! let mse = mean_squared_error(&predictions, &labels)?;
//! ```

pub mod error;
pub mod traits;
pub mod baselines;
pub mod response;
pub mod scorer;

// Re-export commonly used types
pub use error::{EvaluationError, Result};
pub use traits::Predictor;
pub use baselines::{
    FallbackPredictor, GlobalMeanPredictor, ItemMeanPredictor, PredictionMode, UserMeanPredictor,
};
pub use response::{parse_response, to_scores, Prediction, Score};
pub use scorer::{
    mean_squared_error, root_mean_squared_error, thresholded_accuracy, EvaluationReport,
};

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{RatingIndex, Record};

    #[test]
    fn test_baseline_scored_against_itself() {
        let train = vec![
            Record::new(1, 1, 5.0),
            Record::new(1, 2, 3.0),
            Record::new(2, 1, 4.0),
        ];
        let index = RatingIndex::build(&train);
        let predictor = UserMeanPredictor::fit(&index, PredictionMode::Regression);

        let pairs: Vec<_> = train.iter().map(|r| (r.user_id, r.item_id)).collect();
        let labels: Vec<f32> = train.iter().map(|r| r.rating).collect();
        let predictions = predictor.predict_batch(&pairs).unwrap();

        // user 1 mean is 4.0: errors of 1 and -1; user 2 is exact
        let mse = mean_squared_error(&predictions, &labels).unwrap();
        assert!((mse - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_service_response_scored_like_numbers() {
        let predictions = parse_response(r#"{"predictions": [{"scores": [4.0]}, {"scores": [3.0]}]}"#)
            .unwrap();
        assert_eq!(mean_squared_error(&predictions, &[4.0, 5.0]).unwrap(), 2.0);
    }
}
