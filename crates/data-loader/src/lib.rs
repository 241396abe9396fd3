//! # Data Loader Crate
//!
//! This crate loads rating interactions (MovieLens `u.data` style files) and
//! reshapes them into per-user and per-item views.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Record, ItemRating, UserRating)
//! - **parser**: Parse tab- or comma-delimited files into records
//! - **index**: Build the user and item rating buckets
//! - **split**: Seeded shuffling and train/validation splitting
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_records, Delimiter, RatingIndex};
//! use std::path::Path;
//!
//! let records = load_records(Path::new("data/ml-100k/u.data"), Delimiter::Tab)?;
//! let index = RatingIndex::build(&records);
//!
//! let rated = index.user_ratings(1).map(|b| b.len()).unwrap_or(0);
//! println!("User 1 rated {} movies", rated);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod split;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{BucketStats, IndexSummary, RatingIndex};
pub use parser::{load_records, parse_records, validate_rating_range, Delimiter};
pub use split::{shuffle_records, train_validation_split};
pub use types::{
    // Type aliases
    UserId,
    ItemId,
    // Core types
    Record,
    ItemRating,
    UserRating,
    // Functions
    binarize,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_then_index() {
        let content = "1\t1\t5\t0\n1\t2\t3\t0\n2\t1\t4\t0\n";
        let records = parse_records(content, Delimiter::Tab, "u.data").unwrap();
        let index = RatingIndex::build(&records);

        assert_eq!(index.counts(), (2, 2, 3));
        assert_eq!(index.user_ratings(1).unwrap().len(), 2);
        assert_eq!(index.item_ratings(1).unwrap().len(), 2);
    }

    #[test]
    fn test_default_index_is_empty() {
        let index = RatingIndex::default();
        let (users, items, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(items, 0);
        assert_eq!(ratings, 0);
    }
}
