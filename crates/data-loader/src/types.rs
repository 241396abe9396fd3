//! Core domain types for rating data.
//!
//! A [`Record`] is one observed (user, item, rating) interaction. Records are
//! created by the parser and never mutated afterwards; everything else in the
//! workspace is a view derived from a slice of them.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Identifier for a user (1-943 in MovieLens 100k)
pub type UserId = u32;

/// Identifier for a rated item, a movie in MovieLens
pub type ItemId = u32;

// =============================================================================
// Record
// =============================================================================

/// A single rating from a user for an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Rating value, 1.0 to 5.0 for MovieLens
    pub rating: f32,
    /// Unix timestamp when the rating was made, if the source carries one.
    /// Nothing downstream reads it.
    pub timestamp: Option<i64>,
}

impl Record {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f32) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// =============================================================================
// Index bucket entries
// =============================================================================

/// Entry of a user's bucket: an item the user rated and the rating given
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemRating {
    pub item_id: ItemId,
    pub rating: f32,
}

/// Entry of an item's bucket: a user who rated the item and the rating given
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub user_id: UserId,
    pub rating: f32,
}

impl From<&Record> for ItemRating {
    fn from(record: &Record) -> Self {
        Self {
            item_id: record.item_id,
            rating: record.rating,
        }
    }
}

impl From<&Record> for UserRating {
    fn from(record: &Record) -> Self {
        Self {
            user_id: record.user_id,
            rating: record.rating,
        }
    }
}

// =============================================================================
// Binarization
// =============================================================================

/// Binary class of a continuous value: 1.0 if `value > threshold`, else 0.0
///
/// Strictly greater-than. A rating equal to the threshold is class 0.
pub fn binarize(value: f32, threshold: f32) -> f32 {
    if value > threshold { 1.0 } else { 0.0 }
}
