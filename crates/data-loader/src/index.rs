//! RatingIndex building and lookup logic.
//!
//! The index holds two maps built from the same snapshot of records:
//! - user -> (item, rating) pairs the user gave
//! - item -> (user, rating) pairs the item received
//!
//! Buckets keep input order and nothing is deduplicated; repeat ratings of
//! the same (user, item) pair both appear. Key iteration order is unspecified.

use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Per-user and per-item rating buckets over one dataset snapshot
///
/// Read-only once built. If the records change, build a new index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingIndex {
    pub(crate) users: HashMap<UserId, Vec<ItemRating>>,
    pub(crate) items: HashMap<ItemId, Vec<UserRating>>,
}

impl RatingIndex {
    /// Build both maps in a single pass over the records
    pub fn build(records: &[Record]) -> Self {
        let mut users: HashMap<UserId, Vec<ItemRating>> = HashMap::new();
        let mut items: HashMap<ItemId, Vec<UserRating>> = HashMap::new();

        for record in records {
            users
                .entry(record.user_id)
                .or_default()
                .push(ItemRating::from(record));
            items
                .entry(record.item_id)
                .or_default()
                .push(UserRating::from(record));
        }

        debug!(
            "Indexed {} records: {} users, {} items",
            records.len(),
            users.len(),
            items.len()
        );
        Self { users, items }
    }

    /// Build the index with rayon, sharding the records into contiguous
    /// ranges of `shard_size`.
    ///
    /// Partial indexes are merged in shard order, so every bucket ends up
    /// in input order and the result equals [`RatingIndex::build`].
    pub fn build_parallel(records: &[Record], shard_size: usize) -> Self {
        let shard_size = shard_size.max(1);
        let shards: Vec<RatingIndex> = records
            .par_chunks(shard_size)
            .map(RatingIndex::build)
            .collect();

        let mut index = RatingIndex::default();
        for shard in shards {
            index.merge(shard);
        }

        info!(
            "Built rating index from {} records in {} shards",
            records.len(),
            records.len().div_ceil(shard_size)
        );
        index
    }

    /// Append another index's buckets after this one's
    fn merge(&mut self, other: RatingIndex) {
        for (user_id, bucket) in other.users {
            self.users.entry(user_id).or_default().extend(bucket);
        }
        for (item_id, bucket) in other.items {
            self.items.entry(item_id).or_default().extend(bucket);
        }
    }

    /// Ratings given by a user, or `None` if the user never rated anything
    pub fn user_ratings(&self, user_id: UserId) -> Option<&[ItemRating]> {
        self.users.get(&user_id).map(|v| v.as_slice())
    }

    /// Ratings received by an item, or `None` if it was never rated
    pub fn item_ratings(&self, item_id: ItemId) -> Option<&[UserRating]> {
        self.items.get(&item_id).map(|v| v.as_slice())
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.items.contains_key(&item_id)
    }

    /// All user ids, sorted
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All item ids, sorted
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Every user with a non-empty bucket, in no particular order
    pub fn users(&self) -> impl Iterator<Item = (UserId, &[ItemRating])> + '_ {
        self.users.iter().map(|(&id, bucket)| (id, bucket.as_slice()))
    }

    /// Every item with a non-empty bucket, in no particular order
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &[UserRating])> + '_ {
        self.items.iter().map(|(&id, bucket)| (id, bucket.as_slice()))
    }

    /// (users, items, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.users.values().map(|v| v.len()).sum();
        (self.users.len(), self.items.len(), total_ratings)
    }

    /// Bucket-size statistics for exploring the dataset
    pub fn summary(&self) -> IndexSummary {
        let (users, items, ratings) = self.counts();
        IndexSummary {
            users,
            items,
            ratings,
            per_user: BucketStats::from_sizes(self.users.values().map(|v| v.len())),
            per_item: BucketStats::from_sizes(self.items.values().map(|v| v.len())),
        }
    }
}

/// Size distribution of index buckets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BucketStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl BucketStats {
    fn from_sizes(sizes: impl Iterator<Item = usize>) -> Self {
        let mut count = 0usize;
        let mut total = 0usize;
        let mut min = usize::MAX;
        let mut max = 0usize;
        for size in sizes {
            count += 1;
            total += size;
            min = min.min(size);
            max = max.max(size);
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            min,
            max,
            mean: total as f64 / count as f64,
        }
    }
}

/// Overview of a [`RatingIndex`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSummary {
    pub users: usize,
    pub items: usize,
    pub ratings: usize,
    /// Number of ratings each user gave
    pub per_user: BucketStats,
    /// Number of ratings each item received
    pub per_item: BucketStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(1, 10, 5.0),
            Record::new(1, 20, 3.0),
            Record::new(2, 10, 4.0),
            Record::new(3, 30, 2.0),
            Record::new(1, 10, 1.0),
        ]
    }

    #[test]
    fn test_every_record_is_in_both_indexes() {
        let records = sample_records();
        let index = RatingIndex::build(&records);

        for record in &records {
            let user_bucket = index.user_ratings(record.user_id).unwrap();
            assert!(user_bucket.contains(&ItemRating::from(record)));

            let item_bucket = index.item_ratings(record.item_id).unwrap();
            assert!(item_bucket.contains(&UserRating::from(record)));
        }
        assert_eq!(index.counts(), (3, 3, 5));
    }

    #[test]
    fn test_buckets_keep_input_order_and_repeats() {
        let index = RatingIndex::build(&sample_records());

        let user_1: Vec<_> = index
            .user_ratings(1)
            .unwrap()
            .iter()
            .map(|r| (r.item_id, r.rating))
            .collect();
        assert_eq!(user_1, vec![(10, 5.0), (20, 3.0), (10, 1.0)]);

        let item_10: Vec<_> = index
            .item_ratings(10)
            .unwrap()
            .iter()
            .map(|r| (r.user_id, r.rating))
            .collect();
        assert_eq!(item_10, vec![(1, 5.0), (2, 4.0), (1, 1.0)]);
    }

    #[test]
    fn test_unknown_ids_have_no_bucket() {
        let index = RatingIndex::build(&sample_records());
        assert!(index.user_ratings(99).is_none());
        assert!(index.item_ratings(99).is_none());
        assert!(!index.contains_user(99));
        assert!(index.contains_item(30));
    }

    #[test]
    fn test_empty_records() {
        let index = RatingIndex::build(&[]);
        assert_eq!(index.counts(), (0, 0, 0));
        assert_eq!(index.summary().per_user, BucketStats::default());
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let records: Vec<Record> = (0..1000u32)
            .map(|i| Record::new(i % 17, i % 23, (i % 5) as f32 + 1.0))
            .collect();
        let sequential = RatingIndex::build(&records);

        for shard_size in [1, 7, 64, 1000, 5000] {
            assert_eq!(RatingIndex::build_parallel(&records, shard_size), sequential);
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let records = sample_records();
        assert_eq!(RatingIndex::build(&records), RatingIndex::build(&records));
    }

    #[test]
    fn test_summary() {
        let index = RatingIndex::build(&sample_records());
        let summary = index.summary();

        assert_eq!(summary.users, 3);
        assert_eq!(summary.ratings, 5);
        assert_eq!(summary.per_user.min, 1);
        assert_eq!(summary.per_user.max, 3);
        assert!((summary.per_user.mean - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.per_item.max, 3);
    }

    #[test]
    fn test_sorted_id_listings() {
        let index = RatingIndex::build(&sample_records());
        assert_eq!(index.user_ids(), vec![1, 2, 3]);
        assert_eq!(index.item_ids(), vec![10, 20, 30]);
    }

    #[test]
    fn test_bucket_iterators_cover_every_id() {
        let records = vec![
            Record::new(1, 10, 4.0),
            Record::new(2, 10, 2.0),
            Record::new(1, 20, 5.0),
        ];
        let index = RatingIndex::build(&records);

        let mut users: Vec<(UserId, usize)> = index.users().map(|(id, b)| (id, b.len())).collect();
        users.sort_unstable();
        assert_eq!(users, vec![(1, 2), (2, 1)]);

        let mut items: Vec<(ItemId, usize)> = index.items().map(|(id, b)| (id, b.len())).collect();
        items.sort_unstable();
        assert_eq!(items, vec![(10, 2), (20, 1)]);
        assert!(index.users().all(|(_, b)| !b.is_empty()));
    }
}
