//! Shuffling and train/validation splitting.
//!
//! Shuffling is a separate, seeded step so that a split can be reproduced
//! exactly. Nothing downstream (labeling, serialization) reorders records.

use crate::error::{DataLoadError, Result};
use crate::types::Record;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Shuffle records in place with a seeded RNG
pub fn shuffle_records(records: &mut [Record], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);
    debug!("Shuffled {} records with seed {}", records.len(), seed);
}

/// Split records into (train, validation), keeping order
///
/// The last `validation_fraction` of the records (rounded down) become the
/// validation set.
pub fn train_validation_split(
    records: &[Record],
    validation_fraction: f32,
) -> Result<(Vec<Record>, Vec<Record>)> {
    if !(0.0..=1.0).contains(&validation_fraction) {
        return Err(DataLoadError::InvalidValue {
            field: "validation_fraction".to_string(),
            value: validation_fraction.to_string(),
        });
    }

    let n_validation = (records.len() as f64 * validation_fraction as f64).floor() as usize;
    let (train, validation) = records.split_at(records.len() - n_validation);

    debug!(
        "Split {} records into {} train / {} validation",
        records.len(),
        train.len(),
        validation.len()
    );
    Ok((train.to_vec(), validation.to_vec()))
}
