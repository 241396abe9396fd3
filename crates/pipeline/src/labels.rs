//! Turning records into labeled examples.
//!
//! Regression keeps the raw rating as the label. Classification binarizes
//! it: a rating strictly greater than the threshold is class 1, anything
//! else (including a rating equal to the threshold) is class 0.
//!
//! The threshold is always passed in by the caller. Training and evaluation
//! must binarize with the same value or their class balance will disagree.

use data_loader::{binarize, ItemId, Record, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A record projected onto one learning task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// The raw rating for regression, 0.0 or 1.0 for classification
    pub label: f32,
}

pub fn to_regression_label(record: &Record) -> LabeledExample {
    LabeledExample {
        user_id: record.user_id,
        item_id: record.item_id,
        label: record.rating,
    }
}

pub fn to_classification_label(record: &Record, threshold: f32) -> LabeledExample {
    LabeledExample {
        user_id: record.user_id,
        item_id: record.item_id,
        label: binarize(record.rating, threshold),
    }
}

/// Which labels to derive from records
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelTask {
    Regression,
    Classification { threshold: f32 },
}

impl LabelTask {
    pub fn label(&self, record: &Record) -> LabeledExample {
        match *self {
            LabelTask::Regression => to_regression_label(record),
            LabelTask::Classification { threshold } => to_classification_label(record, threshold),
        }
    }

    /// Label every record, preserving order
    pub fn apply(&self, records: &[Record]) -> Vec<LabeledExample> {
        let examples: Vec<LabeledExample> = records.iter().map(|r| self.label(r)).collect();
        debug!("Labeled {} records for {:?}", examples.len(), self);
        examples
    }
}

/// (negatives, positives) among binarized examples
///
/// Only meaningful for classification labels; any label other than 1.0
/// counts as negative.
pub fn class_balance(examples: &[LabeledExample]) -> (usize, usize) {
    let positives = examples.iter().filter(|e| e.label == 1.0).count();
    (examples.len() - positives, positives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_label_is_rating() {
        let example = to_regression_label(&Record::new(7, 9, 4.5));
        assert_eq!(
            example,
            LabeledExample {
                user_id: 7,
                item_id: 9,
                label: 4.5
            }
        );
    }

    #[test]
    fn test_classification_is_strictly_greater_than() {
        assert_eq!(to_classification_label(&Record::new(1, 1, 4.0), 3.0).label, 1.0);
        assert_eq!(to_classification_label(&Record::new(1, 1, 3.0), 3.0).label, 0.0);
        assert_eq!(to_classification_label(&Record::new(1, 1, 2.0), 3.0).label, 0.0);
    }

    #[test]
    fn test_threshold_is_respected() {
        let record = Record::new(1, 1, 4.0);
        assert_eq!(to_classification_label(&record, 4.0).label, 0.0);
        assert_eq!(to_classification_label(&record, 3.5).label, 1.0);
    }

    #[test]
    fn test_apply_preserves_order() {
        let records = vec![
            Record::new(1, 10, 5.0),
            Record::new(2, 20, 1.0),
            Record::new(3, 30, 3.0),
        ];
        let examples = LabelTask::Classification { threshold: 3.0 }.apply(&records);

        let triples: Vec<_> = examples
            .iter()
            .map(|e| (e.user_id, e.item_id, e.label))
            .collect();
        assert_eq!(triples, vec![(1, 10, 1.0), (2, 20, 0.0), (3, 30, 0.0)]);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(LabelTask::Regression.apply(&[]).is_empty());
        assert!(LabelTask::Classification { threshold: 3.0 }.apply(&[]).is_empty());
    }

    #[test]
    fn test_class_balance() {
        let records = vec![
            Record::new(1, 1, 5.0),
            Record::new(1, 2, 4.0),
            Record::new(1, 3, 3.0),
        ];
        let examples = LabelTask::Classification { threshold: 3.0 }.apply(&records);
        assert_eq!(class_balance(&examples), (1, 2));
        assert_eq!(class_balance(&[]), (0, 0));
    }
}
