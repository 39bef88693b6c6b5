//! Binary confusion counts at a fixed decision threshold.

use std::fmt;

use crate::error::{Error, Result};

/// Binarize scores at a threshold (`score >= threshold` → 1, else 0).
///
/// Returns a fresh prediction vector; the input slice is never touched, so
/// callers can keep using their scores afterwards.
#[must_use]
pub fn binarize_at(scores: &[f32], threshold: f32) -> Vec<u8> {
    scores
        .iter()
        .map(|&s| u8::from(s >= threshold))
        .collect()
}

/// The four confusion counts of a binary classifier at one threshold.
///
/// Invariant: the counts sum to the number of samples they were computed
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionCounts {
    /// Samples labeled 1 and predicted 1.
    pub true_positives: u32,
    /// Samples labeled 0 but predicted 1.
    pub false_positives: u32,
    /// Samples labeled 0 and predicted 0.
    pub true_negatives: u32,
    /// Samples labeled 1 but predicted 0.
    pub false_negatives: u32,
}

impl ConfusionCounts {
    /// Count a label/prediction pairing.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length or are empty.
    pub fn from_predictions(labels: &[u8], predictions: &[u8]) -> Result<Self> {
        if labels.len() != predictions.len() {
            return Err(Error::DataLengthMismatch {
                x_len: labels.len(),
                y_len: predictions.len(),
            });
        }

        if labels.is_empty() {
            return Err(Error::EmptyData);
        }

        let mut counts = Self {
            true_positives: 0,
            false_positives: 0,
            true_negatives: 0,
            false_negatives: 0,
        };

        for (&label, &pred) in labels.iter().zip(predictions) {
            match (label != 0, pred != 0) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }

        Ok(counts)
    }

    /// Total number of samples counted.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Positive-class precision, 0 when nothing was predicted positive.
    #[must_use]
    pub fn precision(&self) -> f32 {
        let denom = self.true_positives + self.false_positives;
        if denom == 0 {
            0.0
        } else {
            self.true_positives as f32 / denom as f32
        }
    }

    /// Positive-class recall, 0 when no positives exist.
    #[must_use]
    pub fn recall(&self) -> f32 {
        let denom = self.true_positives + self.false_negatives;
        if denom == 0 {
            0.0
        } else {
            self.true_positives as f32 / denom as f32
        }
    }

    /// Positive-class F1 score, 0 when precision and recall are both 0.
    #[must_use]
    pub fn f1(&self) -> f32 {
        let denom = 2 * self.true_positives + self.false_positives + self.false_negatives;
        if denom == 0 {
            0.0
        } else {
            2.0 * self.true_positives as f32 / denom as f32
        }
    }

    /// 2x2 matrix in row-major (actual, predicted) order:
    /// `[[tn, fp], [fn, tp]]`.
    #[must_use]
    pub const fn to_matrix(&self) -> [[u32; 2]; 2] {
        [
            [self.true_negatives, self.false_positives],
            [self.false_negatives, self.true_positives],
        ]
    }
}

impl fmt::Display for ConfusionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[tn, fp], [fnn, tp]] = self.to_matrix();
        write!(f, "[[{tn} {fp}] [{fnn} {tp}]]")
    }
}
