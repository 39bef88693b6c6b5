//! Precision-recall metrics: average precision and the threshold-grid
//! PR-curve sampler.
//!
//! # References
//!
//! - Davis, J., & Goadrich, M. (2006). "The relationship between
//!   Precision-Recall and ROC curves." ICML '06.

use tracing::warn;

use crate::error::{Error, Result};
use crate::metrics::confusion::{binarize_at, ConfusionCounts};

/// Average precision: area under the precision-recall curve by the
/// right-hand step rule, `Σ (Rₙ - Rₙ₋₁) · Pₙ` over distinct thresholds.
///
/// # Errors
///
/// Returns an error on empty input, length mismatch, or labels without a
/// positive sample.
pub fn average_precision(labels: &[u8], scores: &[f32]) -> Result<f32> {
    if labels.len() != scores.len() {
        return Err(Error::DataLengthMismatch {
            x_len: labels.len(),
            y_len: scores.len(),
        });
    }

    if labels.is_empty() {
        return Err(Error::EmptyData);
    }

    let positives = labels.iter().filter(|&&y| y != 0).count();
    if positives == 0 {
        return Err(Error::DegenerateLabels(
            "need at least one positive sample".to_string(),
        ));
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ap = 0.0f32;
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut prev_recall = 0.0f32;
    let mut i = 0;

    while i < indices.len() {
        let threshold = scores[indices[i]];

        while i < indices.len() && scores[indices[i]] == threshold {
            if labels[indices[i]] != 0 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let recall = tp as f32 / positives as f32;
        let precision = tp as f32 / (tp + fp) as f32;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }

    Ok(ap.clamp(0.0, 1.0))
}

/// PR-curve samples over a caller-supplied threshold grid.
///
/// All vectors run in parallel, one entry per *retained* threshold.
/// Thresholds whose binarized predictions collapse to a single class are
/// skipped, so the vectors may be shorter than the request; [`requested`]
/// preserves the original grid size for consumers that need it.
///
/// [`requested`]: PrCurveSamples::requested
#[derive(Debug, Clone, PartialEq)]
pub struct PrCurveSamples {
    /// True-positive counts per retained threshold.
    pub true_positives: Vec<u32>,
    /// False-positive counts per retained threshold.
    pub false_positives: Vec<u32>,
    /// True-negative counts per retained threshold.
    pub true_negatives: Vec<u32>,
    /// False-negative counts per retained threshold.
    pub false_negatives: Vec<u32>,
    /// Positive-class precision per retained threshold.
    pub precision: Vec<f32>,
    /// Positive-class recall per retained threshold.
    pub recall: Vec<f32>,
    /// Number of thresholds originally requested (≥ the retained count).
    pub requested: usize,
}

impl PrCurveSamples {
    /// Number of thresholds that survived the degenerate-prediction skip.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.precision.len()
    }
}

/// Sample confusion counts and precision/recall across a threshold grid.
///
/// For each threshold, scores are binarized (`>=` → 1). A threshold that
/// leaves every prediction in one class is skipped with a diagnostic rather
/// than failing; callers must tolerate output shorter than the grid.
///
/// # Errors
///
/// Returns an error on empty input or length mismatch.
pub fn pr_curve_samples(
    labels: &[u8],
    scores: &[f32],
    thresholds: &[f32],
) -> Result<PrCurveSamples> {
    if labels.len() != scores.len() {
        return Err(Error::DataLengthMismatch {
            x_len: labels.len(),
            y_len: scores.len(),
        });
    }

    if labels.is_empty() {
        return Err(Error::EmptyData);
    }

    let mut samples = PrCurveSamples {
        true_positives: Vec::with_capacity(thresholds.len()),
        false_positives: Vec::with_capacity(thresholds.len()),
        true_negatives: Vec::with_capacity(thresholds.len()),
        false_negatives: Vec::with_capacity(thresholds.len()),
        precision: Vec::with_capacity(thresholds.len()),
        recall: Vec::with_capacity(thresholds.len()),
        requested: thresholds.len(),
    };

    for &threshold in thresholds {
        let predictions = binarize_at(scores, threshold);

        let first = predictions[0];
        if predictions.iter().all(|&p| p == first) {
            warn!(
                threshold = f64::from(threshold),
                class = first,
                "binarized predictions collapsed to a single class; skipping threshold"
            );
            continue;
        }

        let counts = ConfusionCounts::from_predictions(labels, &predictions)?;

        samples.true_positives.push(counts.true_positives);
        samples.false_positives.push(counts.false_positives);
        samples.true_negatives.push(counts.true_negatives);
        samples.false_negatives.push(counts.false_negatives);
        samples.precision.push(counts.precision());
        samples.recall.push(counts.recall());
    }

    Ok(samples)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_sampler_never_retains_single_class(
            pairs in prop::collection::vec((0u8..=1, 0.0f32..1.0), 2..48),
            grid in prop::collection::vec(0.0f32..1.0, 1..16),
        ) {
            let (labels, scores): (Vec<u8>, Vec<f32>) = pairs.into_iter().unzip();
            let samples = pr_curve_samples(&labels, &scores, &grid).unwrap();

            prop_assert!(samples.retained() <= samples.requested);
            for i in 0..samples.retained() {
                let predicted_pos = samples.true_positives[i] + samples.false_positives[i];
                let predicted_neg = samples.true_negatives[i] + samples.false_negatives[i];
                prop_assert!(predicted_pos > 0);
                prop_assert!(predicted_neg > 0);
                prop_assert_eq!(
                    (predicted_pos + predicted_neg) as usize,
                    labels.len()
                );
            }
        }
    }
}
