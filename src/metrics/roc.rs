//! ROC curve computation: curve points, AUC, Equal Error Rate, and the
//! balanced operating threshold.
//!
//! # References
//!
//! - Fawcett, T. (2006). "An introduction to ROC analysis." Pattern
//!   Recognition Letters, 27(8), 861-874.

use crate::error::{Error, Result};

/// Bisection tolerance for the Equal Error Rate root search.
const EER_TOLERANCE: f32 = 1e-6;

/// A point on the ROC curve.
#[derive(Debug, Clone, Copy)]
pub struct RocPoint {
    /// False-positive rate in [0, 1].
    pub fpr: f32,
    /// True-positive rate in [0, 1].
    pub tpr: f32,
    /// Score threshold that produced this point.
    pub threshold: f32,
}

/// Full result of a ROC evaluation.
#[derive(Debug, Clone)]
pub struct RocReport {
    /// Curve points ordered by decreasing threshold (non-decreasing fpr).
    pub points: Vec<RocPoint>,
    /// Area under the curve (trapezoidal rule).
    pub auc: f32,
    /// Equal Error Rate: the fpr where `1 - tpr(fpr) == fpr` on the
    /// interpolated curve.
    pub eer: f32,
    /// The original score threshold minimizing `|tpr - (1 - fpr)|`.
    ///
    /// A convenience operating point selected by nearest match on the
    /// computed curve; not the EER solution.
    pub balanced_threshold: f32,
}

impl RocReport {
    /// Compute the ROC curve and its derived quantities.
    ///
    /// # Errors
    ///
    /// Returns an error on empty input, length mismatch, or single-class
    /// labels.
    pub fn compute(labels: &[u8], scores: &[f32]) -> Result<Self> {
        let points = roc_points(labels, scores)?;
        let auc = trapezoid_area(&points);
        let eer = equal_error_rate(&points);
        let balanced_threshold = balanced_threshold(&points);

        Ok(Self {
            points,
            auc,
            eer,
            balanced_threshold,
        })
    }

    /// The threshold sequence backing the curve, one per point.
    #[must_use]
    pub fn thresholds(&self) -> Vec<f32> {
        self.points.iter().map(|p| p.threshold).collect()
    }
}

/// Compute ROC curve points over all distinct score thresholds.
///
/// The curve starts at (0, 0) under a synthetic threshold above the maximum
/// score; tied scores are grouped so each distinct score contributes exactly
/// one point.
pub fn roc_points(labels: &[u8], scores: &[f32]) -> Result<Vec<RocPoint>> {
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
    let negatives = labels.len() - positives;

    if positives == 0 || negatives == 0 {
        return Err(Error::DegenerateLabels(
            "need both positive and negative samples".to_string(),
        ));
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let max_score = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut points = Vec::with_capacity(scores.len() + 1);
    points.push(RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: max_score + 1.0,
    });

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;

    while i < indices.len() {
        let threshold = scores[indices[i]];

        // Consume the whole run of tied scores before emitting a point.
        while i < indices.len() && scores[indices[i]] == threshold {
            if labels[indices[i]] != 0 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        points.push(RocPoint {
            fpr: fp as f32 / negatives as f32,
            tpr: tp as f32 / positives as f32,
            threshold,
        });
    }

    Ok(points)
}

/// Area under the curve by the trapezoidal rule, clamped to [0, 1].
#[must_use]
pub fn trapezoid_area(points: &[RocPoint]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut area = 0.0;
    for pair in points.windows(2) {
        let dx = pair[1].fpr - pair[0].fpr;
        let avg_y = (pair[1].tpr + pair[0].tpr) / 2.0;
        area += dx * avg_y;
    }

    area.clamp(0.0, 1.0)
}

/// True-positive rate at an arbitrary false-positive rate, linearly
/// interpolated between curve points.
///
/// At an fpr shared by several points (a vertical segment of the step
/// curve), the topmost tpr is used.
fn interpolated_tpr(points: &[RocPoint], x: f32) -> f32 {
    // Last point at or below x; duplicates resolve to the top of the run.
    let mut lower = 0;
    for (i, p) in points.iter().enumerate() {
        if p.fpr <= x {
            lower = i;
        } else {
            break;
        }
    }

    if (points[lower].fpr - x).abs() < f32::EPSILON || lower + 1 >= points.len() {
        return points[lower].tpr;
    }

    let a = points[lower];
    let b = points[lower + 1];
    let span = b.fpr - a.fpr;
    if span <= f32::EPSILON {
        return b.tpr;
    }

    a.tpr + (b.tpr - a.tpr) * (x - a.fpr) / span
}

/// Equal Error Rate by bisection of `f(x) = 1 - x - tpr(x)` on [0, 1].
///
/// `f` is strictly decreasing, `f(0) >= 0` and `f(1) <= 0`, so the root is
/// unique.
#[must_use]
pub fn equal_error_rate(points: &[RocPoint]) -> f32 {
    let f = |x: f32| 1.0 - x - interpolated_tpr(points, x);

    if f(0.0) <= 0.0 {
        return 0.0;
    }

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;

    while hi - lo > EER_TOLERANCE {
        let mid = (lo + hi) / 2.0;
        if f(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    (lo + hi) / 2.0
}

/// The curve point's threshold minimizing `|tpr - (1 - fpr)|`.
///
/// Nearest match over the computed points, first occurrence on ties.
#[must_use]
pub fn balanced_threshold(points: &[RocPoint]) -> f32 {
    let mut best = f32::INFINITY;
    let mut threshold = f32::NAN;

    for p in points {
        let gap = (p.tpr - (1.0 - p.fpr)).abs();
        if gap < best {
            best = gap;
            threshold = p.threshold;
        }
    }

    threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_curve_auc() {
        // Classic four-sample example; closed-form trapezoidal AUC is 0.75.
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];

        let report = RocReport::compute(&labels, &scores).unwrap();
        assert_relative_eq!(report.auc, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_known_curve_eer_interior() {
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];

        let report = RocReport::compute(&labels, &scores).unwrap();
        assert!(report.eer > 0.0);
        assert!(report.eer < 0.5);
    }

    #[test]
    fn test_known_curve_balanced_threshold() {
        let labels = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];

        // At threshold 0.4: tpr = 0.5, fpr = 0.5, so tpr - (1 - fpr) = 0.
        let report = RocReport::compute(&labels, &scores).unwrap();
        assert_relative_eq!(report.balanced_threshold, 0.4);
    }

    #[test]
    fn test_perfect_separator() {
        let labels = vec![0, 0, 0, 1, 1, 1];
        let scores = vec![0.1, 0.2, 0.3, 0.7, 0.8, 0.9];

        let report = RocReport::compute(&labels, &scores).unwrap();
        assert_relative_eq!(report.auc, 1.0);
        assert_relative_eq!(report.eer, 0.0);
    }

    #[test]
    fn test_indistinguishable_distributions() {
        // One positive and one negative at every distinct score.
        let labels = vec![0, 1, 0, 1, 0, 1];
        let scores = vec![0.3, 0.3, 0.6, 0.6, 0.9, 0.9];

        let report = RocReport::compute(&labels, &scores).unwrap();
        assert_relative_eq!(report.auc, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_curve_starts_at_origin_above_max_score() {
        let labels = vec![0, 1];
        let scores = vec![0.2, 0.8];

        let points = roc_points(&labels, &scores).unwrap();
        assert_relative_eq!(points[0].fpr, 0.0);
        assert_relative_eq!(points[0].tpr, 0.0);
        assert!(points[0].threshold > 0.8);
    }

    #[test]
    fn test_tied_scores_single_point() {
        let labels = vec![0, 1, 1, 0];
        let scores = vec![0.5, 0.5, 0.9, 0.1];

        let points = roc_points(&labels, &scores).unwrap();
        // Origin + three distinct scores.
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_rates_bounded_and_monotone() {
        let labels = vec![0, 1, 0, 1, 1, 0, 0, 1];
        let scores = vec![0.11, 0.62, 0.35, 0.27, 0.81, 0.49, 0.73, 0.55];

        let points = roc_points(&labels, &scores).unwrap();
        for pair in points.windows(2) {
            assert!(pair[1].fpr >= pair[0].fpr);
            assert!(pair[1].tpr >= pair[0].tpr);
            assert!(pair[1].threshold < pair[0].threshold);
        }
        for p in &points {
            assert!((0.0..=1.0).contains(&p.fpr));
            assert!((0.0..=1.0).contains(&p.tpr));
        }
    }

    #[test]
    fn test_single_class_rejected() {
        assert!(matches!(
            roc_points(&[1, 1, 1], &[0.1, 0.5, 0.9]),
            Err(Error::DegenerateLabels(_))
        ));
        assert!(matches!(
            roc_points(&[0, 0, 0], &[0.1, 0.5, 0.9]),
            Err(Error::DegenerateLabels(_))
        ));
    }

    #[test]
    fn test_empty_and_mismatch_rejected() {
        assert!(matches!(roc_points(&[], &[]), Err(Error::EmptyData)));
        assert!(matches!(
            roc_points(&[0, 1], &[0.5]),
            Err(Error::DataLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_thresholds_accessor() {
        let labels = vec![0, 1, 0, 1];
        let scores = vec![0.2, 0.4, 0.6, 0.8];

        let report = RocReport::compute(&labels, &scores).unwrap();
        assert_eq!(report.thresholds().len(), report.points.len());
    }
}
