//! Classification-performance metrics for anomaly scoring.
//!
//! The entry point is [`evaluate`], which dispatches a labels/scores pair to
//! one of the supported metrics:
//!
//! - `"roc"` — full ROC curve with AUC, Equal Error Rate, and a balanced
//!   operating threshold, optionally rendered to a PNG plot;
//! - `"auprc"` — average precision (area under the precision-recall curve);
//! - `"f1_score"` — F1 of the positive class after binarizing at the fixed
//!   decision threshold [`F1_DECISION_THRESHOLD`].
//!
//! Scores are anomaly scores: higher means more anomalous, and every score
//! value doubles as a candidate decision threshold.

mod confusion;
mod pr;
mod roc;

pub use confusion::{binarize_at, ConfusionCounts};
pub use pr::{average_precision, pr_curve_samples, PrCurveSamples};
pub use roc::{
    balanced_threshold, equal_error_rate, roc_points, trapezoid_area, RocPoint, RocReport,
};

use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::plots::RocPlot;

/// Fixed decision threshold used by the `"f1_score"` metric.
pub const F1_DECISION_THRESHOLD: f32 = 0.20;

/// The evaluation metrics this crate can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// ROC curve, AUC, EER, balanced threshold.
    Roc,
    /// Average precision (area under the PR curve).
    Auprc,
    /// F1 score at the fixed decision threshold.
    F1Score,
}

impl Metric {
    /// The metric name as callers spell it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roc => "roc",
            Self::Auprc => "auprc",
            Self::F1Score => "f1_score",
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "roc" => Ok(Self::Roc),
            "auprc" => Ok(Self::Auprc),
            "f1_score" => Ok(Self::F1Score),
            other => Err(Error::UnsupportedMetric {
                name: other.to_string(),
            }),
        }
    }
}

/// F1 evaluation result.
///
/// `predictions` is the binarized score vector; the caller's scores are left
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct F1Report {
    /// Positive-class F1 score in [0, 1].
    pub score: f32,
    /// Scores binarized at [`F1_DECISION_THRESHOLD`].
    pub predictions: Vec<u8>,
}

/// Result of [`evaluate`], one variant per metric.
#[derive(Debug, Clone)]
pub enum Evaluation {
    /// `"roc"` result.
    Roc(RocReport),
    /// `"auprc"` result.
    AveragePrecision(f32),
    /// `"f1_score"` result.
    F1(F1Report),
}

/// Evaluate an epoch's labels and anomaly scores under the named metric.
///
/// The metric name is parsed before anything else, so an unknown name fails
/// fast without touching the filesystem. For `"roc"` with a plot directory,
/// the curve is rendered to `<dir>/ROC<epoch>.png`.
///
/// # Errors
///
/// [`Error::UnsupportedMetric`] for an unknown metric name; otherwise
/// whatever the underlying metric computation or plot rendering returns.
pub fn evaluate(
    labels: &[u8],
    scores: &[f32],
    metric: &str,
    roc_plot_dir: Option<&Path>,
    epoch: usize,
) -> Result<Evaluation> {
    let metric = Metric::from_str(metric)?;

    match metric {
        Metric::Roc => {
            let report = RocReport::compute(labels, scores)?;

            if let Some(dir) = roc_plot_dir {
                RocPlot::new().report(report.clone()).build()?.save(dir, epoch)?;
            }

            Ok(Evaluation::Roc(report))
        }
        Metric::Auprc => Ok(Evaluation::AveragePrecision(average_precision(
            labels, scores,
        )?)),
        Metric::F1Score => {
            let predictions = binarize_at(scores, F1_DECISION_THRESHOLD);
            let counts = ConfusionCounts::from_predictions(labels, &predictions)?;

            Ok(Evaluation::F1(F1Report {
                score: counts.f1(),
                predictions,
            }))
        }
    }
}
