//! # Anoviz
//!
//! Evaluation metrics and training-run visualization for anomaly detection
//! models.
//!
//! Anoviz sits between a model's training loop and its experiment record: it
//! computes binary-classification metrics (ROC/AUC, Equal Error Rate, average
//! precision, thresholded F1, precision/recall grids) from label/score
//! vectors, renders static plots (ROC curve, confusion matrix, reconstruction
//! image grids) to PNG, and forwards scalars, images and raw PR-curve data to
//! a dashboard client while keeping a human-readable text log on disk.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anoviz::prelude::*;
//!
//! // Score an evaluation epoch.
//! let report = match evaluate(&labels, &scores, "roc", Some(out_dir), epoch)? {
//!     Evaluation::Roc(report) => report,
//!     _ => unreachable!(),
//! };
//!
//! // Forward it to the run's dashboard and log.
//! let mut viz = Visualizer::new(options, JsonlDashboard::create(&events_path)?)?;
//! let mut perf = Performance::new();
//! perf.push("AUC", report.auc);
//! viz.plot_performance(epoch, &perf)?;
//! viz.print_current_performance(&perf, best_auc)?;
//! ```
//!
//! ## Design
//!
//! Data flows one way: training loop → [`metrics`] → [`visualizer`] →
//! dashboard client and filesystem. Nothing reads back from the dashboard,
//! and every sink operation is an independent forward-and-log call keyed by
//! the caller-supplied step or epoch.
//!
//! ## Academic References
//!
//! - Fawcett, T. (2006). "An introduction to ROC analysis." Pattern
//!   Recognition Letters, 27(8), 861-874.
//! - Davis, J., & Goadrich, M. (2006). "The relationship between
//!   Precision-Recall and ROC curves." ICML '06.
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/metrics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types for rendering.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Metrics Modules
// ============================================================================

/// Classification-performance metrics (ROC, AUC, EER, AUPRC, F1).
pub mod metrics;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization primitives.
pub mod render;

/// Output encoders (PNG).
pub mod output;

/// High-level plot builders (ROC curve, confusion matrix).
pub mod plots;

/// Image-batch normalization and grid tiling.
pub mod images;

// ============================================================================
// Run Tracking Modules
// ============================================================================

/// Dashboard logging client seam and file-backed implementations.
pub mod dashboard;

/// Per-run visualization sink (dashboard forwarding + text log + image dirs).
pub mod visualizer;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for anoviz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use anoviz::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;

    pub use crate::color::Rgba;
    pub use crate::dashboard::{DashboardClient, JsonlDashboard, NullDashboard};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::images::ImageBatch;
    pub use crate::metrics::{
        evaluate, pr_curve_samples, ConfusionCounts, Evaluation, F1Report, Metric,
        PrCurveSamples, RocReport,
    };
    pub use crate::plots::{ConfusionMatrixPlot, RocPlot};
    pub use crate::scale::{ColorScale, LinearScale, Scale};
    pub use crate::visualizer::{Performance, RunOptions, Split, Visualizer};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
