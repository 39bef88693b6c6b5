//! High-level plot builders.

mod confusion_matrix;
mod roc_plot;

pub use confusion_matrix::ConfusionMatrixPlot;
pub use roc_plot::RocPlot;
