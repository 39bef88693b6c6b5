//! Error types for anoviz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in anoviz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Dashboard event serialization error.
    #[error("event serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Evaluation was requested for a metric name this crate does not know.
    #[error("unsupported evaluation metric: {name:?}")]
    UnsupportedMetric {
        /// The metric name as the caller spelled it.
        name: String,
    },

    /// Label and score sequences (or tensor dimensions) disagree in length.
    #[error("data length mismatch: expected {x_len} elements, got {y_len}")]
    DataLengthMismatch {
        /// Expected length.
        x_len: usize,
        /// Actual length.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("empty data provided")]
    EmptyData,

    /// Ground-truth labels contain only one class.
    #[error("degenerate labels: {0}")]
    DegenerateLabels(String),

    /// Invalid dimensions for a framebuffer, image batch, or plot.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (e.g., zero-width domain).
    #[error("scale domain error: {0}")]
    ScaleDomain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_metric_display() {
        let err = Error::UnsupportedMetric {
            name: "brier".to_string(),
        };
        assert!(err.to_string().contains("brier"));
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = Error::DataLengthMismatch { x_len: 4, y_len: 7 };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
