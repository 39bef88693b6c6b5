//! Dashboard logging client seam.
//!
//! The training loop never talks to an experiment dashboard directly; it
//! hands a [`DashboardClient`] implementation to the
//! [`Visualizer`](crate::visualizer::Visualizer), which forwards scalars,
//! images and raw PR-curve data through it. The client is an explicitly
//! constructed, explicitly owned handle; there is no process-wide connection.
//!
//! Two implementations ship with the crate: [`JsonlDashboard`], an
//! append-only JSON-lines event stream with base64-embedded PNGs, and
//! [`NullDashboard`] for runs with display disabled.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::metrics::PrCurveSamples;
use crate::output::PngEncoder;

/// Logging calls a dashboard backend must accept, each keyed by a caller
/// supplied step index.
pub trait DashboardClient {
    /// Forward named scalars under a shared tag.
    fn log_scalars(&mut self, tag: &str, scalars: &[(&str, f32)], step: usize) -> Result<()>;

    /// Forward a rendered image.
    fn log_image(&mut self, tag: &str, image: &Framebuffer, step: usize) -> Result<()>;

    /// Forward raw PR-curve counts and precision/recall arrays.
    fn log_pr_curve(&mut self, tag: &str, samples: &PrCurveSamples, step: usize) -> Result<()>;
}

/// One event on the wire. Borrowed where possible; serialized once.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Scalars {
        tag: &'a str,
        step: usize,
        values: Vec<NamedValue<'a>>,
    },
    Image {
        tag: &'a str,
        step: usize,
        width: u32,
        height: u32,
        png_base64: String,
    },
    PrCurve {
        tag: &'a str,
        step: usize,
        true_positive_counts: &'a [u32],
        false_positive_counts: &'a [u32],
        true_negative_counts: &'a [u32],
        false_negative_counts: &'a [u32],
        precision: &'a [f32],
        recall: &'a [f32],
        num_thresholds: usize,
    },
}

#[derive(Serialize)]
struct NamedValue<'a> {
    name: &'a str,
    value: f32,
}

/// Append-only JSON-lines dashboard sink.
///
/// Every logging call becomes one JSON object on its own line, flushed
/// immediately so a dashboard process can tail the file while the run is
/// live. Images are PNG-encoded and embedded base64.
pub struct JsonlDashboard {
    writer: BufWriter<File>,
}

impl JsonlDashboard {
    /// Open (or create) the event stream at `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_event(&mut self, event: &Event<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl DashboardClient for JsonlDashboard {
    fn log_scalars(&mut self, tag: &str, scalars: &[(&str, f32)], step: usize) -> Result<()> {
        let values = scalars
            .iter()
            .map(|&(name, value)| NamedValue { name, value })
            .collect();

        self.write_event(&Event::Scalars { tag, step, values })
    }

    fn log_image(&mut self, tag: &str, image: &Framebuffer, step: usize) -> Result<()> {
        let png = PngEncoder::to_bytes(image)?;

        self.write_event(&Event::Image {
            tag,
            step,
            width: image.width(),
            height: image.height(),
            png_base64: STANDARD.encode(&png),
        })
    }

    fn log_pr_curve(&mut self, tag: &str, samples: &PrCurveSamples, step: usize) -> Result<()> {
        self.write_event(&Event::PrCurve {
            tag,
            step,
            true_positive_counts: &samples.true_positives,
            false_positive_counts: &samples.false_positives,
            true_negative_counts: &samples.true_negatives,
            false_negative_counts: &samples.false_negatives,
            precision: &samples.precision,
            recall: &samples.recall,
            num_thresholds: samples.requested,
        })
    }
}

/// Dashboard sink that discards everything.
///
/// For runs with display disabled; keeps the call sites identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDashboard;

impl DashboardClient for NullDashboard {
    fn log_scalars(&mut self, _tag: &str, _scalars: &[(&str, f32)], _step: usize) -> Result<()> {
        Ok(())
    }

    fn log_image(&mut self, _tag: &str, _image: &Framebuffer, _step: usize) -> Result<()> {
        Ok(())
    }

    fn log_pr_curve(&mut self, _tag: &str, _samples: &PrCurveSamples, _step: usize) -> Result<()> {
        Ok(())
    }
}
