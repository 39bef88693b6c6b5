//! Static ROC curve plot.
//!
//! Renders a computed [`RocReport`] the way an evaluation epoch wants it on
//! disk: the curve itself, the chance diagonal, the dotted equal-error
//! anti-diagonal, and a marker on the EER operating point. Saved plots are
//! named `ROC<epoch>.png`.

use std::path::{Path, PathBuf};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::metrics::RocReport;
use crate::output::PngEncoder;
use crate::render::{draw_circle, draw_line_aa, draw_line_dotted};
use crate::scale::{LinearScale, Scale};

/// Builder for ROC curve plots.
#[derive(Debug, Clone)]
pub struct RocPlot {
    /// Report to visualize.
    report: Option<RocReport>,
    /// Curve color.
    color: Rgba,
    /// Show the chance diagonal.
    show_diagonal: bool,
    /// Chance diagonal color.
    diagonal_color: Rgba,
    /// EER marker and anti-diagonal color.
    marker_color: Rgba,
    /// Output width.
    width: u32,
    /// Output height.
    height: u32,
    /// Margin.
    margin: u32,
}

impl Default for RocPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl RocPlot {
    /// Create a new ROC plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            report: None,
            color: Rgba::rgb(255, 140, 0), // dark orange
            show_diagonal: true,
            diagonal_color: Rgba::rgb(200, 200, 200),
            marker_color: Rgba::rgb(0, 0, 128), // navy
            width: 600,
            height: 600,
            margin: 40,
        }
    }

    /// Set the report to plot.
    #[must_use]
    pub fn report(mut self, report: RocReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Compute the report from labels and scores.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be computed.
    pub fn from_predictions(mut self, labels: &[u8], scores: &[f32]) -> Result<Self> {
        self.report = Some(RocReport::compute(labels, scores)?);
        Ok(self)
    }

    /// Set the curve color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Show or hide the chance diagonal.
    #[must_use]
    pub fn diagonal(mut self, show: bool) -> Self {
        self.show_diagonal = show;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<Self> {
        if self.report.is_none() {
            return Err(Error::EmptyData);
        }
        Ok(self)
    }

    /// The AUC of the plotted report.
    #[must_use]
    pub fn auc(&self) -> f32 {
        self.report.as_ref().map_or(0.0, |r| r.auc)
    }

    /// The EER of the plotted report.
    #[must_use]
    pub fn eer(&self) -> f32 {
        self.report.as_ref().map_or(0.0, |r| r.eer)
    }

    /// Render the plot into a framebuffer.
    pub fn render(&self, fb: &mut Framebuffer) -> Result<()> {
        let report = self.report.as_ref().ok_or(Error::EmptyData)?;

        let plot_size = self.width.min(self.height) - 2 * self.margin;
        let x_scale = LinearScale::new(
            (0.0, 1.0),
            (self.margin as f32, (self.margin + plot_size) as f32),
        )?;
        let y_scale = LinearScale::new(
            (0.0, 1.0),
            ((self.margin + plot_size) as f32, self.margin as f32),
        )?;

        // Chance diagonal from (0, 0) to (1, 1).
        if self.show_diagonal {
            draw_line_aa(
                fb,
                x_scale.scale(0.0),
                y_scale.scale(0.0),
                x_scale.scale(1.0),
                y_scale.scale(1.0),
                self.diagonal_color,
            );
        }

        // Equal-error anti-diagonal from (0, 1) to (1, 0), dotted.
        draw_line_dotted(
            fb,
            x_scale.scale(0.0) as i32,
            y_scale.scale(1.0) as i32,
            x_scale.scale(1.0) as i32,
            y_scale.scale(0.0) as i32,
            self.marker_color,
        );

        // The curve.
        for pair in report.points.windows(2) {
            draw_line_aa(
                fb,
                x_scale.scale(pair[0].fpr),
                y_scale.scale(pair[0].tpr),
                x_scale.scale(pair[1].fpr),
                y_scale.scale(pair[1].tpr),
                self.color,
            );
        }

        // EER operating point at (eer, 1 - eer).
        draw_circle(
            fb,
            x_scale.scale(report.eer) as i32,
            y_scale.scale(1.0 - report.eer) as i32,
            5,
            self.marker_color,
        );

        Ok(())
    }

    /// Render to a new framebuffer.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(Rgba::WHITE);
        self.render(&mut fb)?;
        Ok(fb)
    }

    /// Render and save as `ROC<epoch>.png` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn save(&self, dir: &Path, epoch: usize) -> Result<PathBuf> {
        let fb = self.to_framebuffer()?;
        let path = dir.join(format!("ROC{epoch}.png"));
        PngEncoder::write_to_file(&fb, &path)?;
        Ok(path)
    }
}

impl batuta_common::display::WithDimensions for RocPlot {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batuta_common::display::WithDimensions;

    fn sample_plot() -> RocPlot {
        let labels = vec![0, 0, 1, 1, 1, 0, 1, 0];
        let scores = vec![0.1, 0.3, 0.4, 0.8, 0.9, 0.2, 0.6, 0.35];
        RocPlot::new().from_predictions(&labels, &scores).unwrap()
    }

    #[test]
    fn test_build_requires_report() {
        assert!(RocPlot::new().build().is_err());
    }

    #[test]
    fn test_render_to_framebuffer() {
        let plot = sample_plot().dimensions(200, 200).build().unwrap();
        let fb = plot.to_framebuffer().unwrap();
        assert_eq!(fb.width(), 200);

        // Something other than the white background must have been drawn.
        let drawn = (0..200)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) != Some(Rgba::WHITE))
            .count();
        assert!(drawn > 100, "only {drawn} pixels drawn");
    }

    #[test]
    fn test_save_names_file_by_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let plot = sample_plot().dimensions(120, 120).build().unwrap();

        let path = plot.save(dir.path(), 7).unwrap();
        assert_eq!(path.file_name().unwrap(), "ROC7.png");
        assert!(path.is_file());
    }

    #[test]
    fn test_accessors() {
        let plot = sample_plot().build().unwrap();
        assert!(plot.auc() > 0.5);
        assert!((0.0..=1.0).contains(&plot.eer()));
    }

    #[test]
    fn test_diagonal_toggle_renders() {
        let plot = sample_plot()
            .diagonal(false)
            .dimensions(120, 120)
            .build()
            .unwrap();
        assert!(plot.to_framebuffer().is_ok());
    }
}
