//! Confusion matrix visualization for binary anomaly classification.
//!
//! Renders the four counts of a [`ConfusionCounts`] as a 2x2 cell grid,
//! colored by a sequential scale, with the correct-prediction diagonal
//! highlighted.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::metrics::ConfusionCounts;
use crate::scale::{ColorScale, Scale};

/// Builder for 2x2 confusion matrix plots.
#[derive(Debug, Clone)]
pub struct ConfusionMatrixPlot {
    /// Counts to visualize.
    counts: Option<ConfusionCounts>,
    /// Output width in pixels.
    width: u32,
    /// Output height in pixels.
    height: u32,
    /// Margin around the matrix.
    margin: u32,
    /// Show cell borders.
    show_borders: bool,
    /// Border color.
    border_color: Rgba,
}

impl Default for ConfusionMatrixPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfusionMatrixPlot {
    /// Create a new confusion matrix plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: None,
            width: 400,
            height: 400,
            margin: 40,
            show_borders: true,
            border_color: Rgba::rgb(100, 100, 100),
        }
    }

    /// Set the counts to plot.
    #[must_use]
    pub fn counts(mut self, counts: ConfusionCounts) -> Self {
        self.counts = Some(counts);
        self
    }

    /// Set the margin around the matrix.
    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable cell borders.
    #[must_use]
    pub fn borders(mut self, show: bool) -> Self {
        self.show_borders = show;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<Self> {
        if self.counts.is_none() {
            return Err(Error::EmptyData);
        }
        Ok(self)
    }

    /// Render the matrix into a framebuffer.
    pub fn render(&self, fb: &mut Framebuffer) -> Result<()> {
        let counts = self.counts.as_ref().ok_or(Error::EmptyData)?;
        let matrix = counts.to_matrix();

        let max = matrix.iter().flatten().copied().max().unwrap_or(0);
        let scale = ColorScale::blues((0.0, (max.max(1)) as f32)).ok_or(Error::EmptyData)?;

        let plot_width = self.width.saturating_sub(2 * self.margin);
        let plot_height = self.height.saturating_sub(2 * self.margin);
        let cell_width = plot_width / 2;
        let cell_height = plot_height / 2;

        if cell_width == 0 || cell_height == 0 {
            return Ok(()); // Cells too small to render.
        }

        for (row, row_counts) in matrix.iter().enumerate() {
            for (col, &value) in row_counts.iter().enumerate() {
                let x = self.margin + (col as u32) * cell_width;
                let y = self.margin + (row as u32) * cell_height;

                fb.fill_rect(x, y, cell_width, cell_height, scale.scale(value as f32));

                if self.show_borders {
                    fb.fill_rect(x + cell_width - 1, y, 1, cell_height, self.border_color);
                    fb.fill_rect(x, y + cell_height - 1, cell_width, 1, self.border_color);
                }
            }
        }

        // Highlight the correct-prediction diagonal.
        let highlight = Rgba::rgb(50, 50, 50);
        for i in 0..2u32 {
            let x = self.margin + i * cell_width;
            let y = self.margin + i * cell_height;
            fb.fill_rect(x, y, cell_width, 2, highlight);
            fb.fill_rect(x, y + cell_height - 2, cell_width, 2, highlight);
            fb.fill_rect(x, y, 2, cell_height, highlight);
            fb.fill_rect(x + cell_width - 2, y, 2, cell_height, highlight);
        }

        Ok(())
    }

    /// Render to a new framebuffer.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(Rgba::WHITE);
        self.render(&mut fb)?;
        Ok(fb)
    }
}

impl batuta_common::display::WithDimensions for ConfusionMatrixPlot {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
