//! Image-batch normalization and grid tiling.
//!
//! Training loops hand over batches of real, reconstructed, and fixed-noise
//! images as NCHW float tensors. Before a batch can be displayed or saved it
//! is normalized to [0, 1] against its own extent, then tiled into a single
//! framebuffer.
//!
//! Batch min/max reductions go through trueno's SIMD vectors; a batch is
//! `count * channels * height * width` floats and the reduction dominates
//! the cost of this module.

use std::path::Path;

use trueno::Vector;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::PngEncoder;

/// Guard against division by zero when a batch is constant.
const NORM_EPSILON: f32 = 1e-5;

/// Default number of tiles per grid row.
const GRID_COLUMNS: usize = 8;

/// Padding between grid tiles, in pixels.
const GRID_PADDING: usize = 2;

/// A batch of images in NCHW layout (count, channels, height, width).
///
/// Channels must be 1 (greyscale) or 3 (RGB). Values are raw model outputs;
/// call [`normalized`](Self::normalized) before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    count: usize,
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl ImageBatch {
    /// Create a batch from NCHW data.
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero, channels is not 1 or 3, or
    /// the data length does not match the dimensions.
    pub fn new(
        count: usize,
        channels: usize,
        height: usize,
        width: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        if count == 0 || height == 0 || width == 0 || !matches!(channels, 1 | 3) {
            return Err(Error::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }

        let expected = count * channels * height * width;
        if data.len() != expected {
            return Err(Error::DataLengthMismatch {
                x_len: expected,
                y_len: data.len(),
            });
        }

        Ok(Self {
            count,
            channels,
            height,
            width,
            data,
        })
    }

    /// Number of images in the batch.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Channels per image (1 or 3).
    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Raw NCHW values.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Normalize to [0, 1] against the whole batch's extent:
    /// `(x - min) / (max - min + 1e-5)`.
    ///
    /// Pure: returns a new batch. A constant batch maps to all zeros thanks
    /// to the epsilon guard.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let v = Vector::from_vec(self.data.clone());
        let min = v.min().unwrap_or(0.0);
        let max = v.max().unwrap_or(0.0);
        let range = max - min + NORM_EPSILON;

        let data = self.data.iter().map(|&x| (x - min) / range).collect();

        Self {
            data,
            ..self.clone()
        }
    }

    /// Tile the batch into a single framebuffer, `columns` images per row,
    /// with two black pixels of padding between tiles.
    ///
    /// Values are read as unit-interval intensities and clamped; normalize
    /// first for raw model outputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting grid would not fit a framebuffer.
    pub fn to_grid(&self, columns: usize) -> Result<Framebuffer> {
        let columns = columns.max(1).min(self.count);
        let rows = self.count.div_ceil(columns);

        let grid_width = columns * self.width + (columns + 1) * GRID_PADDING;
        let grid_height = rows * self.height + (rows + 1) * GRID_PADDING;

        let mut fb = Framebuffer::new(grid_width as u32, grid_height as u32)?;
        fb.clear(Rgba::BLACK);

        for n in 0..self.count {
            let tile_x = (n % columns) * (self.width + GRID_PADDING) + GRID_PADDING;
            let tile_y = (n / columns) * (self.height + GRID_PADDING) + GRID_PADDING;

            for y in 0..self.height {
                for x in 0..self.width {
                    let color = if self.channels == 1 {
                        Rgba::from_unit_grey(self.at(n, 0, y, x))
                    } else {
                        let quantize =
                            |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                        Rgba::rgb(
                            quantize(self.at(n, 0, y, x)),
                            quantize(self.at(n, 1, y, x)),
                            quantize(self.at(n, 2, y, x)),
                        )
                    };

                    fb.set_pixel((tile_x + x) as u32, (tile_y + y) as u32, color);
                }
            }
        }

        Ok(fb)
    }

    /// Normalize, tile with the default column count, and write a PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if tiling or writing fails.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fb = self.normalized().to_grid(GRID_COLUMNS)?;
        PngEncoder::write_to_file(&fb, path)
    }

    #[inline]
    fn at(&self, n: usize, c: usize, y: usize, x: usize) -> f32 {
        self.data[((n * self.channels + c) * self.height + y) * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp_batch() -> ImageBatch {
        // Two 1x4x4 greyscale images spanning [-2, 2].
        let data: Vec<f32> = (0..32).map(|i| -2.0 + i as f32 * (4.0 / 31.0)).collect();
        ImageBatch::new(2, 1, 4, 4, data).unwrap()
    }

    #[test]
    fn test_new_validates_shape() {
        assert!(ImageBatch::new(1, 2, 4, 4, vec![0.0; 32]).is_err());
        assert!(ImageBatch::new(1, 1, 4, 4, vec![0.0; 15]).is_err());
        assert!(ImageBatch::new(0, 1, 4, 4, vec![]).is_err());
    }

    #[test]
    fn test_normalized_unit_interval() {
        let normalized = ramp_batch().normalized();

        let min = normalized.data().iter().copied().fold(f32::INFINITY, f32::min);
        let max = normalized
            .data()
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        assert_relative_eq!(min, 0.0);
        assert!(max <= 1.0);
        assert!(max > 0.999, "epsilon guard should barely shave the top: {max}");
    }

    #[test]
    fn test_normalized_is_pure() {
        let batch = ramp_batch();
        let before = batch.data().to_vec();
        let _ = batch.normalized();
        assert_eq!(batch.data(), &before[..]);
    }

    #[test]
    fn test_constant_batch_maps_to_zero() {
        let batch = ImageBatch::new(1, 1, 2, 2, vec![3.5; 4]).unwrap();
        let normalized = batch.normalized();
        for &v in normalized.data() {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn test_grid_dimensions() {
        let batch = ImageBatch::new(5, 1, 4, 4, vec![0.5; 80]).unwrap();
        let fb = batch.to_grid(2).unwrap();

        // 2 columns, 3 rows, 2px padding on every seam and edge.
        assert_eq!(fb.width(), (2 * 4 + 3 * 2) as u32);
        assert_eq!(fb.height(), (3 * 4 + 4 * 2) as u32);
    }

    #[test]
    fn test_grid_clamps_columns_to_count() {
        let batch = ImageBatch::new(2, 1, 4, 4, vec![0.5; 32]).unwrap();
        let fb = batch.to_grid(8).unwrap();
        assert_eq!(fb.width(), (2 * 4 + 3 * 2) as u32);
    }

    #[test]
    fn test_grid_pixels_greyscale() {
        let batch = ImageBatch::new(1, 1, 2, 2, vec![0.0, 1.0, 0.5, 2.0]).unwrap();
        let fb = batch.to_grid(1).unwrap();

        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(3, 2), Some(Rgba::WHITE));
        // Out-of-range value clamps instead of wrapping.
        assert_eq!(fb.get_pixel(3, 3), Some(Rgba::WHITE));
    }

    #[test]
    fn test_grid_pixels_rgb() {
        let data = vec![
            1.0, 0.0, 0.0, 0.0, // R plane
            0.0, 1.0, 0.0, 0.0, // G plane
            0.0, 0.0, 1.0, 0.0, // B plane
        ];
        let batch = ImageBatch::new(1, 3, 2, 2, data).unwrap();
        let fb = batch.to_grid(1).unwrap();

        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(3, 2), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(2, 3), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(3, 3), Some(Rgba::BLACK));
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.png");

        ramp_batch().save_png(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
