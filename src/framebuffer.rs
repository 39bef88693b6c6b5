//! Core framebuffer for pixel rendering.
//!
//! A tightly-packed RGBA pixel buffer that plot builders draw into and the
//! PNG encoder reads out of.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// RGBA pixel buffer in row-major order, 4 bytes per pixel, no row padding.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let size = (width as usize) * (height as usize) * 4;
        Ok(Self {
            width,
            height,
            pixels: vec![0; size],
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Raw pixel data, tightly packed, suitable for PNG encoding.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole buffer with a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = r;
            chunk[1] = g;
            chunk[2] = b;
            chunk[3] = a;
        }
    }

    /// Fill a rectangular region, clamped to the buffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let [r, g, b, a] = color.to_array();
        for row_y in y1..y2 {
            let start = self.pixel_index(x1, row_y);
            let end = start + ((x2 - x1) as usize) * 4;
            for chunk in self.pixels[start..end].chunks_exact_mut(4) {
                chunk[0] = r;
                chunk[1] = g;
                chunk[2] = b;
                chunk[3] = a;
            }
        }
    }

    /// Color at a pixel, or `None` when out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Overwrite a pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let [r, g, b, a] = color.to_array();
        self.pixels[idx] = r;
        self.pixels[idx + 1] = g;
        self.pixels[idx + 2] = b;
        self.pixels[idx + 3] = a;
    }

    /// Alpha-blend a color onto a pixel using the "over" operator:
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a <= 0.0 {
            return;
        }

        let blend = |src: u8, dst: u8| -> u8 {
            let src_f = f32::from(src) / 255.0;
            let dst_f = f32::from(dst) / 255.0;
            let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
            (out * 255.0) as u8
        };

        self.pixels[idx] = blend(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0) as u8;
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(64, 48).unwrap();
        assert_eq!(fb.width(), 64);
        assert_eq!(fb.height(), 48);
        assert_eq!(fb.pixel_count(), 64 * 48);
        assert_eq!(fb.pixels().len(), 64 * 48 * 4);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 10).is_err());
        assert!(Framebuffer::new(10, 0).is_err());
    }

    #[test]
    fn test_clear_and_get() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::RED);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(7, 7), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(8, 0), None);
    }

    #[test]
    fn test_fill_rect_clamped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(6, 6, 100, 100, Rgba::BLUE);

        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(6, 6), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::BLUE));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_ignored() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.set_pixel(100, 100, Rgba::RED);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_blend_pixel_opaque_replaces() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(1, 1, Rgba::BLACK);
        assert_eq!(fb.get_pixel(1, 1), Some(Rgba::BLACK));
    }

    #[test]
    fn test_blend_pixel_half_alpha() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(0, 0, Rgba::BLACK.with_alpha(128));

        let px = fb.get_pixel(0, 0).unwrap();
        assert!(px.r > 100 && px.r < 150, "expected mid-grey, got {px:?}");
    }
}
