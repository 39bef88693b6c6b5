//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (pixel position, cell
//! color).

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain has zero width.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain(
                "domain min and max cannot be equal".to_string(),
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Color scale interpolating through a list of stop colors.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if no stop colors are given or the domain has zero
    /// width.
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain(
                "color scale requires at least one color".to_string(),
            ));
        }

        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain(
                "domain min and max cannot be equal".to_string(),
            ));
        }

        Ok(Self {
            colors,
            domain_min: domain.0,
            domain_max: domain.1,
        })
    }

    /// Sequential blue scale (light to dark).
    #[must_use]
    pub fn blues(domain: (f32, f32)) -> Option<Self> {
        Self::new(
            vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
            domain,
        )
        .ok()
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segments = self.colors.len() - 1;
        let segment = ((t * segments as f32).floor() as usize).min(segments - 1);
        let local_t = t * segments as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (
            *self.colors.first().unwrap_or(&Rgba::BLACK),
            *self.colors.last().unwrap_or(&Rgba::WHITE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scale_maps_endpoints() {
        let scale = LinearScale::new((0.0, 1.0), (40.0, 440.0)).unwrap();
        assert_relative_eq!(scale.scale(0.0), 40.0);
        assert_relative_eq!(scale.scale(1.0), 440.0);
        assert_relative_eq!(scale.scale(0.5), 240.0);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        // Y axes grow downward in pixel space.
        let scale = LinearScale::new((0.0, 1.0), (440.0, 40.0)).unwrap();
        assert_relative_eq!(scale.scale(0.0), 440.0);
        assert_relative_eq!(scale.scale(1.0), 40.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        assert!(LinearScale::new((0.5, 0.5), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::new(vec![Rgba::BLACK, Rgba::WHITE], (0.0, 1.0)).unwrap();
        assert_eq!(scale.scale(0.0), Rgba::BLACK);
        assert_eq!(scale.scale(1.0), Rgba::WHITE);
    }

    #[test]
    fn test_color_scale_clamps_out_of_domain() {
        let scale = ColorScale::new(vec![Rgba::BLACK, Rgba::WHITE], (0.0, 1.0)).unwrap();
        assert_eq!(scale.scale(-5.0), Rgba::BLACK);
        assert_eq!(scale.scale(5.0), Rgba::WHITE);
    }

    #[test]
    fn test_color_scale_empty() {
        assert!(ColorScale::new(vec![], (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_blues_is_sequential() {
        let scale = ColorScale::blues((0.0, 1.0)).unwrap();
        let light = scale.scale(0.0);
        let dark = scale.scale(1.0);
        assert!(light.r > dark.r);
        assert!(light.b > dark.b);
    }
}
