//! Primitive rendering functions.
//!
//! Rasterization for the line work the plot builders need: solid and dotted
//! Bresenham lines, Wu anti-aliased lines, and filled circles for markers.
//!
//! # References
//!
//! Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Draw a line using Bresenham's algorithm (non-antialiased).
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    draw_line_with(fb, x0, y0, x1, y1, |fb, x, y, _step| {
        if x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32, color);
        }
    });
}

/// Draw a dotted line (2-on/3-off pixel pattern along the line).
///
/// Used for reference lines that should recede behind the data, like the
/// equal-error anti-diagonal on a ROC plot.
pub fn draw_line_dotted(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    draw_line_with(fb, x0, y0, x1, y1, |fb, x, y, i| {
        if i % 5 < 2 && x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32, color);
        }
    });
}

/// Bresenham walk invoking `put(fb, x, y, step_index)` at every step.
fn draw_line_with(
    fb: &mut Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    mut put: impl FnMut(&mut Framebuffer, i32, i32, usize),
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;
    let mut step = 0;

    loop {
        put(fb, x, y, step);
        step += 1;

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are written at each step along the major axis, weighted by the
/// fractional distance from the ideal line position.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    // First endpoint.
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;

    put_weighted(fb, steep, xpxl1, ypxl1, color, rfpart(yend) * xgap);
    put_weighted(fb, steep, xpxl1, ypxl1 + 1, color, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint.
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;

    put_weighted(fb, steep, xpxl2, ypxl2, color, rfpart(yend) * xgap);
    put_weighted(fb, steep, xpxl2, ypxl2 + 1, color, fpart(yend) * xgap);

    // Interior.
    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put_weighted(fb, steep, x, ipart, color, rfpart(intery));
        put_weighted(fb, steep, x, ipart + 1, color, fpart(intery));
        intery += gradient;
    }
}

/// Blend a pixel with the given coverage, swapping axes for steep lines.
#[inline]
fn put_weighted(fb: &mut Framebuffer, steep: bool, major: i32, minor: i32, color: Rgba, w: f32) {
    let (x, y) = if steep { (minor, major) } else { (major, minor) };
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * w) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        fill_span(fb, cx - x, cx + x, cy + y, color);
        fill_span(fb, cx - x, cx + x, cy - y, color);
        fill_span(fb, cx - y, cx + y, cy + x, color);
        fill_span(fb, cx - y, cx + y, cy - x, color);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Fill a horizontal span, clamped to the buffer.
#[inline]
fn fill_span(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut fb = white_canvas();
        draw_line(&mut fb, 10, 50, 90, 50, Rgba::BLACK);

        assert_eq!(fb.get_pixel(10, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(90, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut fb = white_canvas();
        draw_line(&mut fb, 10, 10, 90, 90, Rgba::BLACK);

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_out_of_bounds_no_panic() {
        let mut fb = white_canvas();
        draw_line(&mut fb, -20, -20, 120, 120, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_dotted_line_has_gaps() {
        let mut fb = white_canvas();
        draw_line_dotted(&mut fb, 0, 50, 99, 50, Rgba::BLACK);

        let dark = (0..100)
            .filter(|&x| fb.get_pixel(x, 50) == Some(Rgba::BLACK))
            .count();
        assert!(dark > 20, "dots missing: {dark}");
        assert!(dark < 60, "no gaps: {dark}");
    }

    #[test]
    fn test_draw_line_aa_touches_path() {
        let mut fb = white_canvas();
        draw_line_aa(&mut fb, 10.0, 10.0, 90.0, 50.0, Rgba::BLACK);

        // Midpoint neighborhood should have been darkened.
        let px = fb.get_pixel(50, 30).unwrap();
        let neighbor = fb.get_pixel(50, 31).unwrap();
        assert!(px != Rgba::WHITE || neighbor != Rgba::WHITE);
    }

    #[test]
    fn test_draw_circle_filled() {
        let mut fb = white_canvas();
        draw_circle(&mut fb, 50, 50, 10, Rgba::BLUE);

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(58, 50), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(80, 80), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle_zero_radius() {
        let mut fb = white_canvas();
        draw_circle(&mut fb, 50, 50, 0, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
    }

    #[test]
    fn test_draw_circle_clipped() {
        let mut fb = white_canvas();
        draw_circle(&mut fb, 0, 0, 20, Rgba::GREEN);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::GREEN));
    }
}
