//! Rasterization primitives.

mod primitives;

pub use primitives::{draw_circle, draw_line, draw_line_aa, draw_line_dotted};
