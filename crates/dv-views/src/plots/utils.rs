//! Utilities for plot views

pub mod axes;
pub mod colors;
pub mod scale;

// Re-export commonly used items
pub use axes::{draw_bottom_axis, draw_left_axis, ChartMargin};
pub use colors::{heat_color, rgb, with_opacity};
pub use scale::{format_tick, BandScale, LinearScale};
