//! Color utilities for plots

use egui::Color32;

/// Color for a temperature-like value on the red-yellow-blue scheme, hot values red
pub fn heat_color(value: f64, min: f64, max: f64) -> Color32 {
    let t = if max > min && value.is_finite() {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let c = colorous::RED_YELLOW_BLUE.eval_continuous(1.0 - t);
    Color32::from_rgb(c.r, c.g, c.b)
}

pub fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Same color at `opacity` (0..=1)
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
