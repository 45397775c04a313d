//! Axis drawing for the painter-based charts

use egui::{pos2, Align2, Color32, FontId, Painter, Pos2, Stroke};

use super::scale::{format_tick, LinearScale};

const TICK_LENGTH: f32 = 5.0;
const TICK_COUNT: usize = 6;

/// Space reserved around the plotting area, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl ChartMargin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Horizontal axis at chart-space height `y`. `origin` is the screen position of chart-space zero.
pub fn draw_bottom_axis(painter: &Painter, origin: Pos2, scale: &LinearScale, y: f32, label: &str, color: Color32) {
    let stroke = Stroke::new(1.0, color);
    let (r0, r1) = scale.range();
    painter.line_segment(
        [origin + egui::vec2(r0 as f32, y), origin + egui::vec2(r1 as f32, y)],
        stroke,
    );

    let step = scale.tick_step(TICK_COUNT);
    for tick in scale.ticks(TICK_COUNT) {
        let x = scale.map(tick) as f32;
        let p = origin + egui::vec2(x, y);
        painter.line_segment([p, p + egui::vec2(0.0, TICK_LENGTH)], stroke);
        painter.text(
            p + egui::vec2(0.0, TICK_LENGTH + 1.0),
            Align2::CENTER_TOP,
            format_tick(tick, step),
            FontId::proportional(10.0),
            color,
        );
    }

    painter.text(
        origin + egui::vec2(r0.max(r1) as f32, y - 4.0),
        Align2::RIGHT_BOTTOM,
        label,
        FontId::proportional(11.0),
        color,
    );
}

/// Vertical axis at chart-space offset `x`
pub fn draw_left_axis(painter: &Painter, origin: Pos2, scale: &LinearScale, x: f32, label: &str, color: Color32) {
    let stroke = Stroke::new(1.0, color);
    let (r0, r1) = scale.range();
    painter.line_segment(
        [origin + egui::vec2(x, r0 as f32), origin + egui::vec2(x, r1 as f32)],
        stroke,
    );

    let step = scale.tick_step(TICK_COUNT);
    for tick in scale.ticks(TICK_COUNT) {
        let y = scale.map(tick) as f32;
        let p = origin + egui::vec2(x, y);
        painter.line_segment([p, p - egui::vec2(TICK_LENGTH, 0.0)], stroke);
        painter.text(
            p - egui::vec2(TICK_LENGTH + 2.0, 0.0),
            Align2::RIGHT_CENTER,
            format_tick(tick, step),
            FontId::proportional(10.0),
            color,
        );
    }

    let top = r0.min(r1) as f32;
    painter.text(
        pos2(origin.x + x + 4.0, origin.y + top),
        Align2::LEFT_TOP,
        label,
        FontId::proportional(11.0),
        color,
    );
}
