use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle};
use std::collections::BTreeMap;

use dv_core::NoticeLevel;

/// Theme configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            dark_mode: true,
        }
    }

    /// White chart background, closest to how the charts are usually printed
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            dark_mode: false,
        }
    }

    fn palette(&self) -> Palette {
        if self.dark_mode {
            Palette {
                bg: Color32::from_rgb(23, 23, 23),
                panel: Color32::from_rgb(31, 31, 31),
                widget: Color32::from_rgb(40, 40, 40),
                hover: Color32::from_rgb(50, 50, 50),
                active: Color32::from_rgb(60, 60, 60),
                border: Color32::from_rgb(70, 70, 70),
                text: Color32::from_rgb(220, 220, 220),
            }
        } else {
            Palette {
                bg: Color32::WHITE,
                panel: Color32::from_rgb(246, 246, 246),
                widget: Color32::from_rgb(232, 232, 232),
                hover: Color32::from_rgb(220, 220, 220),
                active: Color32::from_rgb(205, 205, 205),
                border: Color32::from_rgb(190, 190, 190),
                text: Color32::from_rgb(30, 30, 30),
            }
        }
    }
}

struct Palette {
    bg: Color32,
    panel: Color32,
    widget: Color32,
    hover: Color32,
    active: Color32,
    border: Color32,
    text: Color32,
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };
    let p = theme.palette();
    let accent = accent_color();

    visuals.window_fill = p.panel;
    visuals.panel_fill = p.panel;
    visuals.extreme_bg_color = p.bg;
    visuals.faint_bg_color = p.widget;

    let widgets = [
        (&mut visuals.widgets.noninteractive, p.widget, p.border),
        (&mut visuals.widgets.inactive, p.widget, p.border),
        (&mut visuals.widgets.hovered, p.hover, p.border),
        (&mut visuals.widgets.active, p.active, accent),
    ];
    for (widget, fill, border) in widgets {
        widget.bg_fill = fill;
        widget.bg_stroke = Stroke::new(1.0, border);
        widget.fg_stroke = Stroke::new(1.0, p.text);
        widget.rounding = Rounding::same(4.0);
    }

    // Selection and highlighting
    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.spacing.indent = 20.0;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    style.visuals = visuals;
    ctx.set_style(style);
    tracing::debug!("Applied theme '{}'", theme.name);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(100, 150, 250)
}

/// Get the warning color for the theme
pub fn warning_color() -> Color32 {
    Color32::from_rgb(230, 180, 80)
}

/// Toast accent for a notice
pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => accent_color(),
        NoticeLevel::Warning => warning_color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_theme_switches_mode() {
        let ctx = Context::default();
        apply_theme(&ctx, &Theme::light());
        assert!(!ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.extreme_bg_color, Color32::WHITE);

        apply_theme(&ctx, &Theme::dark());
        assert!(ctx.style().visuals.dark_mode);
        assert_eq!(ctx.style().visuals.selection.stroke.color, accent_color());
    }

    #[test]
    fn test_notice_colors_differ() {
        assert_ne!(notice_color(NoticeLevel::Info), notice_color(NoticeLevel::Warning));
    }
}
