//! Expiring toasts for notices

use std::time::Instant;

use egui::{Align2, Context, Frame, RichText, Stroke};

use dv_core::{DashboardState, NOTICE_TTL};

use crate::theme::notice_color;
use crate::widget_utils::notices_area_id;

/// Draw the active notices stacked in the bottom-right corner.
/// Never blocks input to the rest of the window.
pub fn show_notices(ctx: &Context, state: &DashboardState) {
    let now = Instant::now();
    let notices = state.active_notices(now);
    if notices.is_empty() {
        return;
    }

    let mut dismiss = false;
    egui::Area::new(notices_area_id())
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .interactable(true)
        .show(ctx, |ui| {
            for notice in notices.iter().rev() {
                let color = notice_color(notice.level);
                Frame::popup(ui.style())
                    .stroke(Stroke::new(1.0, color))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(RichText::new(&notice.message).color(color));
                    });
            }
            if ui.small_button("Dismiss").clicked() {
                dismiss = true;
            }
        });

    if dismiss {
        state.dismiss_notices();
    }

    // Wake up again when the oldest toast expires
    if let Some(oldest) = notices.iter().map(|n| n.created).min() {
        let remaining = NOTICE_TTL.saturating_sub(now.saturating_duration_since(oldest));
        ctx.request_repaint_after(remaining);
    }
}
