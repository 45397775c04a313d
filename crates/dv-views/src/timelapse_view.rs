//! Year-indexed image slideshow

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use egui::Ui;

use dv_core::events::events::DatasetLoaded;
use dv_core::events::{EventBus, Subscription};
use dv_core::Slideshow;
use dv_data::config::TimelapseConfig;

use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

/// `file://` URI of an image path, resolved against the working directory
pub fn image_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    format!("file://{}", absolute.display())
}

pub struct TimelapseView {
    id: SpaceViewId,
    title: String,
    player: Slideshow,
    /// Set when a new dataset replaces the old one
    reset_pending: Arc<AtomicBool>,
    _subscription: Subscription,
}

impl TimelapseView {
    pub fn new(id: SpaceViewId, title: impl Into<String>, config: &TimelapseConfig, events: &EventBus) -> Self {
        let reset_pending = Arc::new(AtomicBool::new(false));
        let _subscription = events.mark_on::<DatasetLoaded>(reset_pending.clone());

        let mut player = Slideshow::new(config.years.clone());
        player.set_interval(config.interval());
        Self {
            id,
            title: title.into(),
            player,
            reset_pending,
            _subscription,
        }
    }

    pub fn player(&self) -> &Slideshow {
        &self.player
    }

    fn image_path(&self, config: &TimelapseConfig) -> Option<PathBuf> {
        self.player.current_frame().map(|year| config.image_path(year))
    }

    fn controls(&mut self, ui: &mut Ui, config: &TimelapseConfig) {
        ui.horizontal(|ui| {
            if ui.button("⏮").on_hover_text("Previous year").clicked() {
                let _ = self.player.previous();
            }
            let play_label = if self.player.is_playing() { "⏸" } else { "▶" };
            if ui.button(play_label).clicked() {
                self.player.toggle();
                tracing::info!(
                    "Timelapse {}",
                    if self.player.is_playing() { "started" } else { "paused" }
                );
            }
            if ui.button("⏭").on_hover_text("Next year").clicked() {
                let _ = self.player.next();
            }

            ui.separator();
            let mut speed = self.player.interval().as_millis() as u64;
            let slider = egui::Slider::new(&mut speed, config.min_interval_ms..=config.max_interval_ms)
                .suffix(" ms")
                .text("Speed");
            if ui.add(slider).changed() {
                self.player.set_interval(Duration::from_millis(speed));
            }
        });

        let last = self.player.frames().len().saturating_sub(1);
        let mut position = self.player.position();
        ui.horizontal(|ui| {
            let year = self.player.current_frame().map(|y| y.to_string()).unwrap_or_default();
            ui.strong(year);
            let slider = egui::Slider::new(&mut position, 0..=last).show_value(false);
            if ui.add(slider).changed() {
                let _ = self.player.seek_to(position);
            }
        });
    }
}

impl SpaceView for TimelapseView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "TimelapseView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let config = &ctx.config.timelapse;
        if self.player.frames().is_empty() {
            view_placeholder(ui, "No timelapse years configured");
            return;
        }

        self.controls(ui, config);
        ui.separator();

        if let Some(path) = self.image_path(config) {
            if path.exists() {
                let size = ui.available_size();
                ui.centered_and_justified(|ui| {
                    ui.add(
                        egui::Image::new(image_uri(&path))
                            .max_width(size.x)
                            .max_height(size.y)
                            .maintain_aspect_ratio(true),
                    );
                });
            } else {
                view_placeholder(ui, &format!("{} not found", path.display()));
            }
        }

        if let Some(remaining) = self.player.remaining() {
            ui.ctx().request_repaint_after(remaining);
        }
    }

    fn on_frame_update(&mut self, ctx: &ViewerContext, dt: f32) {
        if self.reset_pending.swap(false, Ordering::AcqRel) {
            self.player.reset(ctx.config.timelapse.years.clone());
            self.player.set_interval(ctx.config.timelapse.interval());
        }
        if dt.is_finite() && dt > 0.0 {
            self.player.tick(Duration::from_secs_f32(dt));
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::DashboardState;
    use dv_data::DashboardConfig;

    fn context() -> ViewerContext {
        ViewerContext::new(Arc::new(DashboardState::default()), Arc::new(DashboardConfig::default()))
    }

    #[test]
    fn test_image_uri_is_absolute() {
        assert_eq!(image_uri(Path::new("/data/1974.png")), "file:///data/1974.png");
        assert!(image_uri(Path::new("images/1984.png")).starts_with("file:///"));
    }

    #[test]
    fn test_dataset_reload_resets_player() {
        let ctx = context();
        let mut view = TimelapseView::new(uuid::Uuid::new_v4(), "Timelapse", &ctx.config.timelapse, ctx.state.events());
        assert_eq!(view.player().frames().len(), 38);

        view.player.seek_to(5).unwrap();
        view.player.play();
        view.on_frame_update(&ctx, 0.0);
        assert_eq!(view.player().position(), 5);

        let dataset = dv_core::Dataset::new(vec!["A".into()], vec![]).unwrap();
        ctx.state.load_dataset(dataset, "empty.csv");
        view.on_frame_update(&ctx, 0.0);
        assert_eq!(view.player().position(), 0);
        assert!(!view.player().is_playing());
    }

    #[test]
    fn test_frame_updates_advance_while_playing() {
        let ctx = context();
        let mut view = TimelapseView::new(uuid::Uuid::new_v4(), "Timelapse", &ctx.config.timelapse, ctx.state.events());
        view.player.play();
        view.on_frame_update(&ctx, 0.3);
        assert_eq!(view.player().current_frame(), Some(1974));
        view.on_frame_update(&ctx, 0.3);
        assert_eq!(view.player().current_frame(), Some(1984));
    }
}
