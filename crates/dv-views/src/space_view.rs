//! Space view abstraction - base trait for all dockable views

use egui::Ui;
use uuid::Uuid;

use crate::ViewerContext;

/// Unique identifier for a space view
pub type SpaceViewId = Uuid;

/// Base trait for all space views (plots, tables, etc)
///
/// Views read the shared dashboard state from the context on every frame and
/// write back only through its mutators, so the state stays the single source
/// of truth for selection, mapping and highlight.
pub trait SpaceView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> SpaceViewId;

    /// Get the display name
    fn display_name(&self) -> &str;

    /// Get the view type
    fn view_type(&self) -> &str;

    /// Draw the UI
    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui);

    /// Called each frame for updates, whether or not the view is visible
    fn on_frame_update(&mut self, _ctx: &ViewerContext, _dt: f32) {}

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get as any mut for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
