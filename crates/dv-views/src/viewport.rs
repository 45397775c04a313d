//! Viewport - manages dockable space views
//! Based on Rerun's re_viewport

use std::collections::HashMap;
use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};
use uuid::Uuid;

use crate::plots::{BarChartView, HeatmapView, RadarView, ScatterView};
use crate::tables::{LegendView, TableView};
use crate::{SpaceView, SpaceViewId, TimeSeriesView, TimelapseView, ViewerContext};

/// Ids of the views making up the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardViews {
    pub scatter: SpaceViewId,
    pub radar: SpaceViewId,
    pub legend: SpaceViewId,
    pub table: SpaceViewId,
    /// Tabs of the right-hand column
    pub auxiliary: Vec<SpaceViewId>,
}

/// The main viewport that manages dockable space views
pub struct Viewport {
    dock_state: DockState<SpaceViewId>,
    space_views: HashMap<SpaceViewId, Box<dyn SpaceView>>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            dock_state: DockState::new(vec![]),
            space_views: HashMap::new(),
        }
    }

    /// Add a space view to the viewport
    pub fn add_space_view(&mut self, view: Box<dyn SpaceView>) {
        let id = view.id();
        self.space_views.insert(id, view);

        if self.dock_state.main_surface().is_empty() {
            self.dock_state = DockState::new(vec![id]);
        } else {
            self.dock_state.push_to_first_leaf(id);
        }
    }

    pub fn view_count(&self) -> usize {
        self.space_views.len()
    }

    pub fn view(&self, id: SpaceViewId) -> Option<&dyn SpaceView> {
        self.space_views.get(&id).map(|v| v.as_ref())
    }

    /// Find the first view of a concrete type
    pub fn find_view<T: SpaceView + 'static>(&self) -> Option<&T> {
        self.space_views.values().find_map(|v| v.as_any().downcast_ref::<T>())
    }

    /// Build every dashboard view and dock them:
    /// scatterplot and radar side by side with the legend under the radar,
    /// the table below both, and the auxiliary charts as tabs on the right.
    pub fn create_dashboard_layout(&mut self, ctx: &ViewerContext) -> DashboardViews {
        self.space_views.clear();
        let events = ctx.state.events();

        let scatter = ScatterView::new(Uuid::new_v4(), "Scatterplot", events);
        let radar = RadarView::new(Uuid::new_v4(), "Radar Chart", events);
        let legend = LegendView::new(Uuid::new_v4(), "Selection");
        let table = TableView::new(Uuid::new_v4(), "Data Table");
        let auxiliary: Vec<Box<dyn SpaceView>> = vec![
            Box::new(TimeSeriesView::new(Uuid::new_v4(), "Time Series")),
            Box::new(BarChartView::new(Uuid::new_v4(), "Water Delivery")),
            Box::new(HeatmapView::new(Uuid::new_v4(), "Temperature")),
            Box::new(TimelapseView::new(
                Uuid::new_v4(),
                "Timelapse",
                &ctx.config.timelapse,
                events,
            )),
        ];

        let views = DashboardViews {
            scatter: scatter.id(),
            radar: radar.id(),
            legend: legend.id(),
            table: table.id(),
            auxiliary: auxiliary.iter().map(|v| v.id()).collect(),
        };

        self.space_views.insert(views.scatter, Box::new(scatter));
        self.space_views.insert(views.radar, Box::new(radar));
        self.space_views.insert(views.legend, Box::new(legend));
        self.space_views.insert(views.table, Box::new(table));
        for view in auxiliary {
            self.space_views.insert(view.id(), view);
        }

        self.dock_state = dashboard_dock_state(&views);
        tracing::debug!("Dashboard layout with {} views", self.space_views.len());
        views
    }

    /// Per-frame updates for every view, visible or not
    pub fn on_frame_update(&mut self, viewer_context: &ViewerContext, dt: f32) {
        for view in self.space_views.values_mut() {
            view.on_frame_update(viewer_context, dt);
        }
    }

    /// Draw the viewport
    pub fn ui(&mut self, ui: &mut Ui, viewer_context: &ViewerContext) {
        let available_rect = ui.available_rect_before_wrap();

        ui.allocate_ui(available_rect.size(), |ui| {
            DockArea::new(&mut self.dock_state)
                .show_close_buttons(false)
                .draggable_tabs(true)
                .show_tab_name_on_hover(true)
                .show_inside(ui, &mut ViewportTabViewer {
                    space_views: &mut self.space_views,
                    viewer_context,
                });
        });
    }
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    space_views: &'a mut HashMap<SpaceViewId, Box<dyn SpaceView>>,
    viewer_context: &'a ViewerContext,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = SpaceViewId;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        if let Some(view) = self.space_views.get(tab) {
            view.display_name().into()
        } else {
            "Unknown".into()
        }
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        if let Some(view) = self.space_views.get_mut(tab) {
            view.ui(self.viewer_context, ui);
        }
    }
}

fn dashboard_dock_state(views: &DashboardViews) -> DockState<SpaceViewId> {
    let mut dock_state = DockState::new(vec![views.scatter]);
    let surface = dock_state.main_surface_mut();

    let [left, _aux] = surface.split_right(NodeIndex::root(), 0.64, views.auxiliary.clone());
    let [top, _table] = surface.split_below(left, 0.6, vec![views.table]);
    let [_scatter, radar] = surface.split_right(top, 0.5, vec![views.radar]);
    surface.split_below(radar, 0.75, vec![views.legend]);

    dock_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use dv_core::DashboardState;
    use dv_data::DashboardConfig;

    #[test]
    fn test_dashboard_layout_builds_every_view() {
        let ctx = ViewerContext::new(Arc::new(DashboardState::default()), Arc::new(DashboardConfig::default()));
        let mut viewport = Viewport::new();
        let views = viewport.create_dashboard_layout(&ctx);

        assert_eq!(viewport.view_count(), 8);
        assert_eq!(views.auxiliary.len(), 4);
        assert_eq!(viewport.view(views.scatter).map(|v| v.view_type()), Some("ScatterView"));
        assert_eq!(viewport.view(views.radar).map(|v| v.view_type()), Some("RadarView"));
        assert!(viewport.find_view::<TimelapseView>().is_some());

        // Rebuilding replaces the views rather than adding to them
        viewport.create_dashboard_layout(&ctx);
        assert_eq!(viewport.view_count(), 8);
    }

    #[test]
    fn test_layout_reset_keeps_subscriber_count_flat() {
        use dv_core::events::events::{DatasetLoaded, SelectionChanged};

        let ctx = ViewerContext::new(Arc::new(DashboardState::default()), Arc::new(DashboardConfig::default()));
        let events = ctx.state.events();
        let mut viewport = Viewport::new();
        viewport.create_dashboard_layout(&ctx);
        let selection_subs = events.subscriber_count::<SelectionChanged>();
        let loaded_subs = events.subscriber_count::<DatasetLoaded>();
        assert!(selection_subs > 0);

        for _ in 0..5 {
            viewport.create_dashboard_layout(&ctx);
            assert_eq!(events.subscriber_count::<SelectionChanged>(), selection_subs);
            assert_eq!(events.subscriber_count::<DatasetLoaded>(), loaded_subs);
        }
    }
}
