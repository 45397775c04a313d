//! Dockable views of the dashboard

mod space_view;
mod viewport;
mod time_series_view;
mod timelapse_view;
pub mod plots;
pub mod tables;

pub use space_view::{SpaceView, SpaceViewId};
pub use viewport::{DashboardViews, Viewport};
pub use time_series_view::TimeSeriesView;
pub use timelapse_view::TimelapseView;
pub use tables::{LegendView, TableView};
pub use plots::{BarChartView, HeatmapView, RadarView, ScatterView};

use std::sync::Arc;

use dv_core::{Dataset, DashboardState, DimensionMapping, RecordId};
use dv_data::DashboardConfig;

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Shared dashboard state: dataset, selection, mapping and highlight
    pub state: Arc<DashboardState>,

    /// Chart settings for the auxiliary views
    pub config: Arc<DashboardConfig>,
}

impl ViewerContext {
    pub fn new(state: Arc<DashboardState>, config: Arc<DashboardConfig>) -> Self {
        Self { state, config }
    }
}

/// Centered hint shown when a view has nothing to draw
pub fn view_placeholder(ui: &mut egui::Ui, message: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(egui::RichText::new(message).weak());
    });
}

/// Record label followed by every dimension with its value
pub fn record_tooltip(ui: &mut egui::Ui, dataset: &Dataset, mapping: &DimensionMapping, id: RecordId) {
    let Some(record) = dataset.record(id) else {
        return;
    };
    ui.strong(mapping.record_label(dataset, id));
    egui::Grid::new(("record_tooltip", id.0))
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for (dimension, value) in dataset.dimensions().zip(record.values()) {
                ui.strong(dimension);
                ui.label(value.to_string());
                ui.end_row();
            }
        });
}
