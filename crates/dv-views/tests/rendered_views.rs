use std::sync::Arc;

use dv_core::{Channel, DashboardState, Dataset, RecordId, Value};
use dv_data::DashboardConfig;
use dv_views::{RadarView, ScatterView, SpaceView, ViewerContext};
use egui::{Pos2, RawInput, Rect, Vec2};
use uuid::Uuid;

fn dataset() -> Dataset {
    let n = Value::Number;
    Dataset::new(
        vec!["Year".into(), "A".into(), "B".into()],
        vec![
            vec![n(2000.0), n(1.0), n(10.0)],
            vec![n(2001.0), n(5.0), n(2.0)],
            vec![n(2002.0), n(3.0), n(6.0)],
        ],
    )
    .unwrap()
}

struct Harness {
    egui: egui::Context,
    viewer: ViewerContext,
}

impl Harness {
    fn new() -> Self {
        let state = Arc::new(DashboardState::default());
        state.load_dataset(dataset(), "test.csv");
        Self {
            egui: egui::Context::default(),
            viewer: ViewerContext::new(state, Arc::new(DashboardConfig::default())),
        }
    }

    fn state(&self) -> &DashboardState {
        &self.viewer.state
    }

    fn render(&self, view: &mut dyn SpaceView) {
        let input = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))),
            ..Default::default()
        };
        let _ = self.egui.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| view.ui(&self.viewer, ui));
        });
    }
}

fn polygon_records(radar: &RadarView) -> Vec<RecordId> {
    radar.polygons().iter().map(|p| p.record).collect()
}

#[test]
fn test_radar_redraw_drops_deselected_polygons() {
    let harness = Harness::new();
    let mut radar = RadarView::new(Uuid::new_v4(), "Radar", harness.state().events());

    harness.render(&mut radar);
    assert!(radar.polygons().is_empty());

    harness.state().toggle_selection(RecordId(0)).unwrap();
    harness.state().toggle_selection(RecordId(2)).unwrap();
    harness.render(&mut radar);
    assert_eq!(polygon_records(&radar), vec![RecordId(0), RecordId(2)]);

    harness.state().toggle_selection(RecordId(0)).unwrap();
    harness.render(&mut radar);
    assert_eq!(polygon_records(&radar), vec![RecordId(2)]);

    harness.state().clear_selection();
    harness.render(&mut radar);
    assert!(radar.polygons().is_empty());
}

#[test]
fn test_radar_reload_discards_old_polygons() {
    let harness = Harness::new();
    let mut radar = RadarView::new(Uuid::new_v4(), "Radar", harness.state().events());
    harness.state().toggle_selection(RecordId(1)).unwrap();
    harness.render(&mut radar);
    assert_eq!(radar.polygons().len(), 1);

    harness.state().load_dataset(dataset(), "again.csv");
    harness.render(&mut radar);
    assert!(radar.polygons().is_empty());
}

#[test]
fn test_scatter_redraw_follows_selection_and_mapping() {
    let harness = Harness::new();
    let mut scatter = ScatterView::new(Uuid::new_v4(), "Scatter", harness.state().events());

    harness.render(&mut scatter);
    let layout = scatter.layout().unwrap();
    assert_eq!(layout.marks.len(), 3);
    assert!(layout.marks.iter().all(|m| !m.is_selected()));

    harness.state().toggle_selection(RecordId(1)).unwrap();
    harness.render(&mut scatter);
    let color = harness.state().selection().color_of(RecordId(1));
    let mark = scatter.layout().unwrap().mark(RecordId(1)).unwrap();
    assert_eq!(mark.selection_color, Some(color));

    let before = scatter.layout().unwrap().clone();
    harness.state().set_dimension(Channel::ScatterX, "Year").unwrap();
    harness.render(&mut scatter);
    let after = scatter.layout().unwrap();
    assert_eq!(after.x_dimension, "Year");
    for mark in &after.marks {
        let old = before.mark(mark.record).unwrap();
        assert_eq!(mark.center.y, old.center.y);
    }
}

#[test]
fn test_consecutive_renders_are_identical() {
    let harness = Harness::new();
    let events = harness.state().events();
    let mut radar = RadarView::new(Uuid::new_v4(), "Radar", events);
    let mut scatter = ScatterView::new(Uuid::new_v4(), "Scatter", events);
    harness.state().toggle_selection(RecordId(0)).unwrap();
    harness.state().toggle_selection(RecordId(1)).unwrap();

    harness.render(&mut radar);
    harness.render(&mut scatter);
    let polygons = radar.polygons().to_vec();
    let layout = scatter.layout().cloned();

    harness.render(&mut radar);
    harness.render(&mut scatter);
    assert_eq!(radar.polygons(), polygons.as_slice());
    assert_eq!(scatter.layout().cloned(), layout);
    assert_eq!(polygons.len(), 2);
}
