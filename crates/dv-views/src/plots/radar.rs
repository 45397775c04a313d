//! Radar/Spider chart comparing the selected records across numeric dimensions

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::epaint::Mesh;
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use dv_core::events::events::{DatasetLoaded, SelectionChanged};
use dv_core::events::{EventBus, Subscription};
use dv_core::{Dataset, HighlightSource, RecordId, SelectionSet};

use super::utils::{with_opacity, LinearScale};
use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

/// Concentric grid polygons
pub const GRID_LEVELS: usize = 5;

/// Axis length as a share of the half extent of the view
pub const AXIS_EXTENT: f32 = 0.75;

/// Distance of the axis labels as a share of the half extent
pub const LABEL_EXTENT: f32 = 0.8;

pub const EMPTY_SELECTION_HINT: &str = "Click on scatterplot points to add them to radar chart";

const FILL_OPACITY: f32 = 0.1;
const HOVER_FILL_OPACITY: f32 = 0.3;
const STROKE_WIDTH: f32 = 2.0;
const VERTEX_RADIUS: f32 = 3.0;

/// Angle of axis `index` out of `count`; the first axis points straight up
pub fn axis_angle(index: usize, count: usize) -> f32 {
    index as f32 * TAU / count.max(1) as f32 - FRAC_PI_2
}

/// Offset from the center at `radius` along an axis (screen coordinates, y down)
fn polar(radius: f32, angle: f32) -> Vec2 {
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub dimension: String,
    pub angle: f32,
    /// Per-dimension scale from the extent onto `[0, radius]`
    pub scale: LinearScale,
    pub end: Vec2,
    pub label_pos: Vec2,
}

/// Axes and grid; they depend on the dataset and the view size only
#[derive(Debug, Clone, PartialEq)]
pub struct RadarFrame {
    pub radius: f32,
    pub axes: Vec<RadarAxis>,
    /// One closed ring per grid level, innermost first
    pub grid: Vec<Vec<Vec2>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarVertex {
    pub dimension: String,
    /// Raw value, `None` when the record has no number for this dimension
    pub value: Option<f64>,
    pub offset: Vec2,
}

/// One selected record as a closed polygon
#[derive(Debug, Clone, PartialEq)]
pub struct RadarPolygon {
    pub record: RecordId,
    pub color: Color32,
    pub vertices: Vec<RadarVertex>,
}

impl RadarPolygon {
    /// Vertex offsets with the first one repeated at the end
    pub fn closed_outline(&self) -> Vec<Vec2> {
        let mut points: Vec<Vec2> = self.vertices.iter().map(|v| v.offset).collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }

    /// Whether `p` (relative to the center) lies inside the polygon
    pub fn contains(&self, p: Vec2) -> bool {
        let pts: Vec<Vec2> = self.vertices.iter().map(|v| v.offset).collect();
        if pts.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn vertex_at(&self, p: Vec2) -> Option<&RadarVertex> {
        self.vertices
            .iter()
            .find(|v| (v.offset - p).length() <= VERTEX_RADIUS + 2.0)
    }
}

impl RadarFrame {
    /// Axes for every measurement dimension of the dataset.
    ///
    /// The label dimension is left out; a dataset whose only numeric column is
    /// the label still gets that one axis.
    pub fn compute(dataset: &Dataset, size: Vec2) -> Self {
        let half = size.x.min(size.y) / 2.0;
        let radius = half * AXIS_EXTENT;

        let mut dimensions = dataset.value_dimensions();
        if dimensions.is_empty() {
            dimensions = dataset.numeric_dimensions();
        }
        let count = dimensions.len();

        let axes = dimensions
            .iter()
            .enumerate()
            .map(|(i, dim)| {
                let angle = axis_angle(i, count);
                let extent = dataset.extent(dim).unwrap_or(dv_core::Extent::new(0.0, 1.0));
                RadarAxis {
                    dimension: dim.to_string(),
                    angle,
                    scale: LinearScale::from_extent(extent, (0.0, radius as f64)),
                    end: polar(radius, angle),
                    label_pos: polar(half * LABEL_EXTENT, angle),
                }
            })
            .collect::<Vec<_>>();

        let grid = (1..=GRID_LEVELS)
            .map(|level| {
                let r = radius * level as f32 / GRID_LEVELS as f32;
                axes.iter().map(|a| polar(r, a.angle)).collect()
            })
            .collect();

        Self { radius, axes, grid }
    }

    /// Exactly one polygon per selected record, in selection order
    pub fn polygons(&self, dataset: &Dataset, selection: &SelectionSet) -> Vec<RadarPolygon> {
        selection
            .iter()
            .filter(|s| dataset.contains(s.id))
            .map(|selected| RadarPolygon {
                record: selected.id,
                color: selected.color(),
                vertices: self
                    .axes
                    .iter()
                    .map(|axis| {
                        let value = dataset.number(selected.id, &axis.dimension);
                        // Missing values collapse onto the center
                        let r = value.map(|v| axis.scale.map(v) as f32).unwrap_or(0.0);
                        RadarVertex {
                            dimension: axis.dimension.clone(),
                            value,
                            offset: polar(r, axis.angle),
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

struct CachedFrame {
    generation: u64,
    size: Vec2,
    frame: RadarFrame,
}

/// Radar chart view
pub struct RadarView {
    id: SpaceViewId,
    title: String,
    selection_stale: Arc<AtomicBool>,
    _subscriptions: [Subscription; 2],
    frame: Option<CachedFrame>,
    polygons: Vec<RadarPolygon>,
}

impl RadarView {
    pub fn new(id: SpaceViewId, title: impl Into<String>, events: &EventBus) -> Self {
        let selection_stale = Arc::new(AtomicBool::new(true));
        let _subscriptions = [
            events.mark_on::<SelectionChanged>(selection_stale.clone()),
            events.mark_on::<DatasetLoaded>(selection_stale.clone()),
        ];
        Self {
            id,
            title: title.into(),
            selection_stale,
            _subscriptions,
            frame: None,
            polygons: Vec::new(),
        }
    }

    /// Polygons currently drawn
    pub fn polygons(&self) -> &[RadarPolygon] {
        &self.polygons
    }

    fn refresh(&mut self, ctx: &ViewerContext, dataset: &Dataset, size: Vec2) {
        let frame_current = self
            .frame
            .as_ref()
            .map(|f| f.generation == dataset.generation() && f.size == size)
            .unwrap_or(false);
        if !frame_current {
            self.frame = Some(CachedFrame {
                generation: dataset.generation(),
                size,
                frame: RadarFrame::compute(dataset, size),
            });
        }

        let selection_stale = self.selection_stale.swap(false, Ordering::AcqRel);
        if selection_stale || !frame_current {
            if let Some(cached) = &self.frame {
                self.polygons = cached.frame.polygons(dataset, &ctx.state.selection());
            }
        }
    }
}

fn fill_polygon(painter: &egui::Painter, center: Pos2, polygon: &RadarPolygon, color: Color32) {
    let n = polygon.vertices.len();
    if n < 3 {
        return;
    }
    // Fan from the center; every vertex is visible from it
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for v in &polygon.vertices {
        mesh.colored_vertex(center + v.offset, color);
    }
    for i in 0..n {
        let a = 1 + i as u32;
        let b = 1 + ((i + 1) % n) as u32;
        mesh.add_triangle(0, a, b);
    }
    painter.add(Shape::mesh(mesh));
}

impl SpaceView for RadarView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "RadarView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let state = &ctx.state;
        let Some(dataset) = state.dataset() else {
            view_placeholder(ui, "Load a CSV file to compare records");
            return;
        };

        let size = ui.available_size().max(Vec2::new(200.0, 200.0));
        self.refresh(ctx, &dataset, size);
        let Some(cached) = self.frame.as_ref() else {
            return;
        };
        let frame = &cached.frame;
        if frame.axes.is_empty() {
            view_placeholder(ui, "The dataset has no numeric dimensions");
            return;
        }

        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let center = response.rect.center();
        let grid_color = ui.visuals().weak_text_color();
        let text_color = ui.visuals().text_color();

        for ring in &frame.grid {
            let points: Vec<Pos2> = ring.iter().map(|o| center + *o).collect();
            if points.len() >= 3 {
                painter.add(Shape::closed_line(points, Stroke::new(0.5, grid_color)));
            }
        }
        for axis in &frame.axes {
            painter.line_segment([center, center + axis.end], Stroke::new(1.0, text_color));
            painter.text(
                center + axis.label_pos,
                Align2::CENTER_CENTER,
                &axis.dimension,
                FontId::proportional(10.0),
                text_color,
            );
        }

        if self.polygons.is_empty() {
            painter.text(
                response.rect.center_bottom() - Vec2::new(0.0, 8.0),
                Align2::CENTER_BOTTOM,
                EMPTY_SELECTION_HINT,
                FontId::proportional(12.0),
                ui.visuals().weak_text_color(),
            );
            state.clear_highlight_from(HighlightSource::Radar);
            return;
        }

        let pointer = response.hover_pos().map(|p| p - center);
        let hovered_vertex = pointer.and_then(|p| {
            self.polygons
                .iter()
                .rev()
                .find_map(|poly| poly.vertex_at(p).map(|v| (poly.record, v.clone())))
        });
        let hovered = hovered_vertex.as_ref().map(|(id, _)| *id).or_else(|| {
            pointer.and_then(|p| self.polygons.iter().rev().find(|poly| poly.contains(p)).map(|poly| poly.record))
        });
        match hovered {
            Some(id) => state.set_highlight(id, HighlightSource::Radar),
            None => state.clear_highlight_from(HighlightSource::Radar),
        }
        // Records highlighted from the table or the scatterplot light up here too
        let emphasized = hovered.or_else(|| state.highlight().map(|h| h.record));

        for polygon in &self.polygons {
            let active = emphasized == Some(polygon.record);
            let opacity = if active { HOVER_FILL_OPACITY } else { FILL_OPACITY };
            fill_polygon(&painter, center, polygon, with_opacity(polygon.color, opacity));

            let outline: Vec<Pos2> = polygon.closed_outline().iter().map(|o| center + *o).collect();
            let width = if active { STROKE_WIDTH + 1.0 } else { STROKE_WIDTH };
            painter.add(Shape::line(outline, Stroke::new(width, polygon.color)));

            for v in &polygon.vertices {
                painter.circle(
                    center + v.offset,
                    VERTEX_RADIUS,
                    polygon.color,
                    Stroke::new(1.0, Color32::WHITE),
                );
            }
        }

        if let Some((record, vertex)) = hovered_vertex {
            let label = ctx.state.mapping().record_label(&dataset, record);
            response.on_hover_ui_at_pointer(|ui| {
                ui.strong(label);
                let value = vertex.value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string());
                ui.label(format!("{}: {}", vertex.dimension, value));
            });
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
    use dv_core::{Value, SELECTION_PALETTE};

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Year".into(), "A".into(), "B".into()],
            vec![vec![n(2000.0), n(1.0), n(10.0)], vec![n(2001.0), n(5.0), n(2.0)]],
        )
        .unwrap()
    }

    const SIZE: Vec2 = Vec2::new(500.0, 500.0);

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_first_axis_points_up() {
        assert!((axis_angle(0, 5) + FRAC_PI_2).abs() < 1e-6);
        let frame = RadarFrame::compute(&dataset(), SIZE);
        assert!(close(frame.axes[0].end, Vec2::new(0.0, -frame.radius)));
    }

    #[test]
    fn test_single_selection_scenario() {
        let ds = dataset();
        let frame = RadarFrame::compute(&ds, SIZE);
        assert_eq!(frame.radius, 250.0 * AXIS_EXTENT);
        let dims: Vec<_> = frame.axes.iter().map(|a| a.dimension.as_str()).collect();
        assert_eq!(dims, vec!["A", "B"]);

        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(0)).unwrap();
        let polygons = frame.polygons(&ds, &selection);

        assert_eq!(polygons.len(), 1);
        let poly = &polygons[0];
        assert_eq!(poly.color, SELECTION_PALETTE[0]);
        assert_eq!(poly.vertices.len(), 2);
        assert_eq!(poly.closed_outline().len(), 3);
        // A = 1 is the minimum of [1, 5]: the vertex sits on the center
        assert!(close(poly.vertices[0].offset, Vec2::ZERO));
        // B = 10 is the maximum of [2, 10]: full radius on the second axis, pointing down
        assert!(close(poly.vertices[1].offset, Vec2::new(0.0, frame.radius)));

        selection.toggle(RecordId(0)).unwrap();
        assert!(frame.polygons(&ds, &selection).is_empty());
    }

    #[test]
    fn test_every_polygon_has_one_vertex_per_axis() {
        let ds = Dataset::new(
            vec!["Name".into(), "P".into(), "Q".into(), "R".into(), "S".into()],
            (0..6)
                .map(|i| {
                    vec![
                        Value::Text(format!("r{}", i)),
                        n(i as f64),
                        n((i * i) as f64),
                        n(10.0 - i as f64),
                        n(3.0),
                    ]
                })
                .collect(),
        )
        .unwrap();
        let frame = RadarFrame::compute(&ds, SIZE);
        let mut selection = SelectionSet::new();
        for i in [5, 1, 3] {
            selection.toggle(RecordId(i)).unwrap();
        }

        let polygons = frame.polygons(&ds, &selection);
        let order: Vec<_> = polygons.iter().map(|p| p.record).collect();
        assert_eq!(order, vec![RecordId(5), RecordId(1), RecordId(3)]);
        for poly in &polygons {
            assert_eq!(poly.vertices.len(), 4);
            assert_eq!(poly.closed_outline().first(), poly.closed_outline().last());
        }
        // Constant column: zero-width extent lands mid-axis
        let s = &polygons[0].vertices[3];
        assert!(((s.offset.length()) - frame.radius / 2.0).abs() < 1e-3);
        assert_eq!(frame.grid.len(), GRID_LEVELS);
        assert!(frame.grid.iter().all(|ring| ring.len() == 4));
    }

    #[test]
    fn test_missing_value_collapses_to_center() {
        let ds = Dataset::new(
            vec!["Name".into(), "A".into(), "B".into(), "C".into()],
            vec![
                vec![Value::Text("x".into()), n(1.0), Value::Text("".into()), n(2.0)],
                vec![Value::Text("y".into()), n(3.0), n(4.0), n(6.0)],
            ],
        )
        .unwrap();
        let frame = RadarFrame::compute(&ds, SIZE);
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(0)).unwrap();
        let poly = &frame.polygons(&ds, &selection)[0];
        assert_eq!(poly.vertices[1].value, None);
        assert_eq!(poly.vertices[1].offset, Vec2::ZERO);
    }

    #[test]
    fn test_polygon_hit_testing() {
        let ds = Dataset::new(
            vec!["Name".into(), "A".into(), "B".into(), "C".into()],
            vec![
                vec![Value::Text("lo".into()), n(0.0), n(0.0), n(0.0)],
                vec![Value::Text("hi".into()), n(1.0), n(1.0), n(1.0)],
            ],
        )
        .unwrap();
        let frame = RadarFrame::compute(&ds, SIZE);
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(1)).unwrap();
        let poly = &frame.polygons(&ds, &selection)[0];

        assert!(poly.contains(Vec2::new(0.0, -10.0)));
        assert!(!poly.contains(Vec2::new(0.0, -frame.radius - 10.0)));
        assert!(poly.vertex_at(poly.vertices[2].offset).is_some());
    }
}
