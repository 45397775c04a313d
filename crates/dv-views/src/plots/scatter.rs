//! Scatterplot: one mark per record, placed and sized by the channel mapping

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::{Color32, CursorIcon, Pos2, Sense, Stroke, Ui, Vec2};

use dv_core::events::events::{DatasetLoaded, DimensionChanged, SelectionChanged};
use dv_core::events::{EventBus, Subscription};
use dv_core::{
    Channel, Dataset, DimensionMapping, HighlightSource, MappingError, RecordId, SelectionSet,
    HIGHLIGHT_COLOR, UNSELECTED_COLOR,
};

use super::utils::{draw_bottom_axis, draw_left_axis, with_opacity, ChartMargin, LinearScale};
use crate::{record_tooltip, view_placeholder, SpaceView, SpaceViewId, ViewerContext};

pub const MARGIN: ChartMargin = ChartMargin::new(20.0, 20.0, 30.0, 50.0);

/// Radius range for the size channel
pub const SIZE_RANGE: (f64, f64) = (3.0, 15.0);

/// Radius when the size value is missing or not numeric
pub const DEFAULT_RADIUS: f32 = 5.0;

const FILL_OPACITY: f32 = 0.7;
const HIT_SLOP: f32 = 2.0;

/// Visual state of one mark. Selection persists, hover is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkState {
    Unselected,
    UnselectedHovered,
    Selected,
    SelectedHovered,
}

impl MarkState {
    pub fn new(selected: bool, hovered: bool) -> Self {
        match (selected, hovered) {
            (false, false) => MarkState::Unselected,
            (false, true) => MarkState::UnselectedHovered,
            (true, false) => MarkState::Selected,
            (true, true) => MarkState::SelectedHovered,
        }
    }
}

/// One positioned mark, in chart space (origin at the top-left of the view)
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterMark {
    pub record: RecordId,
    pub center: Pos2,
    pub radius: f32,
    /// Assigned color while selected
    pub selection_color: Option<Color32>,
}

impl ScatterMark {
    pub fn is_selected(&self) -> bool {
        self.selection_color.is_some()
    }

    pub fn state(&self, hovered: bool) -> MarkState {
        MarkState::new(self.is_selected(), hovered)
    }

    pub fn fill(&self, hovered: bool) -> Color32 {
        let base = match (self.state(hovered), self.selection_color) {
            (MarkState::UnselectedHovered, _) => HIGHLIGHT_COLOR,
            (_, Some(color)) => color,
            (_, None) => UNSELECTED_COLOR,
        };
        with_opacity(base, FILL_OPACITY)
    }

    /// Outline; `emphasized` is a highlight coming from another view.
    /// A hovered selected mark keeps its fill and gets the highlight ring.
    pub fn stroke(&self, hovered: bool, emphasized: bool, outline: Color32) -> Stroke {
        if emphasized {
            return Stroke::new(4.0, HIGHLIGHT_COLOR);
        }
        match self.state(hovered) {
            MarkState::Unselected => Stroke::new(0.5, outline),
            MarkState::UnselectedHovered => Stroke::new(1.0, outline),
            MarkState::Selected => Stroke::new(2.0, outline),
            MarkState::SelectedHovered => Stroke::new(3.0, HIGHLIGHT_COLOR),
        }
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.center.distance(pos) <= self.radius + HIT_SLOP
    }
}

/// Everything needed to draw the scatterplot for one state snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterLayout {
    pub size: Vec2,
    pub x_dimension: String,
    pub y_dimension: String,
    pub size_dimension: Option<String>,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    /// Unselected marks first, then selected ones, each in record order
    pub marks: Vec<ScatterMark>,
    /// Records without a numeric X or Y value
    pub skipped: usize,
}

impl ScatterLayout {
    /// Lay out every record for a view of `size`.
    ///
    /// Fails when X or Y cannot be resolved; an unusable size channel only
    /// falls back to the default radius.
    pub fn compute(
        dataset: &Dataset,
        mapping: &DimensionMapping,
        selection: &SelectionSet,
        size: Vec2,
    ) -> Result<Self, MappingError> {
        let x_dimension = mapping.resolve(Channel::ScatterX, dataset)?;
        let y_dimension = mapping.resolve(Channel::ScatterY, dataset)?;
        let size_dimension = mapping.resolve(Channel::Size, dataset).ok();

        let unit = dv_core::Extent::new(0.0, 1.0);
        let x_scale = LinearScale::from_extent(
            dataset.extent(x_dimension).unwrap_or(unit),
            (MARGIN.left as f64, (size.x - MARGIN.right) as f64),
        );
        let y_scale = LinearScale::from_extent(
            dataset.extent(y_dimension).unwrap_or(unit),
            ((size.y - MARGIN.bottom) as f64, MARGIN.top as f64),
        );
        let size_scale = size_dimension
            .and_then(|d| dataset.extent(d))
            .map(|extent| LinearScale::from_extent(extent, SIZE_RANGE));

        let mut marks = Vec::with_capacity(dataset.len());
        let mut skipped = 0;
        for record in dataset.records() {
            let id = record.id();
            let (Some(x), Some(y)) = (dataset.number(id, x_dimension), dataset.number(id, y_dimension)) else {
                skipped += 1;
                continue;
            };
            let radius = match (size_scale, size_dimension.and_then(|d| dataset.number(id, d))) {
                (Some(scale), Some(value)) => scale.map(value) as f32,
                _ => DEFAULT_RADIUS,
            };
            marks.push(ScatterMark {
                record: id,
                center: Pos2::new(x_scale.map(x) as f32, y_scale.map(y) as f32),
                radius,
                selection_color: selection
                    .is_selected(id)
                    .then(|| selection.color_of(id)),
            });
        }
        // Stable: selected marks end up on top without reordering either group
        marks.sort_by_key(ScatterMark::is_selected);

        Ok(Self {
            size,
            x_dimension: x_dimension.to_string(),
            y_dimension: y_dimension.to_string(),
            size_dimension: size_dimension.map(str::to_string),
            x_scale,
            y_scale,
            marks,
            skipped,
        })
    }

    /// Topmost mark under `pos` (chart space)
    pub fn hit_test(&self, pos: Pos2) -> Option<RecordId> {
        self.marks.iter().rev().find(|m| m.contains(pos)).map(|m| m.record)
    }

    pub fn mark(&self, record: RecordId) -> Option<&ScatterMark> {
        self.marks.iter().find(|m| m.record == record)
    }
}

struct CachedLayout {
    generation: u64,
    size: Vec2,
    layout: Result<ScatterLayout, MappingError>,
}

/// Scatterplot view: clicking a mark toggles its selection
pub struct ScatterView {
    id: SpaceViewId,
    title: String,
    stale: Arc<AtomicBool>,
    _subscriptions: [Subscription; 3],
    cache: Option<CachedLayout>,
    hovered: Option<RecordId>,
}

impl ScatterView {
    pub fn new(id: SpaceViewId, title: impl Into<String>, events: &EventBus) -> Self {
        let stale = Arc::new(AtomicBool::new(true));
        let _subscriptions = [
            events.mark_on::<DatasetLoaded>(stale.clone()),
            events.mark_on::<SelectionChanged>(stale.clone()),
            events.mark_on::<DimensionChanged>(stale.clone()),
        ];
        Self {
            id,
            title: title.into(),
            stale,
            _subscriptions,
            cache: None,
            hovered: None,
        }
    }

    pub fn hovered(&self) -> Option<RecordId> {
        self.hovered
    }

    /// Layout drawn by the last frame, if the channels resolved
    pub fn layout(&self) -> Option<&ScatterLayout> {
        self.cache.as_ref().and_then(|c| c.layout.as_ref().ok())
    }

    fn refresh_layout(&mut self, ctx: &ViewerContext, dataset: &Dataset, size: Vec2) {
        let stale = self.stale.swap(false, Ordering::AcqRel);
        let current = self
            .cache
            .as_ref()
            .map(|c| c.generation == dataset.generation() && c.size == size)
            .unwrap_or(false);
        if current && !stale {
            return;
        }
        let layout = ScatterLayout::compute(dataset, &ctx.state.mapping(), &ctx.state.selection(), size);
        if let Err(e) = &layout {
            tracing::debug!("Scatterplot unavailable: {}", e);
        }
        self.cache = Some(CachedLayout {
            generation: dataset.generation(),
            size,
            layout,
        });
    }
}

impl SpaceView for ScatterView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "ScatterView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let state = &ctx.state;
        let Some(dataset) = state.dataset() else {
            view_placeholder(ui, "Load a CSV file to see the scatterplot");
            return;
        };

        let size = ui.available_size().max(Vec2::new(200.0, 150.0));
        self.refresh_layout(ctx, &dataset, size);
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let layout = match &cache.layout {
            Ok(layout) => layout,
            Err(e) => {
                view_placeholder(ui, &format!("Scatterplot unavailable: {}", e));
                return;
            }
        };

        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let origin = response.rect.min;
        let axis_color = ui.visuals().text_color();
        let outline = ui.visuals().extreme_bg_color;

        let hovered = response
            .hover_pos()
            .and_then(|p| layout.hit_test((p - origin).to_pos2()));
        match hovered {
            Some(id) => {
                state.set_highlight(id, HighlightSource::Scatter);
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
            None => state.clear_highlight_from(HighlightSource::Scatter),
        }
        let emphasized = state
            .highlight()
            .filter(|h| h.source != HighlightSource::Scatter)
            .map(|h| h.record);

        draw_bottom_axis(
            &painter,
            origin,
            &layout.x_scale,
            size.y - MARGIN.bottom,
            &layout.x_dimension,
            axis_color,
        );
        draw_left_axis(&painter, origin, &layout.y_scale, MARGIN.left, &layout.y_dimension, axis_color);

        for mark in &layout.marks {
            let is_hovered = hovered == Some(mark.record);
            painter.circle(
                origin + mark.center.to_vec2(),
                mark.radius,
                mark.fill(is_hovered),
                mark.stroke(is_hovered, false, outline),
            );
        }
        // Cross-view highlight drawn last so it is never hidden
        if let Some(mark) = emphasized.and_then(|id| layout.mark(id)) {
            painter.circle(
                origin + mark.center.to_vec2(),
                mark.radius,
                mark.fill(false),
                mark.stroke(false, true, outline),
            );
        }

        if layout.skipped > 0 {
            painter.text(
                response.rect.right_bottom() - Vec2::new(4.0, 2.0),
                egui::Align2::RIGHT_BOTTOM,
                format!("{} records without numeric X/Y", layout.skipped),
                egui::FontId::proportional(10.0),
                ui.visuals().weak_text_color(),
            );
        }

        if response.clicked() {
            if let Some(id) = hovered {
                // A full selection is reported through the notice log
                let _ = state.toggle_selection(id);
                ui.ctx().request_repaint();
            }
        }
        self.hovered = hovered;

        if let Some(id) = hovered {
            let mapping = state.mapping();
            response.on_hover_ui_at_pointer(|ui| record_tooltip(ui, &dataset, &mapping, id));
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
