//! Year × month temperature heatmap with a monthly drill-down chart

use egui::{pos2, vec2, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, Vec2};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

use dv_core::{Dataset, Extent};
use dv_data::config::HeatmapConfig;

use super::utils::{format_tick, heat_color, BandScale, ChartMargin, LinearScale};
use super::HEATMAP_DATASET;
use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

const MARGIN: ChartMargin = ChartMargin::new(10.0, 70.0, 24.0, 46.0);
const LEGEND_WIDTH: f32 = 14.0;
const SELECTED_STROKE: Color32 = Color32::from_rgb(0x00, 0xff, 0x00);
const HOVER_STROKE: Color32 = Color32::from_rgb(0xff, 0xff, 0x00);
const DRILL_DOWN_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

pub const NO_DATA_FOR_YEAR: &str = "No data for this year.";

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub year: i64,
    /// Calendar position of the month
    pub month: usize,
    pub value: f64,
}

/// Long-format (year, month, value) rows pivoted into a year × month grid
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGrid {
    /// Ascending
    pub years: Vec<i64>,
    /// Display names in calendar order
    pub months: Vec<String>,
    pub cells: Vec<HeatCell>,
    pub extent: Extent,
    /// Year of the first raw row, the initial drill-down year
    pub first_year: Option<i64>,
}

impl HeatGrid {
    pub fn compute(dataset: &Dataset, config: &HeatmapConfig) -> Result<Self, String> {
        for dim in [&config.year_dimension, &config.month_dimension, &config.value_dimension] {
            if !dataset.has_dimension(dim) {
                return Err(format!("no '{}' column", dim));
            }
        }

        let mut first_year = None;
        let mut cells: Vec<HeatCell> = Vec::new();
        for record in dataset.records() {
            let Some(year) = dataset.number(record.id(), &config.year_dimension) else {
                continue;
            };
            let year = year.round() as i64;
            first_year.get_or_insert(year);

            let month_key = dataset
                .value(record.id(), &config.month_dimension)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let (Some(month), Some(value)) = (
                config.month_index(month_key.trim()),
                dataset.number(record.id(), &config.value_dimension),
            ) else {
                continue;
            };
            // First row of a (year, month) pair wins
            if !cells.iter().any(|c| c.year == year && c.month == month) {
                cells.push(HeatCell { year, month, value });
            }
        }

        let mut years: Vec<i64> = cells.iter().map(|c| c.year).collect();
        years.sort_unstable();
        years.dedup();

        let extent = Extent::of(cells.iter().map(|c| c.value)).ok_or_else(|| "no temperature values".to_string())?;

        Ok(Self {
            years,
            months: config.months.iter().map(|m| m.name.clone()).collect(),
            cells,
            extent,
            first_year,
        })
    }

    /// Values of one year's months in calendar order, months without data left out
    pub fn months_of(&self, year: i64) -> Vec<(usize, f64)> {
        let mut months: Vec<(usize, f64)> = self
            .cells
            .iter()
            .filter(|c| c.year == year)
            .map(|c| (c.month, c.value))
            .collect();
        months.sort_by_key(|(month, _)| *month);
        months
    }

    pub fn color_of(&self, value: f64) -> Color32 {
        heat_color(value, self.extent.min, self.extent.max)
    }

    fn year_index(&self, year: i64) -> Option<usize> {
        self.years.iter().position(|y| *y == year)
    }
}

/// Where the cells go inside a plotting rectangle
struct GridPlacement {
    rect: Rect,
    months: BandScale,
    /// Earliest year at the bottom
    years: BandScale,
}

impl GridPlacement {
    fn new(rect: Rect, grid: &HeatGrid) -> Self {
        Self {
            rect,
            months: BandScale::new(grid.months.len(), (0.0, rect.width() as f64)),
            years: BandScale::new(grid.years.len(), (0.0, rect.height() as f64)),
        }
    }

    fn cell_rect(&self, grid: &HeatGrid, cell: &HeatCell) -> Option<Rect> {
        let x = self.months.position(cell.month)?;
        let y_index = grid.year_index(cell.year)?;
        // Band 0 is at the bottom
        let y = self.years.position(grid.years.len() - 1 - y_index)?;
        Some(Rect::from_min_size(
            self.rect.min + vec2(x as f32, y as f32),
            vec2(self.months.bandwidth() as f32, self.years.bandwidth() as f32),
        ))
    }
}

pub struct HeatmapView {
    id: SpaceViewId,
    title: String,
    /// Year shown in the drill-down chart
    drill_down_year: Option<i64>,
    /// Generation of the dataset the drill-down year was picked from
    generation: Option<u64>,
}

impl HeatmapView {
    pub fn new(id: SpaceViewId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            drill_down_year: None,
            generation: None,
        }
    }

    pub fn drill_down_year(&self) -> Option<i64> {
        self.drill_down_year
    }

    pub fn set_drill_down_year(&mut self, year: i64) {
        tracing::debug!("Heatmap drill-down year {}", year);
        self.drill_down_year = Some(year);
    }

    fn draw_grid(&mut self, ui: &mut Ui, grid: &HeatGrid, size: Vec2) {
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let outer = response.rect;
        let rect = Rect::from_min_max(
            outer.min + vec2(MARGIN.left, MARGIN.top),
            outer.max - vec2(MARGIN.right, MARGIN.bottom),
        );
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let placement = GridPlacement::new(rect, grid);
        let text_color = ui.visuals().text_color();
        let pointer = response.hover_pos();

        let mut hovered: Option<&HeatCell> = None;
        for cell in &grid.cells {
            let Some(cell_rect) = placement.cell_rect(grid, cell) else {
                continue;
            };
            painter.rect_filled(cell_rect, 0.0, grid.color_of(cell.value));
            if pointer.map(|p| cell_rect.contains(p)).unwrap_or(false) {
                hovered = Some(cell);
            }
        }

        // Outlines on top of every fill
        for cell in &grid.cells {
            let Some(cell_rect) = placement.cell_rect(grid, cell) else {
                continue;
            };
            if Some(cell.year) == self.drill_down_year {
                painter.rect_stroke(cell_rect, 0.0, Stroke::new(2.0, SELECTED_STROKE));
            } else if hovered == Some(cell) {
                painter.rect_stroke(cell_rect, 0.0, Stroke::new(2.0, HOVER_STROKE));
            }
        }

        for (i, month) in grid.months.iter().enumerate() {
            if let Some(x) = placement.months.position(i) {
                let center = x + placement.months.bandwidth() / 2.0;
                painter.text(
                    pos2(rect.left() + center as f32, rect.bottom() + 3.0),
                    Align2::CENTER_TOP,
                    month,
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        }
        // Thin out year labels so they never overlap
        let label_every = ((14.0 / placement.years.bandwidth().max(1.0)).ceil() as usize).max(1);
        for (i, year) in grid.years.iter().enumerate() {
            if i % label_every != 0 {
                continue;
            }
            if let Some(y) = placement.years.position(grid.years.len() - 1 - i) {
                let center = y + placement.years.bandwidth() / 2.0;
                painter.text(
                    pos2(rect.left() - 4.0, rect.top() + center as f32),
                    Align2::RIGHT_CENTER,
                    year.to_string(),
                    FontId::proportional(10.0),
                    text_color,
                );
            }
        }

        draw_color_legend(&painter, grid, rect, text_color);

        if let Some(cell) = hovered.cloned() {
            if response.clicked() {
                self.set_drill_down_year(cell.year);
            }
            let month = grid.months.get(cell.month).cloned().unwrap_or_default();
            response
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .on_hover_ui_at_pointer(|ui| {
                    ui.label(format!("Year: {}", cell.year));
                    ui.label(format!("Month: {}", month));
                    ui.label(format!("Temp: {}°C", cell.value));
                });
        }
    }

    fn draw_drill_down(&self, ui: &mut Ui, grid: &HeatGrid) {
        let Some(year) = self.drill_down_year else {
            return;
        };
        ui.strong(format!("Monthly temperature - Year {}", year));
        let months = grid.months_of(year);
        if months.is_empty() {
            view_placeholder(ui, NO_DATA_FOR_YEAR);
            return;
        }

        let names = grid.months.clone();
        let points: Vec<[f64; 2]> = months.iter().map(|(m, v)| [*m as f64 + 1.0, *v]).collect();
        Plot::new(("heatmap_drill_down", self.id))
            .x_axis_label("Month")
            .y_axis_label("Temperature (°C)")
            .include_x(0.5)
            .include_x(names.len() as f64 + 0.5)
            .allow_scroll(false)
            .label_formatter(move |_name, value| {
                let index = value.x.round() as usize;
                let month = index.checked_sub(1).and_then(|i| names.get(i)).cloned().unwrap_or_default();
                format!("{}\n{:.1}°C", month, value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(PlotPoints::new(points.clone())).color(DRILL_DOWN_COLOR).width(2.0));
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .color(DRILL_DOWN_COLOR)
                        .radius(4.0)
                        .shape(MarkerShape::Circle),
                );
            });
    }
}

fn draw_color_legend(painter: &egui::Painter, grid: &HeatGrid, rect: Rect, text_color: Color32) {
    let height = rect.height().min(200.0);
    let left = rect.right() + 12.0;
    let steps = 20;
    let slice = height / steps as f32;
    for i in 0..steps {
        // Bottom of the bar is the minimum
        let t = (i as f64 + 0.5) / steps as f64;
        let value = grid.extent.min + t * grid.extent.span();
        let top = rect.top() + height - (i + 1) as f32 * slice;
        painter.rect_filled(
            Rect::from_min_size(pos2(left, top), vec2(LEGEND_WIDTH, slice + 0.5)),
            0.0,
            grid.color_of(value),
        );
    }

    let scale = LinearScale::new(
        (grid.extent.min, grid.extent.max),
        ((rect.top() + height) as f64, rect.top() as f64),
    );
    let step = scale.tick_step(5);
    for tick in scale.ticks(5) {
        painter.text(
            pos2(left + LEGEND_WIDTH + 3.0, scale.map(tick) as f32),
            Align2::LEFT_CENTER,
            format_tick(tick, step),
            FontId::proportional(9.0),
            text_color,
        );
    }
}

impl SpaceView for HeatmapView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "HeatmapView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let config = &ctx.config.heatmap;
        let Some(dataset) = ctx.state.auxiliary(HEATMAP_DATASET) else {
            view_placeholder(ui, &format!("{} is not loaded", config.path.display()));
            return;
        };
        let grid = match HeatGrid::compute(&dataset, config) {
            Ok(grid) => grid,
            Err(e) => {
                view_placeholder(ui, &format!("Heatmap unavailable: {}", e));
                return;
            }
        };

        if self.generation != Some(dataset.generation()) {
            self.generation = Some(dataset.generation());
            self.drill_down_year = grid.first_year;
        }

        let available = ui.available_size();
        let grid_height = (available.y * 0.6).max(120.0);
        self.draw_grid(ui, &grid, vec2(available.x, grid_height));
        ui.separator();
        self.draw_drill_down(ui, &grid);
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
    use dv_core::Value;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn t(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Year".into(), "Month".into(), "Temperature".into()],
            vec![
                vec![n(2001.0), t("III"), n(5.0)],
                vec![n(2000.0), t("II"), n(-3.0)],
                vec![n(2001.0), t("I"), n(-8.0)],
                vec![n(2001.0), t("I"), n(99.0)],
                vec![n(2000.0), t("XIII"), n(1.0)],
                vec![n(2000.0), t("XII"), n(27.5)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_pivot() {
        let grid = HeatGrid::compute(&dataset(), &HeatmapConfig::default()).unwrap();
        assert_eq!(grid.years, vec![2000, 2001]);
        assert_eq!(grid.months.len(), 12);
        assert_eq!(grid.months[0], "Jan");
        // Unknown month keys are dropped, duplicates keep the first row
        assert_eq!(grid.cells.len(), 4);
        assert_eq!(grid.extent, Extent::new(-8.0, 27.5));
        assert_eq!(grid.first_year, Some(2001));
    }

    #[test]
    fn test_drill_down_months_in_calendar_order() {
        let grid = HeatGrid::compute(&dataset(), &HeatmapConfig::default()).unwrap();
        assert_eq!(grid.months_of(2001), vec![(0, -8.0), (2, 5.0)]);
        assert_eq!(grid.months_of(2000), vec![(1, -3.0), (11, 27.5)]);
        assert!(grid.months_of(1999).is_empty());
    }

    #[test]
    fn test_hot_is_red_and_cold_is_blue() {
        let grid = HeatGrid::compute(&dataset(), &HeatmapConfig::default()).unwrap();
        let hot = grid.color_of(27.5);
        let cold = grid.color_of(-8.0);
        assert!(hot.r() > hot.b());
        assert!(cold.b() > cold.r());
    }

    #[test]
    fn test_earliest_year_at_the_bottom() {
        let grid = HeatGrid::compute(&dataset(), &HeatmapConfig::default()).unwrap();
        let placement = GridPlacement::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(120.0, 100.0)), &grid);
        let early = placement.cell_rect(&grid, &grid.cells[1]).unwrap();
        let late = placement.cell_rect(&grid, &grid.cells[0]).unwrap();
        assert!(early.top() > late.top());
        assert_eq!(early.width(), 10.0);
    }

    #[test]
    fn test_missing_columns() {
        let ds = Dataset::new(vec!["Year".into()], vec![vec![n(2000.0)]]).unwrap();
        assert!(HeatGrid::compute(&ds, &HeatmapConfig::default()).is_err());
    }
}
