//! Time series view: one measurement plotted against the year

use egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

use dv_core::{Channel, Dataset, DimensionMapping, Extent, MappingError, RecordId, SelectionSet};

use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

/// Share of the extent added on each side of both axes
pub const AXIS_PADDING: f64 = 0.05;

const LINE_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub x_dimension: String,
    pub y_dimension: String,
    /// `(record, [x, y])` sorted by x
    pub points: Vec<(RecordId, [f64; 2])>,
    pub x_bounds: Extent,
    pub y_bounds: Extent,
}

impl LineSeries {
    /// Pair `x_dimension` with the dimension bound to the line channel.
    ///
    /// Records missing either value are left out.
    pub fn compute(dataset: &Dataset, mapping: &DimensionMapping, x_dimension: &str) -> Result<Self, MappingError> {
        if !dataset.has_dimension(x_dimension) {
            return Err(MappingError::Missing {
                channel: Channel::LineY,
                dimension: x_dimension.to_string(),
            });
        }
        if !dataset.is_numeric(x_dimension) {
            return Err(MappingError::NotNumeric {
                channel: Channel::LineY,
                dimension: x_dimension.to_string(),
            });
        }
        let y_dimension = mapping.resolve(Channel::LineY, dataset)?;

        let mut points: Vec<(RecordId, [f64; 2])> = dataset
            .records()
            .iter()
            .filter_map(|r| {
                let x = dataset.number(r.id(), x_dimension)?;
                let y = dataset.number(r.id(), y_dimension)?;
                Some((r.id(), [x, y]))
            })
            .collect();
        points.sort_by(|a, b| a.1[0].total_cmp(&b.1[0]));

        let x_bounds = Extent::of(points.iter().map(|(_, p)| p[0]))
            .unwrap_or(Extent::new(0.0, 1.0))
            .padded(AXIS_PADDING);
        let y_bounds = Extent::of(points.iter().map(|(_, p)| p[1]))
            .unwrap_or(Extent::new(0.0, 1.0))
            .padded(AXIS_PADDING);

        Ok(Self {
            x_dimension: x_dimension.to_string(),
            y_dimension: y_dimension.to_string(),
            points,
            x_bounds,
            y_bounds,
        })
    }
}

pub struct TimeSeriesView {
    id: SpaceViewId,
    title: String,
}

impl TimeSeriesView {
    pub fn new(id: SpaceViewId, title: impl Into<String>) -> Self {
        Self { id, title: title.into() }
    }
}

fn draw_series(ui: &mut Ui, id: SpaceViewId, series: &LineSeries, y_label: &str, selection: &SelectionSet) {
    let x_name = series.x_dimension.clone();
    let y_name = y_label.to_string();
    let plot = Plot::new(("time_series", id))
        .x_axis_label(&series.x_dimension)
        .y_axis_label(y_label)
        .include_x(series.x_bounds.min)
        .include_x(series.x_bounds.max)
        .include_y(series.y_bounds.min)
        .include_y(series.y_bounds.max)
        .allow_scroll(false)
        .label_formatter(move |_name, value| format!("{}: {:.0}\n{}: {:.2}", x_name, value.x, y_name, value.y));

    let coords: Vec<[f64; 2]> = series.points.iter().map(|(_, p)| *p).collect();
    plot.show(ui, |plot_ui| {
        plot_ui.line(Line::new(PlotPoints::new(coords.clone())).color(LINE_COLOR).width(2.0));
        plot_ui.points(
            Points::new(PlotPoints::new(coords))
                .color(LINE_COLOR)
                .radius(3.0)
                .shape(MarkerShape::Circle),
        );
        // Selected records keep their colors here too
        for selected in selection.iter() {
            if let Some((_, p)) = series.points.iter().find(|(id, _)| *id == selected.id) {
                plot_ui.points(
                    Points::new(vec![*p])
                        .color(selected.color())
                        .radius(5.0)
                        .shape(MarkerShape::Circle),
                );
            }
        }
    });
}

impl SpaceView for TimeSeriesView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "TimeSeriesView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let Some(dataset) = ctx.state.dataset() else {
            view_placeholder(ui, "Load a CSV file to see the time series");
            return;
        };
        let line_config = &ctx.config.line_chart;
        let series = match LineSeries::compute(&dataset, &ctx.state.mapping(), &line_config.x_dimension) {
            Ok(series) => series,
            Err(e) => {
                view_placeholder(ui, &format!("Time series unavailable: {}", e));
                return;
            }
        };
        if series.points.is_empty() {
            view_placeholder(ui, "No records have both values");
            return;
        }

        let y_label = line_config.label_for(&series.y_dimension).to_string();
        draw_series(ui, self.id, &series, &y_label, &ctx.state.selection());
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

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Year".into(), "Water_Level_m".into(), "Note".into()],
            vec![
                vec![n(2010.0), n(30.0), Value::Text("a".into())],
                vec![n(2000.0), n(40.0), Value::Text("b".into())],
                vec![n(2020.0), Value::Text("".into()), Value::Text("c".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_points_sorted_and_padded() {
        let ds = dataset();
        let mut mapping = DimensionMapping::new();
        mapping.set(Channel::LineY, "Water_Level_m", &ds).unwrap();

        let series = LineSeries::compute(&ds, &mapping, "Year").unwrap();
        let xs: Vec<f64> = series.points.iter().map(|(_, p)| p[0]).collect();
        assert_eq!(xs, vec![2000.0, 2010.0]);
        assert!((series.x_bounds.min - 1999.5).abs() < 1e-9);
        assert!((series.x_bounds.max - 2010.5).abs() < 1e-9);
        assert!((series.y_bounds.min - 29.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_dimensions_are_reported() {
        let ds = dataset();
        let mapping = DimensionMapping::new();
        assert_eq!(
            LineSeries::compute(&ds, &mapping, "Year"),
            Err(MappingError::Unbound(Channel::LineY))
        );
        assert!(matches!(
            LineSeries::compute(&ds, &mapping, "Date"),
            Err(MappingError::Missing { .. })
        ));
        assert!(matches!(
            LineSeries::compute(&ds, &mapping, "Note"),
            Err(MappingError::NotNumeric { .. })
        ));
    }
}
