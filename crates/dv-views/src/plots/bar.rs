//! Grouped bar chart over an auxiliary dataset

use egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use dv_core::Dataset;
use dv_data::config::{BarChartConfig, BarSeries};

use super::utils::{rgb, BandScale};
use super::BAR_DATASET;
use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

/// Gap between groups, as a share of the step
pub const GROUP_PADDING: f64 = 0.1;

/// Gap between the bars of one group
pub const SERIES_PADDING: f64 = 0.05;

/// One group of bars, e.g. one year
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub key: f64,
    /// One value per configured series
    pub values: Vec<Option<f64>>,
}

/// A bar placed in plot coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBar {
    pub series: usize,
    pub key: f64,
    pub center: f64,
    pub width: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBars {
    pub series: Vec<BarSeries>,
    pub groups: Vec<BarGroup>,
    /// Width available to one group, in units of the group key
    pub step: f64,
    pub y_max: f64,
}

impl GroupedBars {
    /// One group per distinct numeric value of the group dimension, in ascending order
    pub fn compute(dataset: &Dataset, config: &BarChartConfig) -> Result<Self, String> {
        if !dataset.is_numeric(&config.group_dimension) {
            return Err(format!("no numeric '{}' column", config.group_dimension));
        }
        let series: Vec<BarSeries> = config
            .series
            .iter()
            .filter(|s| dataset.has_dimension(&s.dimension))
            .cloned()
            .collect();
        if series.is_empty() {
            return Err("none of the configured series are in the dataset".to_string());
        }

        let mut groups: Vec<BarGroup> = Vec::new();
        for record in dataset.records() {
            let Some(key) = dataset.number(record.id(), &config.group_dimension) else {
                continue;
            };
            if groups.iter().any(|g| g.key == key) {
                continue;
            }
            groups.push(BarGroup {
                key,
                values: series
                    .iter()
                    .map(|s| dataset.number(record.id(), &s.dimension))
                    .collect(),
            });
        }
        groups.sort_by(|a, b| a.key.total_cmp(&b.key));

        let step = groups
            .windows(2)
            .map(|w| w[1].key - w[0].key)
            .fold(f64::INFINITY, f64::min);
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };

        let y_max = groups
            .iter()
            .flat_map(|g| g.values.iter().flatten())
            .fold(0.0_f64, |acc, v| acc.max(*v));

        Ok(Self { series, groups, step, y_max })
    }

    /// Bars of every group, centered on the group key
    pub fn bars(&self) -> Vec<PlacedBar> {
        let group_width = self.step * (1.0 - GROUP_PADDING);
        let inner = BandScale::new(self.series.len(), (-group_width / 2.0, group_width / 2.0))
            .padding_inner(SERIES_PADDING);
        let width = inner.bandwidth();

        let mut bars = Vec::new();
        for group in &self.groups {
            for (series, value) in group.values.iter().enumerate() {
                let (Some(value), Some(start)) = (value, inner.position(series)) else {
                    continue;
                };
                bars.push(PlacedBar {
                    series,
                    key: group.key,
                    center: group.key + start + width / 2.0,
                    width,
                    value: *value,
                });
            }
        }
        bars
    }
}

pub struct BarChartView {
    id: SpaceViewId,
    title: String,
}

impl BarChartView {
    pub fn new(id: SpaceViewId, title: impl Into<String>) -> Self {
        Self { id, title: title.into() }
    }
}

impl SpaceView for BarChartView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "BarChartView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let config = &ctx.config.bar_chart;
        let Some(dataset) = ctx.state.auxiliary(BAR_DATASET) else {
            view_placeholder(ui, &format!("{} is not loaded", config.path.display()));
            return;
        };
        let chart = match GroupedBars::compute(&dataset, config) {
            Ok(chart) => chart,
            Err(e) => {
                view_placeholder(ui, &format!("Bar chart unavailable: {}", e));
                return;
            }
        };

        let bars = chart.bars();
        let plot = Plot::new(("bar_chart", self.id))
            .legend(Legend::default())
            .x_axis_label(&config.group_dimension)
            .y_axis_label(&config.y_label)
            .include_y(0.0)
            .include_y(chart.y_max * 1.05)
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false);

        plot.show(ui, |plot_ui| {
            for (index, series) in chart.series.iter().enumerate() {
                let color = rgb(series.color);
                let series_bars = bars
                    .iter()
                    .filter(|b| b.series == index)
                    .map(|b| {
                        Bar::new(b.center, b.value)
                            .width(b.width)
                            .name(format!("{} {}", series.label, b.key))
                            .fill(color)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(series_bars).color(color).name(&series.label));
            }
        });
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
