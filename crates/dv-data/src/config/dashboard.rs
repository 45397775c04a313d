//! Dashboard configuration: preloaded file, auxiliary datasets and chart settings

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::DataError;

/// Top-level configuration, read from `dashboard.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at start-up
    pub preload: Option<PathBuf>,

    pub line_chart: LineChartConfig,
    pub bar_chart: BarChartConfig,
    pub heatmap: HeatmapConfig,
    pub timelapse: TimelapseConfig,
}

/// Line chart over the main dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LineChartConfig {
    pub x_dimension: String,
    /// Dimensions offered for the Y axis, first present one is the default
    pub y_candidates: Vec<DimensionLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionLabel {
    pub dimension: String,
    pub label: String,
}

/// Grouped bar chart over a side dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BarChartConfig {
    pub path: PathBuf,
    pub group_dimension: String,
    pub y_label: String,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarSeries {
    pub dimension: String,
    pub label: String,
    /// RGB color of the bars
    pub color: [u8; 3],
}

/// Temperature heatmap over a long-format (year, month, value) side dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub path: PathBuf,
    pub year_dimension: String,
    pub month_dimension: String,
    pub value_dimension: String,
    /// Month keys as they appear in the data, in calendar order
    pub months: Vec<MonthLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthLabel {
    pub key: String,
    pub name: String,
}

/// Year-indexed image slideshow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimelapseConfig {
    pub image_dir: PathBuf,
    /// File extension of the images, `<year>.<extension>`
    pub extension: String,
    pub years: Vec<i32>,
    pub interval_ms: u64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preload: None,
            line_chart: LineChartConfig::default(),
            bar_chart: BarChartConfig::default(),
            heatmap: HeatmapConfig::default(),
            timelapse: TimelapseConfig::default(),
        }
    }
}

impl Default for LineChartConfig {
    fn default() -> Self {
        let label = |dimension: &str, label: &str| DimensionLabel {
            dimension: dimension.to_string(),
            label: label.to_string(),
        };
        Self {
            x_dimension: "Year".to_string(),
            y_candidates: vec![
                label("Water_Level_m", "Water Level (m)"),
                label("Surface_Area_km2", "Surface Area (km²)"),
                label("Volume_km3", "Volume (km³)"),
            ],
        }
    }
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("datasets/water_delivery_1992_2023.csv"),
            group_dimension: "Year".to_string(),
            y_label: "Water Delivery (mln m³)".to_string(),
            series: vec![
                BarSeries {
                    dimension: "AmuDarya_Total_mln_m3".to_string(),
                    label: "Amu Darya".to_string(),
                    color: [0x4c, 0xaf, 0x50],
                },
                BarSeries {
                    dimension: "SyrDarya_Total_mln_m3".to_string(),
                    label: "Syr Darya".to_string(),
                    color: [0x21, 0x96, 0xf3],
                },
            ],
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        const MONTHS: [(&str, &str); 12] = [
            ("I", "Jan"),
            ("II", "Feb"),
            ("III", "Mar"),
            ("IV", "Apr"),
            ("V", "May"),
            ("VI", "Jun"),
            ("VII", "Jul"),
            ("VIII", "Aug"),
            ("IX", "Sep"),
            ("X", "Oct"),
            ("XI", "Nov"),
            ("XII", "Dec"),
        ];
        Self {
            path: PathBuf::from("datasets/av_temperature.csv"),
            year_dimension: "Year".to_string(),
            month_dimension: "Month".to_string(),
            value_dimension: "Temperature".to_string(),
            months: MONTHS
                .iter()
                .map(|(key, name)| MonthLabel {
                    key: key.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for TimelapseConfig {
    fn default() -> Self {
        let mut years = vec![1974];
        years.extend(1984..=2020);
        Self {
            image_dir: PathBuf::from("datasets/images"),
            extension: "png".to_string(),
            years,
            interval_ms: 500,
            min_interval_ms: 100,
            max_interval_ms: 2000,
        }
    }
}

impl LineChartConfig {
    pub fn candidate_dimensions(&self) -> Vec<String> {
        self.y_candidates.iter().map(|c| c.dimension.clone()).collect()
    }

    /// Display label of a dimension, the dimension name if none is configured
    pub fn label_for<'a>(&'a self, dimension: &'a str) -> &'a str {
        self.y_candidates
            .iter()
            .find(|c| c.dimension == dimension)
            .map(|c| c.label.as_str())
            .unwrap_or(dimension)
    }
}

impl HeatmapConfig {
    /// Calendar position of a month key
    pub fn month_index(&self, key: &str) -> Option<usize> {
        self.months.iter().position(|m| m.key == key.trim())
    }
}

impl TimelapseConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn image_path(&self, year: i32) -> PathBuf {
        self.image_dir.join(format!("{}.{}", year, self.extension))
    }
}

impl DashboardConfig {
    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists; fall back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let t = &self.timelapse;
        if t.min_interval_ms == 0 || t.min_interval_ms > t.max_interval_ms {
            return Err(DataError::Config(format!(
                "timelapse interval bounds {}..={} ms are invalid",
                t.min_interval_ms, t.max_interval_ms
            )));
        }
        if !(t.min_interval_ms..=t.max_interval_ms).contains(&t.interval_ms) {
            return Err(DataError::Config(format!(
                "timelapse interval {} ms is outside {}..={} ms",
                t.interval_ms, t.min_interval_ms, t.max_interval_ms
            )));
        }
        if self.heatmap.months.is_empty() {
            return Err(DataError::Config("heatmap needs at least one month".to_string()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
