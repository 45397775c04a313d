//! Plot view implementations

// Linked views over the main dataset
pub mod scatter;
pub mod radar;

// Charts over auxiliary datasets
pub mod bar;
pub mod heatmap;

// Utilities
pub mod utils;

/// Name of the auxiliary dataset behind the grouped bar chart
pub const BAR_DATASET: &str = "water_delivery";

/// Name of the auxiliary dataset behind the heatmap
pub const HEATMAP_DATASET: &str = "temperature";

// Re-exports
pub use scatter::{ScatterLayout, ScatterMark, ScatterView};
pub use radar::{RadarFrame, RadarPolygon, RadarView};
pub use bar::{BarChartView, GroupedBars};
pub use heatmap::{HeatGrid, HeatmapView};
