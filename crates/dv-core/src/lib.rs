//! Core state for the linked-selection dashboard
//!
//! This crate owns the dataset model and the coordination state every view
//! reads from: the capped selection set with its colors, the dimension
//! mapping registry, the cross-view highlight and the event bus that tells
//! views when to redraw.

pub mod dataset;
pub mod events;
pub mod mapping;
pub mod notices;
pub mod playback;
pub mod selection;
pub mod state;
pub mod sync;

use thiserror::Error;

// Re-export commonly used types
pub use dataset::{Dataset, Extent, Record, RecordId, Value};
pub use mapping::{Channel, DimensionMapping, MappingError};
pub use notices::{Notice, NoticeLevel, NOTICE_TTL};
pub use playback::Slideshow;
pub use selection::{
    SelectedRecord, SelectionSet, ToggleOutcome, HIGHLIGHT_COLOR, MAX_SELECTION,
    SELECTION_PALETTE, UNSELECTED_COLOR,
};
pub use state::{DashboardSettings, DashboardState};
pub use sync::{Highlight, HighlightSource};

/// Errors raised by state mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("a maximum of {capacity} records can be selected")]
    SelectionFull { capacity: usize },

    #[error("record {0} is not part of the current dataset")]
    UnknownRecord(RecordId),

    #[error("dimension '{dimension}' does not exist, {channel} was not changed")]
    UnknownDimension { channel: Channel, dimension: String },

    #[error("dimension '{dimension}' is not numeric, {channel} was not changed")]
    NonNumericDimension { channel: Channel, dimension: String },

    #[error("no dataset loaded")]
    NoDataset,

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRecord {
        row: usize,
        expected: usize,
        found: usize,
    },
}
