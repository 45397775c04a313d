//! Dimension mapping registry: which data dimension feeds which visual channel

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{Dataset, RecordId};
use crate::CoreError;

/// A visual encoding slot bound to a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Label shown for a record in legends and tooltips
    Label,
    ScatterX,
    ScatterY,
    Size,
    LineY,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Label,
        Channel::ScatterX,
        Channel::ScatterY,
        Channel::Size,
        Channel::LineY,
    ];

    /// Stable identifier used by menus and configuration
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Label => "label",
            Channel::ScatterX => "scatterX",
            Channel::ScatterY => "scatterY",
            Channel::Size => "size",
            Channel::LineY => "lineY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Channel::Label => "Label",
            Channel::ScatterX => "X axis",
            Channel::ScatterY => "Y axis",
            Channel::Size => "Point size",
            Channel::LineY => "Line chart Y",
        }
    }

    /// Whether the channel can only be bound to numeric dimensions
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, Channel::Label)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown channel '{}'", s))
    }
}

/// Why a channel cannot currently feed its view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("no dimension chosen for {0}")]
    Unbound(Channel),

    #[error("dimension '{dimension}' for {channel} is not in the current dataset")]
    Missing { channel: Channel, dimension: String },

    #[error("dimension '{dimension}' for {channel} has no numeric values")]
    NotNumeric { channel: Channel, dimension: String },
}

/// Current channel bindings.
///
/// Bindings persist across re-renders of one dataset and are reset to
/// dataset-derived defaults whenever the dataset is replaced.
#[derive(Debug, Clone, Default)]
pub struct DimensionMapping {
    bindings: AHashMap<Channel, String>,
}

impl DimensionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a freshly loaded dataset.
    ///
    /// `line_candidates` are the preferred dimensions of the line chart, the
    /// first one present in the dataset wins.
    pub fn defaults_for(dataset: &Dataset, line_candidates: &[String]) -> Self {
        let mut bindings = AHashMap::new();

        if let Some(label) = dataset.label_dimension() {
            bindings.insert(Channel::Label, label.to_string());
        }

        let values = dataset.value_dimensions();
        let numeric = if values.is_empty() {
            dataset.numeric_dimensions()
        } else {
            values
        };
        let pick = |i: usize| numeric.get(i).or_else(|| numeric.last()).map(|d| d.to_string());

        if let Some(x) = pick(0) {
            bindings.insert(Channel::ScatterX, x);
        }
        if let Some(y) = pick(1) {
            bindings.insert(Channel::ScatterY, y);
        }
        if let Some(size) = pick(2) {
            bindings.insert(Channel::Size, size);
        }

        let line = line_candidates
            .iter()
            .find(|c| dataset.is_numeric(c))
            .cloned()
            .or_else(|| pick(0));
        if let Some(line) = line {
            bindings.insert(Channel::LineY, line);
        }

        Self { bindings }
    }

    /// Bind `channel` to `dimension` after checking it against the dataset.
    ///
    /// On failure the previous binding is kept.
    pub fn set(&mut self, channel: Channel, dimension: &str, dataset: &Dataset) -> Result<(), CoreError> {
        if !dataset.has_dimension(dimension) {
            return Err(CoreError::UnknownDimension {
                channel,
                dimension: dimension.to_string(),
            });
        }
        if channel.requires_numeric() && !dataset.is_numeric(dimension) {
            return Err(CoreError::NonNumericDimension {
                channel,
                dimension: dimension.to_string(),
            });
        }
        self.bindings.insert(channel, dimension.to_string());
        Ok(())
    }

    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.bindings.get(&channel).map(String::as_str)
    }

    /// Display label of a record through the `Label` channel.
    /// An unusable binding falls back to the dataset's label dimension.
    pub fn record_label(&self, dataset: &Dataset, id: RecordId) -> String {
        match self.resolve(Channel::Label, dataset) {
            Ok(dimension) => dataset.label_in(id, dimension),
            Err(_) => dataset.label(id),
        }
    }

    /// The bound dimension, checked against the dataset a view is about to draw
    pub fn resolve<'a>(&'a self, channel: Channel, dataset: &Dataset) -> Result<&'a str, MappingError> {
        let dimension = self.get(channel).ok_or(MappingError::Unbound(channel))?;
        if !dataset.has_dimension(dimension) {
            return Err(MappingError::Missing {
                channel,
                dimension: dimension.to_string(),
            });
        }
        if channel.requires_numeric() && !dataset.is_numeric(dimension) {
            return Err(MappingError::NotNumeric {
                channel,
                dimension: dimension.to_string(),
            });
        }
        Ok(dimension)
    }

    /// Dimensions a menu for `channel` may offer
    pub fn options<'a>(channel: Channel, dataset: &'a Dataset) -> Vec<&'a str> {
        if channel.requires_numeric() {
            dataset.numeric_dimensions()
        } else {
            dataset.dimensions().collect()
        }
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Name".into(), "A".into(), "B".into(), "C".into(), "Note".into()],
            vec![vec![
                Value::Text("x".into()),
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
                Value::Text("n".into()),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let ds = dataset();
        let mapping = DimensionMapping::defaults_for(&ds, &[]);
        assert_eq!(mapping.get(Channel::Label), Some("Name"));
        assert_eq!(mapping.get(Channel::ScatterX), Some("A"));
        assert_eq!(mapping.get(Channel::ScatterY), Some("B"));
        assert_eq!(mapping.get(Channel::Size), Some("C"));
        assert_eq!(mapping.get(Channel::LineY), Some("A"));
    }

    #[test]
    fn test_line_candidates_take_precedence() {
        let ds = dataset();
        let mapping = DimensionMapping::defaults_for(&ds, &["Missing".into(), "C".into()]);
        assert_eq!(mapping.get(Channel::LineY), Some("C"));
    }

    #[test]
    fn test_set_rejects_unknown_and_text_dimensions() {
        let ds = dataset();
        let mut mapping = DimensionMapping::defaults_for(&ds, &[]);

        let err = mapping.set(Channel::ScatterX, "Nope", &ds).unwrap_err();
        assert!(matches!(err, CoreError::UnknownDimension { .. }));
        let err = mapping.set(Channel::ScatterX, "Note", &ds).unwrap_err();
        assert!(matches!(err, CoreError::NonNumericDimension { .. }));
        assert_eq!(mapping.get(Channel::ScatterX), Some("A"));

        mapping.set(Channel::Label, "Note", &ds).unwrap();
        mapping.set(Channel::ScatterX, "C", &ds).unwrap();
        assert_eq!(mapping.get(Channel::ScatterX), Some("C"));
    }

    #[test]
    fn test_label_channel_drives_record_label() {
        let ds = dataset();
        let mut mapping = DimensionMapping::defaults_for(&ds, &[]);
        assert_eq!(mapping.record_label(&ds, RecordId(0)), "x");

        mapping.set(Channel::Label, "Note", &ds).unwrap();
        assert_eq!(mapping.record_label(&ds, RecordId(0)), "n");

        // Unbound label falls back to the first dimension
        assert_eq!(DimensionMapping::new().record_label(&ds, RecordId(0)), "x");
    }

    #[test]
    fn test_resolve_against_other_dataset() {
        let ds = dataset();
        let mapping = DimensionMapping::defaults_for(&ds, &[]);
        let other = Dataset::new(vec!["Z".into()], vec![vec![Value::Number(1.0)]]).unwrap();
        assert_eq!(
            mapping.resolve(Channel::ScatterX, &other),
            Err(MappingError::Missing {
                channel: Channel::ScatterX,
                dimension: "A".into()
            })
        );
        assert_eq!(
            DimensionMapping::new().resolve(Channel::Size, &ds),
            Err(MappingError::Unbound(Channel::Size))
        );
    }

    #[test]
    fn test_channel_keys_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.key().parse::<Channel>(), Ok(channel));
        }
        assert!("bogus".parse::<Channel>().is_err());
    }
}
