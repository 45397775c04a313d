//! Dataset store: records, coerced values and per-dimension extents

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::CoreError;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A single cell after numeric coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Coerce a raw cell: anything that parses cleanly as a finite number
    /// becomes a number, everything else is kept as text.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Text(raw.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Value::Number(number),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Empty text is how a missing cell survives coercion
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical identity of a record: its index in the dataset it was loaded with.
///
/// Ids are only meaningful together with the dataset generation that issued them;
/// the selection and highlight state are cleared whenever the dataset is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the dataset. Values are stored in dimension order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    values: Vec<Value>,
}

impl Record {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }
}

/// The (min, max) range of a numeric dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent over an iterator of values, `None` when it yields nothing
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Extent::new(v, v)),
            Some(e) => Some(Extent::new(e.min.min(v), e.max.max(v))),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Grow both ends by `factor` of the span
    pub fn padded(&self, factor: f64) -> Self {
        let pad = self.span() * factor;
        Extent::new(self.min - pad, self.max + pad)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ordered, immutable collection of records sharing one dimension set
#[derive(Debug, Clone)]
pub struct Dataset {
    generation: u64,
    dimensions: IndexSet<String>,
    records: Vec<Record>,
    extents: IndexMap<String, Extent>,
}

impl Dataset {
    /// Build a dataset from a header and value rows.
    ///
    /// Every row must carry exactly one value per dimension.
    pub fn new(dimensions: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, CoreError> {
        let dimensions: IndexSet<String> = dimensions.into_iter().collect();
        let expected = dimensions.len();

        let mut records = Vec::with_capacity(rows.len());
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(CoreError::RaggedRecord {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            records.push(Record {
                id: RecordId(row),
                values,
            });
        }

        let mut extents = IndexMap::new();
        for (column, name) in dimensions.iter().enumerate() {
            let numbers = records.iter().filter_map(|r| r.values[column].as_f64());
            if let Some(extent) = Extent::of(numbers) {
                extents.insert(name.clone(), extent);
            }
        }

        Ok(Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            dimensions,
            records,
            extents,
        })
    }

    /// Process-unique id of this load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> + '_ {
        self.dimensions.iter().map(String::as_str)
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.contains(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.dimensions.get_index_of(name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.0)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        id.0 < self.records.len()
    }

    pub fn value(&self, id: RecordId, dimension: &str) -> Option<&Value> {
        let column = self.column_index(dimension)?;
        self.record(id)?.get(column)
    }

    pub fn number(&self, id: RecordId, dimension: &str) -> Option<f64> {
        self.value(id, dimension).and_then(Value::as_f64)
    }

    /// Extent of a numeric dimension
    pub fn extent(&self, dimension: &str) -> Option<Extent> {
        self.extents.get(dimension).copied()
    }

    pub fn extents(&self) -> &IndexMap<String, Extent> {
        &self.extents
    }

    pub fn is_numeric(&self, dimension: &str) -> bool {
        self.extents.contains_key(dimension)
    }

    /// Dimensions with at least one numeric value, in header order
    pub fn numeric_dimensions(&self) -> Vec<&str> {
        self.dimensions
            .iter()
            .filter(|d| self.extents.contains_key(d.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The first dimension, used to label records
    pub fn label_dimension(&self) -> Option<&str> {
        self.dimensions.get_index(0).map(String::as_str)
    }

    /// Numeric dimensions that carry measurements, i.e. all but the label dimension
    pub fn value_dimensions(&self) -> Vec<&str> {
        let label = self.label_dimension();
        self.numeric_dimensions()
            .into_iter()
            .filter(|d| Some(*d) != label)
            .collect()
    }

    /// Display label of a record: its label-dimension value, or `Item n`
    pub fn label(&self, id: RecordId) -> String {
        self.label_from(id, 0)
    }

    /// Display label taken from `dimension`, falling back like [`Dataset::label`]
    pub fn label_in(&self, id: RecordId, dimension: &str) -> String {
        match self.column_index(dimension) {
            Some(column) => self.label_from(id, column),
            None => self.label(id),
        }
    }

    fn label_from(&self, id: RecordId, column: usize) -> String {
        self.record(id)
            .and_then(|r| r.get(column))
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .unwrap_or_else(|| format!("Item {}", id.0 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec!["Year".into(), "A".into(), "B".into()],
            vec![vec![n(2000.0), n(1.0), n(10.0)], vec![n(2001.0), n(5.0), n(2.0)]],
        )
        .unwrap()
    }

    #[test]
    fn test_coercion() {
        assert_eq!(Value::coerce("42"), Value::Number(42.0));
        assert_eq!(Value::coerce(" 1.5 "), Value::Number(1.5));
        assert_eq!(Value::coerce("1e3"), Value::Number(1000.0));
        assert_eq!(Value::coerce("abc"), Value::Text("abc".into()));
        assert_eq!(Value::coerce(""), Value::Text(String::new()));
        assert_eq!(Value::coerce("NaN"), Value::Text("NaN".into()));
        assert_eq!(Value::coerce("inf"), Value::Text("inf".into()));
        assert!(Value::coerce("  ").is_missing());
    }

    #[test]
    fn test_extents_and_numeric_dimensions() {
        let ds = sample();
        assert_eq!(ds.extent("A"), Some(Extent::new(1.0, 5.0)));
        assert_eq!(ds.extent("B"), Some(Extent::new(2.0, 10.0)));
        assert_eq!(ds.numeric_dimensions(), vec!["Year", "A", "B"]);
        assert_eq!(ds.value_dimensions(), vec!["A", "B"]);
        assert_eq!(ds.label(RecordId(1)), "2001");
    }

    #[test]
    fn test_text_columns_have_no_extent() {
        let ds = Dataset::new(
            vec!["Name".into(), "Score".into()],
            vec![
                vec![Value::Text("a".into()), n(3.0)],
                vec![Value::Text("b".into()), Value::Text(String::new())],
            ],
        )
        .unwrap();
        assert!(ds.extent("Name").is_none());
        assert_eq!(ds.extent("Score"), Some(Extent::new(3.0, 3.0)));
        assert_eq!(ds.numeric_dimensions(), vec!["Score"]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = Dataset::new(vec!["a".into(), "b".into()], vec![vec![n(1.0)]]).unwrap_err();
        assert!(matches!(err, CoreError::RaggedRecord { row: 0, expected: 2, found: 1 }));
    }

    #[test]
    fn test_generation_is_unique_per_load() {
        assert_ne!(sample().generation(), sample().generation());
    }

    #[test]
    fn test_missing_label_falls_back_to_item_number() {
        let ds = Dataset::new(
            vec!["Name".into()],
            vec![vec![Value::Text(String::new())]],
        )
        .unwrap();
        assert_eq!(ds.label(RecordId(0)), "Item 1");
    }

    #[test]
    fn test_label_in_other_dimension() {
        let ds = sample();
        assert_eq!(ds.label_in(RecordId(0), "B"), "10");
        assert_eq!(ds.label_in(RecordId(0), "Nope"), "2000");
    }
}
