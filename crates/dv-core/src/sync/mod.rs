//! Transient cross-view highlight channel.
//!
//! Hovering a mark, a polygon or a table row highlights the same record in the
//! other views. The highlight is separate from the selection: setting or
//! clearing it never changes which records are selected.

use crate::dataset::RecordId;

/// The view a highlight originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightSource {
    Scatter,
    Radar,
    Table,
    Legend,
}

/// One highlighted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub record: RecordId,
    pub source: HighlightSource,
}

/// Holds at most one highlight at a time
#[derive(Debug, Clone, Default)]
pub struct HighlightState {
    current: Option<Highlight>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Highlight> {
        self.current
    }

    /// Replace the highlight, returning whether anything changed
    pub fn set(&mut self, record: RecordId, source: HighlightSource) -> bool {
        let next = Some(Highlight { record, source });
        let changed = self.current != next;
        self.current = next;
        changed
    }

    /// Clear the highlight, but only if `source` owns it.
    ///
    /// A view that loses the pointer must not wipe a highlight another view set
    /// in the same frame.
    pub fn clear_from(&mut self, source: HighlightSource) -> bool {
        match self.current {
            Some(h) if h.source == source => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_highlighted(&self, record: RecordId) -> bool {
        self.current.map(|h| h.record == record).unwrap_or(false)
    }

    pub fn highlighted_by(&self, source: HighlightSource) -> Option<RecordId> {
        self.current.filter(|h| h.source == source).map(|h| h.record)
    }
}
