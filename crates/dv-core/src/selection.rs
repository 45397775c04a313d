//! Bounded selection set with stable per-record color assignment

use egui::Color32;

use crate::dataset::RecordId;
use crate::CoreError;

/// Maximum number of simultaneously selected records
pub const MAX_SELECTION: usize = 10;

/// Fill used for records that are not selected
pub const UNSELECTED_COLOR: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);

/// Transient hover highlight, distinct from every palette color
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xff, 0x33, 0x33);

/// Ten distinct categorical colors, one per selection slot
pub const SELECTION_PALETTE: [Color32; MAX_SELECTION] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

/// A selected record and the palette slot it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRecord {
    pub id: RecordId,
    pub slot: usize,
}

impl SelectedRecord {
    pub fn color(&self) -> Color32 {
        SELECTION_PALETTE[self.slot]
    }
}

/// Result of a successful toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected { id: RecordId, color: Color32 },
    Deselected { id: RecordId },
}

/// Ordered set of selected records.
///
/// Insertion order is display order. Each member owns one palette slot for as
/// long as it stays selected; a freed slot goes to the next record that needs
/// a color, lowest index first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<SelectedRecord>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if absent, deselect it if present.
    ///
    /// Selecting into a full set is rejected and leaves the set unchanged.
    pub fn toggle(&mut self, id: RecordId) -> Result<ToggleOutcome, CoreError> {
        if let Some(pos) = self.position(id) {
            self.entries.remove(pos);
            return Ok(ToggleOutcome::Deselected { id });
        }

        if self.entries.len() >= MAX_SELECTION {
            return Err(CoreError::SelectionFull {
                capacity: MAX_SELECTION,
            });
        }

        let slot = self.first_free_slot();
        let entry = SelectedRecord { id, slot };
        self.entries.push(entry);
        Ok(ToggleOutcome::Selected {
            id,
            color: entry.color(),
        })
    }

    /// Remove `id`, returning whether it was selected
    pub fn remove(&mut self, id: RecordId) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    /// Assigned color, or the unselected default
    pub fn color_of(&self, id: RecordId) -> Color32 {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(SelectedRecord::color)
            .unwrap_or(UNSELECTED_COLOR)
    }

    pub fn slot_of(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.slot)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_SELECTION
    }

    /// Selected records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SelectedRecord> + '_ {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn first_free_slot(&self) -> usize {
        (0..MAX_SELECTION)
            .find(|slot| !self.entries.iter().any(|e| e.slot == *slot))
            .unwrap_or(0)
    }
}
