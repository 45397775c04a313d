use std::sync::Arc;
use std::time::Instant;
use parking_lot::{Mutex, RwLock};
use egui::Color32;
use indexmap::IndexMap;

use crate::dataset::{Dataset, RecordId};
use crate::events::events::{
    DatasetLoaded, DimensionChanged, DimensionRejected, SelectionChanged, SelectionRejected,
};
use crate::events::EventBus;
use crate::mapping::{Channel, DimensionMapping};
use crate::notices::{Notice, NoticeLevel, NoticeLog};
use crate::selection::{SelectedRecord, SelectionSet, ToggleOutcome};
use crate::sync::{Highlight, HighlightSource, HighlightState};
use crate::CoreError;

/// Settings that shape how a loaded dataset is mapped
#[derive(Debug, Clone, Default)]
pub struct DashboardSettings {
    /// Preferred dimensions for the line chart, first present one wins
    pub line_candidates: Vec<String>,
}

/// The coordinating context shared by every view.
///
/// Owns the current dataset, the selection set with its colors, the channel
/// bindings and the highlight channel. All mutation goes through the methods
/// below, which publish an event on `events()` once the change is in place.
/// Replacing the dataset resets everything derived from the previous one.
pub struct DashboardState {
    /// The currently loaded dataset
    dataset: RwLock<Option<Arc<Dataset>>>,

    /// Name of the source the dataset came from
    source_name: RwLock<Option<String>>,

    /// Read-only side datasets for the auxiliary charts
    auxiliary: RwLock<IndexMap<String, Arc<Dataset>>>,

    selection: RwLock<SelectionSet>,
    mapping: RwLock<DimensionMapping>,
    highlight: RwLock<HighlightState>,
    notices: Mutex<NoticeLog>,
    settings: RwLock<DashboardSettings>,

    /// The event bus
    events: EventBus,
}

impl DashboardState {
    pub fn new(settings: DashboardSettings) -> Self {
        Self {
            dataset: RwLock::new(None),
            source_name: RwLock::new(None),
            auxiliary: RwLock::new(IndexMap::new()),
            selection: RwLock::new(SelectionSet::new()),
            mapping: RwLock::new(DimensionMapping::new()),
            highlight: RwLock::new(HighlightState::new()),
            notices: Mutex::new(NoticeLog::new()),
            settings: RwLock::new(settings),
            events: EventBus::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn settings(&self) -> DashboardSettings {
        self.settings.read().clone()
    }

    /// Replace the dataset and reset selection, colors, highlight and mapping
    pub fn load_dataset(&self, dataset: Dataset, source_name: impl Into<String>) -> Arc<Dataset> {
        let source_name = source_name.into();
        let dataset = Arc::new(dataset);
        let mapping = DimensionMapping::defaults_for(&dataset, &self.settings.read().line_candidates);

        *self.dataset.write() = Some(dataset.clone());
        *self.source_name.write() = Some(source_name.clone());
        self.selection.write().clear();
        self.highlight.write().clear();
        *self.mapping.write() = mapping;

        tracing::info!(
            "Loaded dataset '{}': {} rows, {} dimensions ({} numeric)",
            source_name,
            dataset.len(),
            dataset.dimension_count(),
            dataset.numeric_dimensions().len()
        );

        self.events.publish(DatasetLoaded {
            source_name,
            generation: dataset.generation(),
            row_count: dataset.len(),
            dimension_count: dataset.dimension_count(),
        });
        self.events.publish(SelectionChanged { selected: Vec::new() });

        dataset
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.read().clone()
    }

    pub fn source_name(&self) -> Option<String> {
        self.source_name.read().clone()
    }

    /// Register a side dataset under `name`, replacing any previous one
    pub fn set_auxiliary(&self, name: impl Into<String>, dataset: Dataset) {
        let name = name.into();
        tracing::debug!("Auxiliary dataset '{}' with {} rows", name, dataset.len());
        self.auxiliary.write().insert(name, Arc::new(dataset));
    }

    pub fn auxiliary(&self, name: &str) -> Option<Arc<Dataset>> {
        self.auxiliary.read().get(name).cloned()
    }

    /// Select or deselect a record.
    ///
    /// A full selection rejects new records: the set stays unchanged, a
    /// warning notice is raised and `SelectionFull` is returned.
    pub fn toggle_selection(&self, id: RecordId) -> Result<ToggleOutcome, CoreError> {
        let dataset = self.dataset().ok_or(CoreError::NoDataset)?;
        if !dataset.contains(id) {
            return Err(CoreError::UnknownRecord(id));
        }

        let result = self.selection.write().toggle(id);
        match result {
            Ok(outcome) => {
                let label = self.mapping.read().record_label(&dataset, id);
                match outcome {
                    ToggleOutcome::Selected { id, .. } => tracing::debug!("Selected {} ({})", id, label),
                    ToggleOutcome::Deselected { id } => tracing::debug!("Deselected {} ({})", id, label),
                }
                let selected = self.selection.read().ids();
                self.events.publish(SelectionChanged { selected });
                Ok(outcome)
            }
            Err(CoreError::SelectionFull { capacity }) => {
                tracing::warn!("Selection full, rejected {}", id);
                self.notify(
                    NoticeLevel::Warning,
                    format!("A maximum of {} records can be selected", capacity),
                );
                self.events.publish(SelectionRejected { record: id, capacity });
                Err(CoreError::SelectionFull { capacity })
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.read().is_selected(id)
    }

    /// Selection color of a record, or the unselected default
    pub fn color_of(&self, id: RecordId) -> Color32 {
        self.selection.read().color_of(id)
    }

    pub fn selection(&self) -> SelectionSet {
        self.selection.read().clone()
    }

    pub fn selected_records(&self) -> Vec<SelectedRecord> {
        self.selection.read().iter().copied().collect()
    }

    /// Empty the selection and free every color
    pub fn clear_selection(&self) {
        let had_any = {
            let mut selection = self.selection.write();
            let had_any = !selection.is_empty();
            selection.clear();
            had_any
        };
        if had_any {
            self.events.publish(SelectionChanged { selected: Vec::new() });
        }
    }

    /// Bind a channel to a dimension of the current dataset.
    ///
    /// An invalid dimension keeps the old binding and raises a warning notice.
    pub fn set_dimension(&self, channel: Channel, dimension: &str) -> Result<(), CoreError> {
        let dataset = self.dataset().ok_or(CoreError::NoDataset)?;
        let result = self.mapping.write().set(channel, dimension, &dataset);
        match result {
            Ok(()) => {
                tracing::debug!("Channel {} -> '{}'", channel, dimension);
                self.events.publish(DimensionChanged {
                    channel,
                    dimension: dimension.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected binding for {}: {}", channel, e);
                self.notify(NoticeLevel::Warning, e.to_string());
                self.events.publish(DimensionRejected {
                    channel,
                    dimension: dimension.to_string(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn dimension(&self, channel: Channel) -> Option<String> {
        self.mapping.read().get(channel).map(str::to_string)
    }

    pub fn mapping(&self) -> DimensionMapping {
        self.mapping.read().clone()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight.read().current()
    }

    pub fn set_highlight(&self, record: RecordId, source: HighlightSource) {
        self.highlight.write().set(record, source);
    }

    /// Clear the highlight if `source` set it
    pub fn clear_highlight_from(&self, source: HighlightSource) {
        self.highlight.write().clear_from(source);
    }

    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.lock().push(level, message);
    }

    /// Notices still on screen; expired ones are dropped
    pub fn active_notices(&self, now: Instant) -> Vec<Notice> {
        let mut notices = self.notices.lock();
        notices.expire(now);
        notices.active(now)
    }

    pub fn dismiss_notices(&self) {
        self.notices.lock().dismiss_all();
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DashboardSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use crate::selection::MAX_SELECTION;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn year_dataset() -> Dataset {
        Dataset::new(
            vec!["Year".into(), "A".into(), "B".into()],
            vec![
                vec![Value::Number(2000.0), Value::Number(1.0), Value::Number(10.0)],
                vec![Value::Number(2001.0), Value::Number(5.0), Value::Number(2.0)],
            ],
        )
        .unwrap()
    }

    fn wide_dataset(rows: usize) -> Dataset {
        Dataset::new(
            vec!["Id".into(), "V".into()],
            (0..rows)
                .map(|i| vec![Value::Number(i as f64), Value::Number((i * 2) as f64)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_toggle_round_trip() {
        let state = DashboardState::default();
        state.load_dataset(year_dataset(), "test");

        state.toggle_selection(RecordId(0)).unwrap();
        assert_eq!(state.selection().ids(), vec![RecordId(0)]);
        state.toggle_selection(RecordId(0)).unwrap();
        assert!(state.selection().is_empty());
        assert_eq!(state.color_of(RecordId(0)), crate::selection::UNSELECTED_COLOR);
    }

    #[test]
    fn test_twelve_toggles_accept_ten() {
        let state = DashboardState::default();
        state.load_dataset(wide_dataset(12), "wide");

        let rejected = Arc::new(AtomicBool::new(false));
        let _rejected = state.events().mark_on::<SelectionRejected>(rejected.clone());

        let results: Vec<_> = (0..12).map(|i| state.toggle_selection(RecordId(i))).collect();
        assert!(results[..10].iter().all(Result::is_ok));
        assert!(matches!(results[10], Err(CoreError::SelectionFull { capacity: 10 })));
        assert!(matches!(results[11], Err(CoreError::SelectionFull { .. })));
        assert_eq!(state.selection().len(), MAX_SELECTION);
        assert!(rejected.load(Ordering::Acquire));
        assert!(!state.active_notices(Instant::now()).is_empty());
    }

    #[test]
    fn test_reload_clears_selection_and_resets_mapping() {
        let state = DashboardState::default();
        state.load_dataset(year_dataset(), "first");
        state.toggle_selection(RecordId(1)).unwrap();
        state.set_dimension(Channel::ScatterX, "B").unwrap();
        state.set_highlight(RecordId(1), HighlightSource::Table);

        state.load_dataset(year_dataset(), "second");
        assert!(state.selection().is_empty());
        assert_eq!(state.dimension(Channel::ScatterX).as_deref(), Some("A"));
        assert_eq!(state.highlight(), None);
        assert_eq!(state.source_name().as_deref(), Some("second"));
    }

    #[test]
    fn test_invalid_dimension_keeps_binding_and_warns() {
        let state = DashboardState::default();
        state.load_dataset(year_dataset(), "test");
        assert!(state.set_dimension(Channel::ScatterY, "Nope").is_err());
        assert_eq!(state.dimension(Channel::ScatterY).as_deref(), Some("B"));
        assert_eq!(state.active_notices(Instant::now()).len(), 1);
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let state = DashboardState::default();
        let selection_changed = Arc::new(AtomicBool::new(false));
        let dimension_changed = Arc::new(AtomicBool::new(false));
        let _selection = state.events().mark_on::<SelectionChanged>(selection_changed.clone());
        let _dimension = state.events().mark_on::<DimensionChanged>(dimension_changed.clone());

        state.load_dataset(year_dataset(), "test");
        selection_changed.store(false, Ordering::Release);

        state.toggle_selection(RecordId(0)).unwrap();
        assert!(selection_changed.load(Ordering::Acquire));
        state.set_dimension(Channel::Size, "A").unwrap();
        assert!(dimension_changed.load(Ordering::Acquire));
    }

    #[test]
    fn test_toggle_without_dataset_or_unknown_record() {
        let state = DashboardState::default();
        assert!(matches!(state.toggle_selection(RecordId(0)), Err(CoreError::NoDataset)));
        state.load_dataset(year_dataset(), "test");
        assert!(matches!(
            state.toggle_selection(RecordId(9)),
            Err(CoreError::UnknownRecord(RecordId(9)))
        ));
    }

    #[test]
    fn test_highlight_does_not_touch_selection() {
        let state = DashboardState::default();
        state.load_dataset(year_dataset(), "test");
        state.set_highlight(RecordId(0), HighlightSource::Scatter);
        assert!(state.selection().is_empty());
        state.clear_highlight_from(HighlightSource::Scatter);
        assert_eq!(state.highlight(), None);
    }
}
