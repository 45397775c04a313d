//! Legend of the current selection

use egui::{Color32, Sense, Ui, Vec2};

use dv_core::{Dataset, DimensionMapping, HighlightSource, RecordId, SelectionSet};

use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

pub const LEGEND_PLACEHOLDER: &str = "Click on scatterplot points to add them to radar chart";

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub record: RecordId,
    pub color: Color32,
    pub label: String,
}

/// One entry per selected record, in selection order, labelled through the `Label` channel
pub fn legend_entries(dataset: &Dataset, mapping: &DimensionMapping, selection: &SelectionSet) -> Vec<LegendEntry> {
    selection
        .iter()
        .filter(|s| dataset.contains(s.id))
        .map(|s| LegendEntry {
            record: s.id,
            color: s.color(),
            label: mapping.record_label(dataset, s.id),
        })
        .collect()
}

pub struct LegendView {
    id: SpaceViewId,
    title: String,
}

impl LegendView {
    pub fn new(id: SpaceViewId, title: impl Into<String>) -> Self {
        Self { id, title: title.into() }
    }
}

impl SpaceView for LegendView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "LegendView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let state = &ctx.state;
        let Some(dataset) = state.dataset() else {
            view_placeholder(ui, LEGEND_PLACEHOLDER);
            return;
        };
        let entries = legend_entries(&dataset, &state.mapping(), &state.selection());
        if entries.is_empty() {
            state.clear_highlight_from(HighlightSource::Legend);
            view_placeholder(ui, LEGEND_PLACEHOLDER);
            return;
        }

        let mut hovered = None;
        let mut removed = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for entry in &entries {
                    let item = ui.horizontal(|ui| {
                        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, entry.color);
                        ui.label(&entry.label);
                        if ui
                            .small_button(" ✕")
                            .on_hover_text("Remove from selection")
                            .clicked()
                        {
                            removed = Some(entry.record);
                        }
                    });
                    if item.response.hovered() {
                        hovered = Some(entry.record);
                    }
                    ui.add_space(8.0);
                }
            });
        });

        match hovered {
            Some(id) => state.set_highlight(id, HighlightSource::Legend),
            None => state.clear_highlight_from(HighlightSource::Legend),
        }
        if let Some(id) = removed {
            let _ = state.toggle_selection(id);
        }
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
    use dv_core::{Channel, Value, SELECTION_PALETTE};

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Name".into(), "A".into(), "Code".into()],
            vec![
                vec![Value::Text("north".into()), Value::Number(1.0), Value::Text("N1".into())],
                vec![Value::Text("".into()), Value::Number(2.0), Value::Text("".into())],
                vec![Value::Text("south".into()), Value::Number(3.0), Value::Text("S1".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_entries_follow_selection_order() {
        let ds = dataset();
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(2)).unwrap();
        selection.toggle(RecordId(1)).unwrap();

        let entries = legend_entries(&ds, &DimensionMapping::defaults_for(&ds, &[]), &selection);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "south");
        assert_eq!(entries[0].color, SELECTION_PALETTE[0]);
        assert_eq!(entries[1].label, "Item 2");
        assert_eq!(entries[1].color, SELECTION_PALETTE[1]);
    }

    #[test]
    fn test_removed_record_leaves_legend() {
        let ds = dataset();
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(0)).unwrap();
        selection.toggle(RecordId(2)).unwrap();
        selection.toggle(RecordId(0)).unwrap();

        let mapping = DimensionMapping::defaults_for(&ds, &[]);
        let entries = legend_entries(&ds, &mapping, &selection);
        assert_eq!(entries.iter().map(|e| e.record).collect::<Vec<_>>(), vec![RecordId(2)]);
        assert!(legend_entries(&ds, &mapping, &SelectionSet::new()).is_empty());
    }

    #[test]
    fn test_label_channel_renames_entries() {
        let ds = dataset();
        let mut mapping = DimensionMapping::defaults_for(&ds, &[]);
        mapping.set(Channel::Label, "Code", &ds).unwrap();
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(0)).unwrap();
        selection.toggle(RecordId(1)).unwrap();

        let labels: Vec<_> = legend_entries(&ds, &mapping, &selection)
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["N1", "Item 2"]);
    }
}
