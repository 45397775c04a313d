//! Table view implementation

mod legend;

pub use legend::{legend_entries, LegendEntry, LegendView, LEGEND_PLACEHOLDER};

use egui::{Color32, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use dv_core::{Dataset, Highlight, HighlightSource, RecordId, SelectionSet};

use crate::{view_placeholder, SpaceView, SpaceViewId, ViewerContext};

/// Configuration for table views
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub show_row_numbers: bool,
    pub resizable_columns: bool,
    pub striped_rows: bool,
    pub max_rows_displayed: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: true,
            resizable_columns: true,
            striped_rows: true,
            max_rows_displayed: 5000,
        }
    }
}

/// How a row is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    /// Selected record, drawn with its selection color
    Selected(Color32),
    /// Currently highlighted from any view
    Highlighted,
}

pub fn row_style(id: RecordId, selection: &SelectionSet, highlight: Option<Highlight>) -> RowStyle {
    if highlight.map(|h| h.record) == Some(id) {
        RowStyle::Highlighted
    } else if selection.is_selected(id) {
        RowStyle::Selected(selection.color_of(id))
    } else {
        RowStyle::Plain
    }
}

/// Raw rows of the active dataset, one column per dimension
pub struct TableView {
    id: SpaceViewId,
    title: String,
    pub config: TableConfig,
}

impl TableView {
    /// Create a new table view
    pub fn new(id: SpaceViewId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            config: TableConfig::default(),
        }
    }

    fn render_table(&mut self, ui: &mut Ui, dataset: &Dataset, ctx: &ViewerContext) {
        let state = &ctx.state;
        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let num_rows = dataset.len().min(self.config.max_rows_displayed);
        let selection = state.selection();
        let highlight = state.highlight();
        let selection_bg_fill = ui.style().visuals.selection.bg_fill;
        let selection_stroke_color = ui.style().visuals.selection.stroke.color;

        let mut hovered: Option<RecordId> = None;
        let mut clicked: Option<RecordId> = None;

        let mut builder = TableBuilder::new(ui)
            .striped(self.config.striped_rows)
            .resizable(self.config.resizable_columns)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(true);

        if self.config.show_row_numbers {
            builder = builder.column(Column::initial(50.0).at_least(40.0));
        }
        for _ in 0..dataset.dimension_count() {
            builder = builder.column(Column::initial(110.0).at_least(60.0).at_most(400.0).clip(true));
        }

        builder
            .header(20.0, |mut header| {
                if self.config.show_row_numbers {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                }
                for dimension in dataset.dimensions() {
                    header.col(|ui| {
                        ui.strong(dimension);
                    });
                }
            })
            .body(|mut body| {
                for record in dataset.records().iter().take(num_rows) {
                    let id = record.id();
                    let style = row_style(id, &selection, highlight);
                    body.row(text_height, |mut row| {
                        let mut cell = |ui: &mut Ui, text: String, column: usize| {
                            let rect = ui.max_rect();
                            match style {
                                RowStyle::Highlighted => {
                                    ui.painter().rect_filled(rect, 0.0, selection_bg_fill);
                                }
                                RowStyle::Selected(color) if column == 0 => {
                                    ui.painter().rect_filled(rect, 0.0, color.linear_multiply(0.35));
                                }
                                _ => {}
                            }
                            let response = ui.interact(rect, ui.id().with(("table_cell", id.0, column)), Sense::click());
                            if response.hovered() {
                                hovered = Some(id);
                            }
                            if response.clicked() {
                                clicked = Some(id);
                            }
                            if style == RowStyle::Highlighted {
                                ui.label(egui::RichText::new(text).color(selection_stroke_color));
                            } else {
                                ui.label(text);
                            }
                        };

                        if self.config.show_row_numbers {
                            row.col(|ui| cell(ui, (id.0 + 1).to_string(), 0));
                        }
                        let offset = usize::from(self.config.show_row_numbers);
                        for (i, value) in record.values().iter().enumerate() {
                            row.col(|ui| cell(ui, value.to_string(), i + offset));
                        }
                    });
                }
            });

        match hovered {
            Some(id) => state.set_highlight(id, HighlightSource::Table),
            None => state.clear_highlight_from(HighlightSource::Table),
        }
        if let Some(id) = clicked {
            // A full selection is reported as a notice by the state
            let _ = state.toggle_selection(id);
        }
    }
}

impl SpaceView for TableView {
    fn id(&self) -> SpaceViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "TableView"
    }

    fn ui(&mut self, ctx: &ViewerContext, ui: &mut Ui) {
        let Some(dataset) = ctx.state.dataset() else {
            view_placeholder(ui, "No data loaded");
            return;
        };
        if dataset.is_empty() {
            view_placeholder(ui, "The dataset has no rows");
            return;
        }

        if dataset.len() > self.config.max_rows_displayed {
            ui.label(
                egui::RichText::new(format!(
                    "Showing first {} of {} rows",
                    self.config.max_rows_displayed,
                    dataset.len()
                ))
                .weak(),
            );
        }
        egui::ScrollArea::horizontal().show(ui, |ui| {
            self.render_table(ui, &dataset, ctx);
        });
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
    use dv_core::SELECTION_PALETTE;

    #[test]
    fn test_row_style_prefers_highlight() {
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId(2)).unwrap();
        let highlight = Some(Highlight {
            record: RecordId(2),
            source: HighlightSource::Scatter,
        });

        assert_eq!(row_style(RecordId(2), &selection, highlight), RowStyle::Highlighted);
        assert_eq!(
            row_style(RecordId(2), &selection, None),
            RowStyle::Selected(SELECTION_PALETTE[0])
        );
        assert_eq!(row_style(RecordId(0), &selection, highlight), RowStyle::Plain);
    }
}
