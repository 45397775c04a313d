use egui::{Context, TopBottomPanel};

use dv_core::{DashboardState, MAX_SELECTION};

use crate::channel_menu::channel_menus;
use crate::icons;

/// Something the user asked for from the menu bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenCsv,
    LoadSample,
    ClearSelection,
    ResetLayout,
    ToggleTheme,
    Exit,
}

/// Shell configuration
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub show_menu_bar: bool,
    pub show_channel_bar: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            show_menu_bar: true,
            show_channel_bar: true,
        }
    }
}

/// One-line status: source, size and selection fill
pub fn status_text(state: &DashboardState) -> String {
    match state.dataset() {
        Some(dataset) => format!(
            "{} | {} rows × {} dimensions | {}/{} selected",
            state.source_name().unwrap_or_default(),
            dataset.len(),
            dataset.dimension_count(),
            state.selection().len(),
            MAX_SELECTION
        ),
        None => "No dataset loaded".to_string(),
    }
}

/// Render the main menu bar and return the action picked this frame
pub fn menu_bar(ctx: &Context, state: &DashboardState) -> Option<MenuAction> {
    let mut action = None;
    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button(format!("{} Open CSV...", icons::FOLDER)).clicked() {
                    action = Some(MenuAction::OpenCsv);
                    ui.close_menu();
                }
                if ui.button(format!("{} Load sample dataset", icons::TABLE)).clicked() {
                    action = Some(MenuAction::LoadSample);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    action = Some(MenuAction::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Selection", |ui| {
                if ui.button("Clear selection").clicked() {
                    action = Some(MenuAction::ClearSelection);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset Layout").clicked() {
                    action = Some(MenuAction::ResetLayout);
                    ui.close_menu();
                }
                if ui.button("Toggle light/dark").clicked() {
                    action = Some(MenuAction::ToggleTheme);
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(status_text(state));
            });
        });
    });
    action
}

/// Channel menus above the views
pub fn channel_bar(ctx: &Context, state: &DashboardState) {
    TopBottomPanel::top("channel_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            channel_menus(ui, state);
        });
    });
}
