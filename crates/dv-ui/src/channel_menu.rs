//! Dimension pickers for the visual channels

use egui::{ComboBox, Ui};

use dv_core::{Channel, DashboardState, Dataset, DimensionMapping};

use crate::widget_utils::channel_widget_id;

/// What a channel menu offers for the current dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMenuModel {
    pub channel: Channel,
    pub current: Option<String>,
    pub options: Vec<String>,
}

impl ChannelMenuModel {
    pub fn new(channel: Channel, dataset: &Dataset, mapping: &DimensionMapping) -> Self {
        Self {
            channel,
            current: mapping.get(channel).map(str::to_string),
            options: DimensionMapping::options(channel, dataset)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Channels exposed in the toolbar
pub const MENU_CHANNELS: [Channel; 4] = [Channel::ScatterX, Channel::ScatterY, Channel::Size, Channel::LineY];

/// One combo box per channel. A pick goes through the dashboard state, so a
/// refused binding shows up as a notice and the previous one stays.
pub fn channel_menus(ui: &mut Ui, state: &DashboardState) {
    let Some(dataset) = state.dataset() else {
        ui.label(egui::RichText::new("No dataset").weak());
        return;
    };
    let mapping = state.mapping();

    for channel in MENU_CHANNELS {
        let model = ChannelMenuModel::new(channel, &dataset, &mapping);
        if let Some(picked) = channel_menu(ui, &model) {
            if let Err(e) = state.set_dimension(channel, &picked) {
                tracing::debug!("Menu pick for {} refused: {}", channel, e);
            }
        }
    }
}

/// Draw one menu; returns the dimension picked this frame
pub fn channel_menu(ui: &mut Ui, model: &ChannelMenuModel) -> Option<String> {
    let mut picked = None;
    ui.label(model.channel.display_name());
    let text = model.current.as_deref().unwrap_or("(none)");
    ComboBox::from_id_source(channel_widget_id("channel_menu", model.channel))
        .selected_text(text)
        .show_ui(ui, |ui| {
            for option in &model.options {
                let is_current = model.current.as_deref() == Some(option.as_str());
                if ui.selectable_label(is_current, option).clicked() && !is_current {
                    picked = Some(option.clone());
                }
            }
        });
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::Value;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Name".into(), "A".into(), "B".into()],
            vec![vec![Value::Text("x".into()), Value::Number(1.0), Value::Number(2.0)]],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_channels_offer_numeric_dimensions() {
        let ds = dataset();
        let mapping = DimensionMapping::defaults_for(&ds, &[]);
        let model = ChannelMenuModel::new(Channel::ScatterX, &ds, &mapping);
        assert_eq!(model.options, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(model.current.as_deref(), Some("A"));

        let label = ChannelMenuModel::new(Channel::Label, &ds, &mapping);
        assert_eq!(label.options.len(), 3);
    }

    #[test]
    fn test_menu_pick_rebinds_channel() {
        let state = DashboardState::default();
        state.load_dataset(dataset(), "menu.csv");
        state.set_dimension(Channel::ScatterY, "A").unwrap();

        let model = ChannelMenuModel::new(Channel::ScatterY, &state.dataset().unwrap(), &state.mapping());
        assert_eq!(model.current.as_deref(), Some("A"));
        assert!(state.set_dimension(Channel::ScatterY, "Name").is_err());
        assert_eq!(state.dimension(Channel::ScatterY).as_deref(), Some("A"));
    }
}
