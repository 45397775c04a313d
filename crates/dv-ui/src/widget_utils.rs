//! Stable egui ids for widgets drawn in loops over channels and notices

use egui::Id;

use dv_core::Channel;

/// Id of the bottom-right notice area
pub fn notices_area_id() -> Id {
    Id::new("dashboard_notices")
}

/// Id of a widget belonging to one channel, e.g. its combo box
pub fn channel_widget_id(kind: &str, channel: Channel) -> Id {
    Id::new((kind, channel.key()))
}
