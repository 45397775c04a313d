//! User interface components for the dashboard
//!
//! Theme, the menu bar, channel pickers and notice toasts. Views live in
//! `dv-views`; everything here talks to the shared `DashboardState` only.

pub mod channel_menu;
pub mod notices;
pub mod shell;
pub mod theme;
pub mod widget_utils;

/// Re-export commonly used types
pub use channel_menu::{channel_menu, channel_menus, ChannelMenuModel, MENU_CHANNELS};
pub use notices::show_notices;
pub use shell::{channel_bar, menu_bar, status_text, MenuAction, ShellConfig};
pub use theme::{apply_theme, Theme};
pub use widget_utils::{channel_widget_id, notices_area_id};

// Common icon definitions
pub mod icons {
    pub const FOLDER: &str = "📁";
    pub const TABLE: &str = "📋";
}
