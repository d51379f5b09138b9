//! User interface components for the catalog browser
//!
//! This crate provides the egui widgets: the entry list, the three-slot
//! pager host, the detail card and the theme they draw with.

pub mod detail_card;
pub mod list_panel;
pub mod pager_view;
pub mod theme;

/// Re-export commonly used types
pub use detail_card::{detail_card, CardAction};
pub use list_panel::ListPanel;
pub use pager_view::PagerView;
pub use theme::{apply_theme, Theme};

// Widget creation helpers
pub fn icon_button(ui: &mut egui::Ui, icon: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(icon))
        .on_hover_text(tooltip)
}

// Common icon definitions
pub mod icons {
    pub const BACK: &str = "⬅";
}
