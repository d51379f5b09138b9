use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle};
use std::collections::BTreeMap;

/// Theme configuration
///
/// Passed into every widget that draws with catalog colors.
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,

    /// App tint, used for chrome and entries without a type
    pub tint: Color32,

    /// Card accent per type tag
    pub type_colors: BTreeMap<String, Color32>,
}

impl Default for Theme {
    fn default() -> Self {
        let type_colors = [
            ("normal", (168, 167, 122)),
            ("fire", (238, 129, 48)),
            ("water", (99, 144, 240)),
            ("electric", (247, 208, 44)),
            ("grass", (122, 199, 76)),
            ("ice", (150, 217, 214)),
            ("fighting", (194, 46, 40)),
            ("poison", (163, 62, 161)),
            ("ground", (226, 191, 101)),
            ("flying", (169, 143, 243)),
            ("psychic", (249, 85, 135)),
            ("bug", (166, 185, 26)),
            ("rock", (182, 161, 54)),
            ("ghost", (115, 87, 151)),
            ("dragon", (111, 53, 252)),
            ("dark", (112, 87, 70)),
            ("steel", (183, 183, 206)),
            ("fairy", (214, 133, 173)),
        ]
        .into_iter()
        .map(|(name, (r, g, b))| (name.to_string(), Color32::from_rgb(r, g, b)))
        .collect();

        Self {
            name: "Dex Dark".to_string(),
            dark_mode: true,
            tint: Color32::from_rgb(0xDC, 0x0A, 0x2D),
            type_colors,
        }
    }
}

impl Theme {
    /// Accent color of a type tag; the tint for unknown or missing types
    pub fn type_color(&self, type_name: Option<&str>) -> Color32 {
        type_name
            .and_then(|name| self.type_colors.get(&name.to_lowercase()))
            .copied()
            .unwrap_or(self.tint)
    }
}

/// Apply the application theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let bg_color = Color32::from_rgb(23, 23, 23);
    let panel_bg = Color32::from_rgb(31, 31, 31);
    let widget_bg = Color32::from_rgb(40, 40, 40);
    let hover_color = Color32::from_rgb(50, 50, 50);
    let active_color = Color32::from_rgb(60, 60, 60);
    let text_color = Color32::from_rgb(220, 220, 220);

    if theme.dark_mode {
        visuals.window_fill = panel_bg;
        visuals.panel_fill = panel_bg;
        visuals.extreme_bg_color = bg_color;
        visuals.faint_bg_color = widget_bg;

        visuals.widgets.noninteractive.bg_fill = widget_bg;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.inactive.bg_fill = widget_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.hovered.bg_fill = hover_color;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.active.bg_fill = active_color;
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(6.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, theme.tint);

    // Selection and highlighting
    visuals.selection.bg_fill = theme.tint.linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, theme.tint);
    visuals.hyperlink_color = Color32::from_rgb(100, 150, 250);

    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.indent = 20.0;

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));

    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_color_lookup() {
        let theme = Theme::default();
        assert_eq!(theme.type_color(Some("grass")), Color32::from_rgb(122, 199, 76));
        assert_eq!(theme.type_color(Some("Fire")), Color32::from_rgb(238, 129, 48));
        assert_eq!(theme.type_color(Some("shadow")), theme.tint);
        assert_eq!(theme.type_color(None), theme.tint);
    }
}
