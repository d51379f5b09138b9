//! Detail card widget

use egui::{Align, Color32, Frame, Layout, Margin, ProgressBar, RichText, Rounding, Ui};
use dex_views::DetailPresentation;

use crate::theme::{error_color, Theme};

/// Artwork is loaded through the image loaders installed at startup
const ARTWORK_HEIGHT: f32 = 180.0;

/// What the user asked for while the card was shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardAction {
    pub retry: bool,
    pub play_cue: bool,
}

/// Draw one card filling `ui`; `None` draws an empty card
pub fn detail_card(ui: &mut Ui, card: Option<&DetailPresentation>, theme: &Theme) -> CardAction {
    let mut action = CardAction::default();
    let accent = theme.type_color(card.and_then(|card| card.accent_type.as_deref()));

    Frame::none()
        .fill(accent.linear_multiply(0.25))
        .stroke(egui::Stroke::new(1.0, accent))
        .rounding(Rounding::same(12.0))
        .inner_margin(Margin::same(16.0))
        .show(ui, |ui| {
            ui.set_min_size(ui.available_size());

            let Some(card) = card else {
                return;
            };
            if card.out_of_range {
                ui.centered_and_justified(|ui| {
                    ui.weak("No entry");
                });
                return;
            }

            header(ui, card);
            ui.add_space(4.0);
            type_chips(ui, &card.types, theme);
            ui.add_space(8.0);

            if let Some(uri) = &card.artwork_uri {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Image::new(uri.as_str()).max_height(ARTWORK_HEIGHT))
                        .on_hover_text(uri.as_str());
                });
            }

            if card.detail_failed || card.description_failed {
                ui.horizontal(|ui| {
                    ui.colored_label(error_color(), failure_text(card));
                    if ui.button("Retry").clicked() {
                        action.retry = true;
                    }
                });
            }

            egui::Grid::new(("card_facts", card.slot.index()))
                .num_columns(2)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    ui.weak("Weight");
                    ui.label(card.weight.as_deref().unwrap_or("-"));
                    ui.end_row();

                    ui.weak("Size");
                    ui.label(card.size.as_deref().unwrap_or("-"));
                    ui.end_row();

                    if !card.moves.is_empty() {
                        ui.weak("Moves");
                        ui.label(card.moves.join(", "));
                        ui.end_row();
                    }
                });

            if let Some(bio) = &card.bio {
                ui.add_space(8.0);
                ui.label(RichText::new(bio).italics());
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Base stats").strong().color(accent));
            egui::Grid::new(("card_stats", card.slot.index()))
                .num_columns(3)
                .show(ui, |ui| {
                    for stat in &card.stats {
                        ui.label(&stat.label);
                        ui.monospace(format!("{:>3}", stat.value));
                        ui.add(ProgressBar::new(stat.ratio).fill(accent).desired_width(160.0));
                        ui.end_row();
                    }
                });

            if card.has_cue() {
                ui.add_space(8.0);
                if ui.button("🔊 Play cry").clicked() {
                    action.play_cue = true;
                }
            }
        });

    action
}

fn header(ui: &mut Ui, card: &DetailPresentation) {
    ui.horizontal(|ui| {
        match &card.name {
            Some(name) => ui.heading(display_name(name)),
            None => ui.heading("…"),
        };
        if card.loading {
            ui.spinner();
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(RichText::new(&card.number_label).monospace().size(18.0));
        });
    });
}

fn type_chips(ui: &mut Ui, types: &[String], theme: &Theme) {
    ui.horizontal(|ui| {
        for type_name in types {
            Frame::none()
                .fill(theme.type_color(Some(type_name)))
                .rounding(Rounding::same(8.0))
                .inner_margin(Margin::symmetric(8.0, 2.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(display_name(type_name)).color(Color32::WHITE).small());
                });
        }
    });
}

fn failure_text(card: &DetailPresentation) -> &'static str {
    match (card.detail_failed, card.description_failed) {
        (true, true) => "Could not load this entry",
        (true, false) => "Could not load details",
        _ => "Could not load description",
    }
}

/// `mr-mime` -> `Mr-mime`
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
