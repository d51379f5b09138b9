//! Entry list screen

use std::sync::Arc;
use std::time::Duration;
use egui::{Color32, RichText, ScrollArea, Ui};
use tokio::runtime::Handle;
use dex_core::events::events::PageLoaded;
use dex_core::events::EventBus;
use dex_core::{AppSettings, DexSource, EntrySummary, Identifier};
use dex_views::{ListBrowser, PageFeed, SortKey};

use crate::detail_card::display_name;
use crate::theme::{error_color, Theme};

/// Remaining scroll height that triggers the next page
const LOAD_MORE_THRESHOLD: f32 = 200.0;

/// List panel widget
pub struct ListPanel {
    browser: ListBrowser,
    feed: PageFeed,
    events: Arc<EventBus>,
}

impl ListPanel {
    pub fn new(source: Arc<dyn DexSource>, runtime: Handle, page_size: usize, events: Arc<EventBus>) -> Self {
        Self {
            browser: ListBrowser::new(page_size),
            feed: PageFeed::new(source, runtime),
            events,
        }
    }

    pub fn browser(&self) -> &ListBrowser {
        &self.browser
    }

    /// Show the list; returns the entry the user opened
    pub fn ui(&mut self, ui: &mut Ui, settings: &AppSettings, theme: &Theme) -> Option<Identifier> {
        let appended = self.feed.poll(&mut self.browser);
        if appended > 0 {
            self.events.publish(PageLoaded {
                entries: appended,
                total: self.browser.entries().len(),
            });
        }
        let auto_load = self.browser.last_error().is_none();
        if auto_load && self.browser.entries().is_empty() {
            self.feed.request(&mut self.browser);
        }

        self.toolbar(ui);
        ui.separator();

        let visible: Vec<EntrySummary> = self.browser.visible().into_iter().cloned().collect();
        let mut opened = None;
        let mut retry = false;

        let output = ScrollArea::vertical()
            .id_source("entry_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let column_width = (ui.available_width() - 16.0) / 3.0;
                egui::Grid::new("entry_grid")
                    .num_columns(3)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        for (idx, entry) in visible.iter().enumerate() {
                            if entry_button(ui, entry, column_width, settings, theme).clicked() {
                                opened = Some(entry.id);
                            }
                            if idx % 3 == 2 {
                                ui.end_row();
                            }
                        }
                    });

                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if let Some(error) = self.browser.last_error() {
                        ui.colored_label(error_color(), format!("Could not load entries: {}", error));
                        if ui.button("Retry").clicked() {
                            retry = true;
                        }
                    } else if self.browser.is_loading() {
                        ui.spinner();
                    } else if self.browser.is_exhausted() {
                        ui.weak(format!("{} entries", self.browser.entries().len()));
                    } else if self.browser.is_filtering() {
                        ui.weak("Clear the search to load more");
                    }
                });
            });

        let remaining = output.content_size.y - (output.state.offset.y + output.inner_rect.height());
        if retry || (auto_load && remaining < LOAD_MORE_THRESHOLD) {
            self.feed.request(&mut self.browser);
        }
        if self.browser.is_loading() {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }

        opened
    }

    fn toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("🔍");
            ui.add(
                egui::TextEdit::singleline(self.browser.filter_mut())
                    .hint_text("Search by name or number")
                    .desired_width(240.0),
            );

            let mut sort = self.browser.sort_key();
            egui::ComboBox::from_id_source("sort_key")
                .selected_text(sort.label())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut sort, SortKey::Id, SortKey::Id.label());
                    ui.selectable_value(&mut sort, SortKey::Name, SortKey::Name.label());
                });
            if sort != self.browser.sort_key() {
                self.browser.set_sort(sort);
            }
        });
    }
}

fn entry_button(
    ui: &mut Ui,
    entry: &EntrySummary,
    width: f32,
    settings: &AppSettings,
    theme: &Theme,
) -> egui::Response {
    let text = RichText::new(format!("#{:03}\n{}", entry.id.get(), display_name(&entry.name)))
        .color(Color32::WHITE);
    let response = ui.add_sized(
        [width, 56.0],
        egui::Button::new(text).fill(theme.tint.linear_multiply(0.6)),
    );
    match settings.artwork_url(entry.id) {
        Some(url) => response.on_hover_ui(|ui| {
            ui.add(egui::Image::new(url).max_width(96.0));
        }),
        None => response,
    }
}
