//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context as _, Result};
use eframe::egui::{self, Context};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use dex_core::events::events::{CenterCommitted, FetchFailed, NavigationRejected, PageLoaded};
use dex_core::events::{handler_from_fn, EventBus};
use dex_core::{AppSettings, DexSource, Identifier, IdentifierSpace};
use dex_data::{load_settings, CachedSource, HttpSource, JsonDirSource};
use dex_ui::{icon_button, icons, ListPanel, PagerView, Theme};
use dex_views::{CuePlayer, PagerSession};

mod demo;

/// Cue player that only records what would be played
struct LoggingCuePlayer;

impl CuePlayer for LoggingCuePlayer {
    fn play(&self, uri: &str) {
        info!("Playing cue {}", uri);
    }
}

/// An open detail screen
struct DetailScreen {
    session: PagerSession,
    pager: PagerView,
}

/// Main application state
struct DexApp {
    settings: AppSettings,
    space: IdentifierSpace,
    source: Arc<dyn DexSource>,
    events: Arc<EventBus>,

    /// Entry list, kept while a detail screen is open
    list: ListPanel,

    /// Detail screen on top of the list, if any
    detail: Option<DetailScreen>,

    theme: Theme,
    cues: LoggingCuePlayer,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,
}

impl DexApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        space: IdentifierSpace,
        source: Arc<dyn DexSource>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let theme = Theme::default();
        dex_ui::apply_theme(&cc.egui_ctx, &theme);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let events = Arc::new(EventBus::new());
        subscribe_logging(&events);

        let list = ListPanel::new(
            source.clone(),
            runtime.handle().clone(),
            settings.page_size,
            events.clone(),
        );

        Self {
            settings,
            space,
            source,
            events,
            list,
            detail: None,
            theme,
            cues: LoggingCuePlayer,
            runtime,
        }
    }

    fn open_detail(&mut self, id: Identifier) {
        let (session, sender) = PagerSession::open(
            id,
            self.source.clone(),
            self.runtime.handle().clone(),
            self.space,
            self.events.clone(),
        );
        self.detail = Some(DetailScreen {
            session,
            pager: PagerView::new(sender),
        });
    }
}

impl eframe::App for DexApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut close_detail = false;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.detail.is_some() {
                    let back = icon_button(ui, icons::BACK, "Back to the list (Esc)");
                    if back.clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                        close_detail = true;
                    }
                }
                ui.heading(egui::RichText::new("Dex").color(self.theme.tint).strong());
                ui.weak(self.source.source_name());
            });
        });

        let mut opened = None;
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.detail {
            Some(screen) => {
                screen
                    .pager
                    .show(ui, &mut screen.session, &self.settings, &self.theme, &self.cues);
            }
            None => {
                opened = self.list.ui(ui, &self.settings, &self.theme);
            }
        });

        if close_detail {
            if let Some(screen) = self.detail.take() {
                info!("Closing detail screen at {}", screen.session.center());
            }
        }
        if let Some(id) = opened {
            self.open_detail(id);
        }
    }
}

/// Log the diagnostic events
fn subscribe_logging(events: &EventBus) {
    events.subscribe::<CenterCommitted>(handler_from_fn(|event| {
        if let Some(commit) = event.as_any().downcast_ref::<CenterCommitted>() {
            info!("Showing entry {} (was {})", commit.to, commit.from);
        }
    }));
    events.subscribe::<NavigationRejected>(handler_from_fn(|event| {
        if let Some(reject) = event.as_any().downcast_ref::<NavigationRejected>() {
            debug!("No entry beyond {} (offset {})", reject.center, reject.offset);
        }
    }));
    events.subscribe::<FetchFailed>(handler_from_fn(|event| {
        if let Some(failed) = event.as_any().downcast_ref::<FetchFailed>() {
            warn!("{} of {} failed on slot {:?}: {}", failed.resource, failed.id, failed.slot, failed.error);
        }
    }));
    events.subscribe::<PageLoaded>(handler_from_fn(|event| {
        if let Some(page) = event.as_any().downcast_ref::<PageLoaded>() {
            debug!("Loaded {} entries, {} in list", page.entries, page.total);
        }
    }));
}

/// Pick the catalog source and the id range it serves
fn build_source(settings: &AppSettings) -> Result<(Arc<dyn DexSource>, IdentifierSpace)> {
    let space = settings
        .id_space()
        .with_context(|| format!("Invalid id range {}..={}", settings.min_id, settings.max_id))?;

    if let Some(dir) = &settings.data_dir {
        info!("Reading catalog from {:?}", dir);
        let source = JsonDirSource::new(dir.clone(), settings.preferred_language.clone());
        return Ok((Arc::new(CachedSource::new(source, settings.cache_capacity)), space));
    }

    if let Some(base_url) = &settings.api_base_url {
        let source = HttpSource::new(base_url.clone(), settings.preferred_language.clone())
            .context("Failed to create the HTTP client")?;
        return Ok((Arc::new(CachedSource::new(source, settings.cache_capacity)), space));
    }

    info!("No catalog configured, using the demo catalog");
    let demo_space = IdentifierSpace::new(space.min().get(), demo::demo_max_id().min(space.max().get()))
        .unwrap_or(space);
    let source = demo::create_demo_source();
    Ok((Arc::new(CachedSource::new(source, settings.cache_capacity)), demo_space))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_settings(&path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => AppSettings::default(),
    };
    let (source, space) = build_source(&settings)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the tokio runtime")?;

    info!("Starting Dex with entries {}..={}", space.min(), space.max());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 900.0])
            .with_min_inner_size([480.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Dex",
        options,
        Box::new(move |cc| Box::new(DexApp::new(cc, settings, space, source, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_source_narrows_the_range() {
        let (source, space) = build_source(&AppSettings::default()).unwrap();
        assert_eq!(source.source_name(), "demo");
        assert_eq!(space.max(), Identifier::new(9));
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let settings = AppSettings {
            min_id: 10,
            max_id: 1,
            ..AppSettings::default()
        };
        assert!(build_source(&settings).is_err());
    }

    #[test]
    fn test_api_base_url_selects_remote_catalog() {
        let settings = AppSettings {
            api_base_url: Some("https://pokeapi.co/api/v2/".to_string()),
            ..AppSettings::default()
        };
        let (source, space) = build_source(&settings).unwrap();
        assert_eq!(source.source_name(), "https://pokeapi.co/api/v2");
        assert_eq!(space, settings.id_space().unwrap());
    }

    #[test]
    fn test_data_dir_wins_over_api() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings {
            data_dir: Some(dir.path().to_path_buf()),
            api_base_url: Some("https://pokeapi.co/api/v2".to_string()),
            ..AppSettings::default()
        };
        let (source, _) = build_source(&settings).unwrap();
        assert_eq!(source.source_name(), dir.path().display().to_string());
    }
}
