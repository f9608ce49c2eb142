use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use eframe::egui;

use crate::data::loader::{DataSource, PendingLoad};
use crate::data::normalize::NormalizerConfig;
use crate::state::AppState;
use crate::ui::panels::{self, TopBarAction};
use crate::ui::plot;

const FALLBACK_FONT: &str = "fallback";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BearMapApp {
    pub state: AppState,
    /// Configured data location, used again by File → Reload.
    source: DataSource,
    config: NormalizerConfig,
    /// In-flight load; replacing it cancels the previous one.
    pending: Option<PendingLoad>,
}

impl BearMapApp {
    /// Build the app and start the one data fetch of the session.
    pub fn new(cc: &eframe::CreationContext<'_>, source: DataSource, config: NormalizerConfig) -> Self {
        let mut app = Self {
            state: AppState::new(&config.category_source),
            source: source.clone(),
            config,
            pending: None,
        };
        app.start_load(&cc.egui_ctx, source);
        app
    }

    fn start_load(&mut self, ctx: &egui::Context, source: DataSource) {
        self.state.begin_loading(&source);
        let ctx = ctx.clone();
        match PendingLoad::spawn(source, self.config.clone(), move || ctx.request_repaint()) {
            Ok(pending) => self.pending = Some(pending),
            Err(e) => {
                log::error!("Failed to start loading: {e:#}");
                self.pending = None;
                self.state.set_load_failed(format!("{e:#}"));
            }
        }
    }

    fn poll_load(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        let Some(result) = pending.try_take() else {
            return;
        };
        let source = pending.source().to_string();
        self.pending = None;

        match result {
            Ok(records) => {
                log::info!("Loaded {} sightings from {source}", records.len());
                self.state.set_records(records);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e:#}");
                self.state.set_load_failed(format!("{e:#}"));
            }
        }
    }
}

impl eframe::App for BearMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        // ---- Top panel: menu bar ----
        let mut action = None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            action = panels::top_bar(ui, &mut self.state);
        });
        match action {
            Some(TopBarAction::Open(path)) => self.start_load(ctx, DataSource::File(path)),
            Some(TopBarAction::Reload) => self.start_load(ctx, self.source.clone()),
            None => {}
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::sighting_map(ui, &mut self.state);
        });

        // ---- Floating windows ----
        panels::detail_window(ctx, &mut self.state);
        panels::about_window(ctx, &mut self.state);
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Append the font at `path` to every family so glyphs missing from the
/// built-in fonts (Japanese property text) still render.
pub fn install_fallback_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        FALLBACK_FONT.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(FALLBACK_FONT.to_owned());
    }
    ctx.set_fonts(fonts);
    Ok(())
}
