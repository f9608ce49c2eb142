use bear_map::app::{self, BearMapApp};
use bear_map::config::Cli;
use clap::Parser;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let cli = Cli::parse();
    let source = cli.data_source();
    let normalizer = cli.normalizer_config();
    let font = cli.font.clone();
    log::info!("Reading sightings from {source}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bear Sighting Map – Sapporo 2017–2025",
        options,
        Box::new(move |cc| {
            if let Some(path) = &font {
                if let Err(e) = app::install_fallback_font(&cc.egui_ctx, path) {
                    log::warn!("Ignoring --font: {e:#}");
                }
            }
            Ok(Box::new(BearMapApp::new(cc, source, normalizer)))
        }),
    )
}
