use std::path::PathBuf;

use eframe::egui::{self, Color32, Context, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::CriteriaUpdate;
use crate::data::model::SightingIcon;
use crate::state::{AppState, LoadStatus};

const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel. Any change is applied immediately.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut draft = state.criteria;
    let categories = state.category_options.clone();

    ui.strong("Year");
    egui::ComboBox::from_id_salt("year_filter")
        .selected_text(draft.year.map_or_else(|| ALL.to_string(), |y| y.to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut draft.year, None, ALL);
            for year in AppState::year_options() {
                ui.selectable_value(&mut draft.year, Some(year), year.to_string());
            }
        });
    ui.add_space(4.0);

    ui.strong("Month");
    egui::ComboBox::from_id_salt("month_filter")
        .selected_text(draft.month.map_or_else(|| ALL.to_string(), |m| m.to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut draft.month, None, ALL);
            for month in AppState::month_options() {
                ui.selectable_value(&mut draft.month, Some(month), month.to_string());
            }
        });
    ui.add_space(4.0);

    ui.strong("Category");
    egui::ComboBox::from_id_salt("category_filter")
        .selected_text(draft.category.map_or(ALL, |c| c.label()))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut draft.category, None, ALL);
            for category in &categories {
                let text = RichText::new(category.label())
                    .color(state.color_map.color_for(Some(*category)));
                ui.selectable_value(&mut draft.category, Some(*category), text);
            }
        });

    if draft != state.criteria {
        state.set_criteria(CriteriaUpdate::replace(draft));
    }

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(!state.criteria.is_wildcard(), egui::Button::new("Clear"))
            .clicked()
        {
            state.reset_criteria();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Requests from the top bar that need the app (not just the state).
pub enum TopBarAction {
    Open(PathBuf),
    Reload,
}

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<TopBarAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = open_file_dialog().map(TopBarAction::Open);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                action = Some(TopBarAction::Reload);
                ui.close_menu();
            }
        });
        ui.menu_button("Help", |ui: &mut Ui| {
            if ui.button("About").clicked() {
                state.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Reset filter").clicked() {
            state.reset_criteria();
        }

        ui.separator();

        let counts = ui.label(format!(
            "{} sightings, {} visible",
            state.records.len(),
            state.visible_indices.len()
        ));
        if let Some(source) = &state.source_label {
            counts.on_hover_text(source.as_str());
        }

        match &state.status {
            LoadStatus::Loading => {
                ui.separator();
                ui.spinner();
                ui.label("Loading…");
            }
            LoadStatus::Failed(msg) => {
                ui.separator();
                ui.label(RichText::new(format!("Failed to load data: {msg}")).color(Color32::RED));
            }
            LoadStatus::Idle | LoadStatus::Loaded => {}
        }
    });

    action
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open sighting data")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file()
}

// ---------------------------------------------------------------------------
// Detail window
// ---------------------------------------------------------------------------

/// Show the selected sighting. Closing the window (or Escape) deselects.
pub fn detail_window(ctx: &Context, state: &mut AppState) {
    let Some(rec) = state.selected_record() else {
        return;
    };

    let mut open = true;
    egui::Window::new("Sighting details")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui: &mut Ui| {
            let category = rec.category.map_or("Uncategorized", |c| c.label());
            ui.heading(rec.title());
            ui.label(
                RichText::new(category).color(state.color_map.color_for(rec.category)),
            );
            ui.label(format!("{}-{:02}", rec.year, rec.month));
            ui.label(format!(
                "{:.5}, {:.5}",
                rec.coordinates.latitude, rec.coordinates.longitude
            ));
            ui.separator();

            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto())
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Property");
                    });
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                })
                .body(|mut body| {
                    for (key, value) in &rec.properties {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(key);
                            });
                            row.col(|ui| {
                                ui.label(value.to_string());
                            });
                        });
                    }
                });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        open = false;
    }
    if !open {
        state.clear_selection();
    }
}

// ---------------------------------------------------------------------------
// About window
// ---------------------------------------------------------------------------

pub fn about_window(ctx: &Context, state: &mut AppState) {
    let color_map = &state.color_map;
    let categories = &state.category_options;

    egui::Window::new("About")
        .open(&mut state.show_about)
        .collapsible(false)
        .default_width(420.0)
        .show(ctx, |ui: &mut Ui| {
            ui.label("Bear sightings in Sapporo, 2017–2025, plotted by location.");
            ui.label("Filter by year, month and category; click a marker for details.");
            ui.separator();

            ui.strong("Categories");
            for category in categories {
                ui.horizontal(|ui: &mut Ui| {
                    ui.colored_label(color_map.color_for(Some(*category)), "●");
                    ui.label(category.label());
                });
            }

            ui.add_space(4.0);
            ui.label(format!(
                "When a report mentions several kinds of evidence, the first match in \
                 this order is used: {}. Droppings rank above footprints because they \
                 also serve as territorial marking and affect people more.",
                SightingIcon::PRIORITY
                    .iter()
                    .map(|icon| icon.label())
                    .collect::<Vec<_>>()
                    .join(" > ")
            ));
            ui.separator();
            ui.label("Data: Sapporo City open data \"Brown bear sightings in Sapporo\" (CC BY 4.0).");
        });
}
