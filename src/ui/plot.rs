use std::collections::BTreeMap;

use eframe::egui::{Color32, Pos2, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::data::model::Category;
use crate::state::{AppState, LoadStatus};

/// Click distance, in screen pixels, within which a marker is picked.
const PICK_RADIUS: f32 = 12.0;

/// Used before anything is loaded (Sapporo city centre).
const DEFAULT_LATITUDE: f64 = 43.0621;

// ---------------------------------------------------------------------------
// Sighting map (central panel)
// ---------------------------------------------------------------------------

/// Render visible sightings as an equirectangular scatter and handle marker
/// clicks.
pub fn sighting_map(ui: &mut Ui, state: &mut AppState) {
    if state.records.is_empty() {
        let message = match &state.status {
            LoadStatus::Loading => "Loading sightings…",
            LoadStatus::Failed(_) => "No data available",
            LoadStatus::Idle | LoadStatus::Loaded => "No sightings to show  (File → Open…)",
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    }

    let latitude = state
        .bounds
        .map(|b| b.center().latitude)
        .unwrap_or(DEFAULT_LATITUDE);
    // A degree of longitude is cos(lat) as long as a degree of latitude.
    let aspect = 1.0 / latitude.to_radians().cos();

    let mut plot = Plot::new("sighting_map")
        .legend(Legend::default())
        .data_aspect(aspect as f32)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if std::mem::take(&mut state.fit_view) {
        plot = plot.reset();
    }

    // One series per category so the legend doubles as a key.
    let mut series: BTreeMap<Option<Category>, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let rec = &state.records[idx];
        series
            .entry(rec.category)
            .or_default()
            .push([rec.coordinates.longitude, rec.coordinates.latitude]);
    }
    let selected = state
        .selected_record()
        .map(|rec| [rec.coordinates.longitude, rec.coordinates.latitude]);
    let color_map = &state.color_map;

    let response = plot.show(ui, |plot_ui| {
        for (category, points) in series {
            let name = category.map_or("Uncategorized", Category::label);
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name(name)
                    .color(color_map.color_for(category))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(5.0),
            );
        }
        if let Some(point) = selected {
            plot_ui.points(
                Points::new(PlotPoints::from(vec![point]))
                    .color(Color32::WHITE)
                    .shape(MarkerShape::Circle)
                    .filled(false)
                    .radius(9.0),
            );
        }
    });

    if response.response.clicked() {
        if let Some(pointer) = response.response.interact_pointer_pos() {
            let hit = nearest_within(
                state.visible_indices.iter().map(|&idx| {
                    let c = state.records[idx].coordinates;
                    let pos = response
                        .transform
                        .position_from_point(&PlotPoint::new(c.longitude, c.latitude));
                    (idx, pos)
                }),
                pointer,
                PICK_RADIUS,
            );
            match hit {
                Some(idx) => state.select(idx),
                None => state.clear_selection(),
            }
        }
    }
}

/// Index of the candidate closest to `pointer`, if any lies within `radius`.
pub fn nearest_within(
    candidates: impl IntoIterator<Item = (usize, Pos2)>,
    pointer: Pos2,
    radius: f32,
) -> Option<usize> {
    candidates
        .into_iter()
        .map(|(idx, pos)| (idx, pos.distance(pointer)))
        .filter(|&(_, dist)| dist <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(idx, _)| idx)
}
