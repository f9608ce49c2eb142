//! Bear sighting map: GeoJSON normalization and filtering, plus the egui
//! viewer built on top of it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
