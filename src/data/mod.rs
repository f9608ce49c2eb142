/// Data layer: core types, loading, normalization, and filtering.
///
/// Architecture:
/// ```text
///  data/bears.geojson (file or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch once → serde_json::Value
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  FeatureCollection envelope
///   └──────────┘
///        │  per feature
///        ▼
///   ┌───────────┐
///   │ normalize  │  Point + year/month + category → SightingRecord
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / month / category predicates → visible indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod parser;
