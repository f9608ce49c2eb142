use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::SightingRecord;
use super::normalize::{normalize_feature, NormalizerConfig};

/// Document-level failure: the payload is not a usable FeatureCollection.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("document is not a GeoJSON FeatureCollection")]
    NotFeatureCollection,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validate the FeatureCollection envelope and normalize every feature.
///
/// A missing or non-array `features` member is an empty collection. Malformed
/// features are dropped; the survivors keep their input order.
pub fn parse_feature_collection(
    root: &JsonValue,
    config: &NormalizerConfig,
) -> Result<Vec<SightingRecord>, FormatError> {
    let obj = root.as_object().ok_or(FormatError::NotFeatureCollection)?;
    if obj.get("type").and_then(JsonValue::as_str) != Some("FeatureCollection") {
        return Err(FormatError::NotFeatureCollection);
    }

    let features = obj
        .get("features")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let records: Vec<SightingRecord> = features
        .iter()
        .filter_map(|f| normalize_feature(f, config))
        .collect();

    let dropped = features.len() - records.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} of {} features during normalization", features.len());
    }

    Ok(records)
}

/// Decode `text` as JSON, then [`parse_feature_collection`].
pub fn parse_str(text: &str, config: &NormalizerConfig) -> Result<Vec<SightingRecord>, FormatError> {
    let root: JsonValue = serde_json::from_str(text)?;
    parse_feature_collection(&root, config)
}
