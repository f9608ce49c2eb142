use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value as JsonValue};

use super::model::{Category, Coordinates, PropertyValue, SightingIcon, SightingRecord, SightingStatus};

/// Years covered by the published data.
pub const YEAR_RANGE: RangeInclusive<i32> = 2017..=2025;
pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;

// ---------------------------------------------------------------------------
// Deployment variants
// ---------------------------------------------------------------------------

/// Where the canonical category of a feature comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySource {
    /// Icon file name, e.g. `"bear.svg"`.
    Icon { key: String },
    /// Status label, e.g. `"フンを確認"`.
    Status { key: String },
    /// Free-text description resolved with the icon priority order.
    Description { key: String },
}

impl CategorySource {
    pub fn icon() -> Self {
        CategorySource::Icon { key: "category".to_string() }
    }

    pub fn status() -> Self {
        CategorySource::Status { key: "status".to_string() }
    }

    pub fn description() -> Self {
        CategorySource::Description { key: "description".to_string() }
    }

    pub fn key(&self) -> &str {
        match self {
            CategorySource::Icon { key }
            | CategorySource::Status { key }
            | CategorySource::Description { key } => key,
        }
    }

    /// Replace the property key, keeping the variant.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        let key = key.into();
        match self {
            CategorySource::Icon { .. } => CategorySource::Icon { key },
            CategorySource::Status { .. } => CategorySource::Status { key },
            CategorySource::Description { .. } => CategorySource::Description { key },
        }
    }

    /// Every category this source can produce, in display order.
    pub fn options(&self) -> Vec<Category> {
        match self {
            CategorySource::Icon { .. } | CategorySource::Description { .. } => {
                SightingIcon::PRIORITY.into_iter().map(Category::Icon).collect()
            }
            CategorySource::Status { .. } => {
                SightingStatus::ALL.into_iter().map(Category::Status).collect()
            }
        }
    }
}

/// Where year and month come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    /// Direct numeric properties.
    Fields { year_key: String, month_key: String },
    /// A single date (or date-time) string property.
    DateString { key: String },
}

impl DateSource {
    pub fn fields() -> Self {
        DateSource::Fields {
            year_key: "year".to_string(),
            month_key: "month".to_string(),
        }
    }

    pub fn date_string() -> Self {
        DateSource::DateString { key: "date".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub category_source: CategorySource,
    pub date_source: DateSource,
    /// Reject features whose category does not resolve.
    pub require_category: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            category_source: CategorySource::icon(),
            date_source: DateSource::fields(),
            require_category: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Feature normalization
// ---------------------------------------------------------------------------

/// Convert one raw GeoJSON feature into a [`SightingRecord`].
///
/// Returns `None` when the feature is not a `Point`, its coordinates are not
/// a finite `[lon, lat]` pair, `properties` is missing, or year / month do
/// not resolve to an in-range value. An unknown category only rejects the
/// feature when `require_category` is set.
pub fn normalize_feature(feature: &JsonValue, config: &NormalizerConfig) -> Option<SightingRecord> {
    let obj = feature.as_object()?;

    let geometry = obj.get("geometry")?.as_object()?;
    if geometry.get("type")?.as_str()? != "Point" {
        return None;
    }
    let coordinates = point_coordinates(geometry.get("coordinates")?)?;

    let properties = obj.get("properties")?.as_object()?;

    let (year, month) = resolve_year_month(properties, &config.date_source)?;

    let category = resolve_category(properties, &config.category_source);
    if config.require_category && category.is_none() {
        return None;
    }

    Some(SightingRecord {
        coordinates,
        year,
        month,
        category,
        properties: properties
            .iter()
            .map(|(key, val)| (key.clone(), PropertyValue::from(val)))
            .collect(),
    })
}

fn point_coordinates(val: &JsonValue) -> Option<Coordinates> {
    let arr = val.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let longitude = arr[0].as_f64()?;
    let latitude = arr[1].as_f64()?;
    if !longitude.is_finite() || !latitude.is_finite() {
        return None;
    }
    Some(Coordinates { longitude, latitude })
}

// ---------------------------------------------------------------------------
// Year / month
// ---------------------------------------------------------------------------

pub fn is_valid_year(year: i64) -> bool {
    i32::try_from(year).is_ok_and(|y| YEAR_RANGE.contains(&y))
}

pub fn is_valid_month(month: i64) -> bool {
    u32::try_from(month).is_ok_and(|m| MONTH_RANGE.contains(&m))
}

fn resolve_year_month(
    properties: &Map<String, JsonValue>,
    source: &DateSource,
) -> Option<(i32, u32)> {
    let (year, month) = match source {
        DateSource::Fields { year_key, month_key } => (
            integral(properties.get(year_key)?)?,
            integral(properties.get(month_key)?)?,
        ),
        DateSource::DateString { key } => {
            let date = parse_report_date(properties.get(key)?.as_str()?)?;
            (i64::from(date.year()), i64::from(date.month()))
        }
    };

    if !is_valid_year(year) || !is_valid_month(month) {
        return None;
    }
    Some((i32::try_from(year).ok()?, u32::try_from(month).ok()?))
}

/// A JSON number with no fractional part. Strings are not coerced.
fn integral(val: &JsonValue) -> Option<i64> {
    if let Some(i) = val.as_i64() {
        return Some(i);
    }
    let f = val.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];

const DATETIME_FORMATS: [&str; 12] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%dT%H:%M:%S",
    "%Y/%m/%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y年%m月%d日T%H:%M:%S",
    "%Y年%m月%d日T%H:%M",
    "%Y年%m月%d日 %H:%M:%S",
    "%Y年%m月%d日 %H:%M",
];

/// Parse the date part of a report timestamp.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

fn resolve_category(properties: &Map<String, JsonValue>, source: &CategorySource) -> Option<Category> {
    let raw = properties.get(source.key())?.as_str()?;
    match source {
        CategorySource::Icon { .. } => SightingIcon::from_file_name(raw).map(Category::Icon),
        CategorySource::Status { .. } => SightingStatus::from_wire_label(raw).map(Category::Status),
        CategorySource::Description { .. } => resolve_by_priority(raw).map(Category::Icon),
    }
}

/// Pick the highest-priority icon whose keywords appear in `text`.
pub fn resolve_by_priority(text: &str) -> Option<SightingIcon> {
    SightingIcon::PRIORITY
        .into_iter()
        .find(|icon| icon.keywords().iter().any(|kw| text.contains(kw)))
}
