use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// PropertyValue – a single pass-through property of a sighting
// ---------------------------------------------------------------------------

/// A dynamically-typed GeoJSON property value, kept for display only.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Nested arrays / objects, stored as compact JSON text.
    Json(String),
    Null,
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{s}"),
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Json(j) => write!(f, "{j}"),
            PropertyValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&serde_json::Value> for PropertyValue {
    fn from(val: &serde_json::Value) -> Self {
        use serde_json::Value;
        match val {
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    PropertyValue::Float(f)
                } else {
                    PropertyValue::String(n.to_string())
                }
            }
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Null => PropertyValue::Null,
            other => PropertyValue::Json(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Marker icon of a sighting, listed in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SightingIcon {
    Bear,
    LikeBear,
    Excrement,
    Footprint,
    Camera,
    Voice,
    Other,
}

impl SightingIcon {
    /// Every icon, highest priority first.
    pub const PRIORITY: [SightingIcon; 7] = [
        SightingIcon::Bear,
        SightingIcon::LikeBear,
        SightingIcon::Excrement,
        SightingIcon::Footprint,
        SightingIcon::Camera,
        SightingIcon::Voice,
        SightingIcon::Other,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SightingIcon::Bear => "bear.svg",
            SightingIcon::LikeBear => "like-bear.svg",
            SightingIcon::Excrement => "excrement.svg",
            SightingIcon::Footprint => "footprint.svg",
            SightingIcon::Camera => "camera.svg",
            SightingIcon::Voice => "voice.svg",
            SightingIcon::Other => "other.svg",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|icon| icon.file_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            SightingIcon::Bear => "Bear sighted",
            SightingIcon::LikeBear => "Bear-like animal sighted",
            SightingIcon::Excrement => "Droppings",
            SightingIcon::Footprint => "Footprint",
            SightingIcon::Camera => "Camera capture",
            SightingIcon::Voice => "Call heard",
            SightingIcon::Other => "Other",
        }
    }

    /// Phrases in a free-text report that imply this icon.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SightingIcon::Bear => &["ヒグマを目撃", "クマを目撃", "熊を目撃"],
            SightingIcon::LikeBear => &["らしき"],
            SightingIcon::Excrement => &["フン", "糞"],
            SightingIcon::Footprint => &["足跡"],
            SightingIcon::Camera => &["カメラ"],
            SightingIcon::Voice => &["鳴き声", "声"],
            SightingIcon::Other => &["その他"],
        }
    }
}

/// Report status label used by the status-keyed data variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SightingStatus {
    Sighted,
    Suspected,
    Droppings,
    Footprint,
    Other,
}

impl SightingStatus {
    pub const ALL: [SightingStatus; 5] = [
        SightingStatus::Sighted,
        SightingStatus::Suspected,
        SightingStatus::Droppings,
        SightingStatus::Footprint,
        SightingStatus::Other,
    ];

    /// Exact label found in the source data.
    pub fn wire_label(self) -> &'static str {
        match self {
            SightingStatus::Sighted => "ヒグマを目撃",
            SightingStatus::Suspected => "ヒグマらしき動物を目撃",
            SightingStatus::Droppings => "フンを確認",
            SightingStatus::Footprint => "足跡を確認",
            SightingStatus::Other => "その他",
        }
    }

    pub fn from_wire_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.wire_label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            SightingStatus::Sighted => "Bear sighted",
            SightingStatus::Suspected => "Suspected sighting",
            SightingStatus::Droppings => "Droppings confirmed",
            SightingStatus::Footprint => "Footprint confirmed",
            SightingStatus::Other => "Other",
        }
    }
}

/// The canonical categorical field of a record. One deployment only ever
/// produces one of the two kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Icon(SightingIcon),
    Status(SightingStatus),
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Icon(icon) => icon.label(),
            Category::Status(status) => status.label(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SightingRecord – one normalized GeoJSON feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// A validated sighting report.
#[derive(Debug, Clone, PartialEq)]
pub struct SightingRecord {
    pub coordinates: Coordinates,
    /// 2017..=2025
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub category: Option<Category>,
    /// Every original property, untouched. Never consulted by filtering.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl SightingRecord {
    /// Short human-readable title: the report's `title` or `location`
    /// property when present, otherwise the date.
    pub fn title(&self) -> String {
        ["title", "location"]
            .iter()
            .find_map(|key| match self.properties.get(*key) {
                Some(PropertyValue::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

// ---------------------------------------------------------------------------
// Bounds – extent of a record set, used to frame the map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Coordinates,
    pub max: Coordinates,
}

impl Bounds {
    pub fn of<'a>(records: impl IntoIterator<Item = &'a SightingRecord>) -> Option<Self> {
        records.into_iter().fold(None, |acc, rec| {
            let c = rec.coordinates;
            Some(match acc {
                None => Bounds { min: c, max: c },
                Some(b) => Bounds {
                    min: Coordinates {
                        longitude: b.min.longitude.min(c.longitude),
                        latitude: b.min.latitude.min(c.latitude),
                    },
                    max: Coordinates {
                        longitude: b.max.longitude.max(c.longitude),
                        latitude: b.max.latitude.max(c.latitude),
                    },
                },
            })
        })
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            longitude: (self.min.longitude + self.max.longitude) / 2.0,
            latitude: (self.min.latitude + self.max.latitude) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_at(longitude: f64, latitude: f64) -> SightingRecord {
        SightingRecord {
            coordinates: Coordinates { longitude, latitude },
            year: 2020,
            month: 5,
            category: None,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn icon_file_names_resolve_back() {
        for icon in SightingIcon::PRIORITY {
            assert_eq!(SightingIcon::from_file_name(icon.file_name()), Some(icon));
        }
        assert_eq!(SightingIcon::from_file_name("deer.svg"), None);
    }

    #[test]
    fn status_labels_resolve_back() {
        for status in SightingStatus::ALL {
            assert_eq!(SightingStatus::from_wire_label(status.wire_label()), Some(status));
        }
        assert_eq!(SightingStatus::from_wire_label("目撃"), None);
    }

    #[test]
    fn property_values_from_json() {
        assert_eq!(PropertyValue::from(&json!(7)), PropertyValue::Integer(7));
        assert_eq!(PropertyValue::from(&json!(1.5)), PropertyValue::Float(1.5));
        assert_eq!(PropertyValue::from(&json!("x")), PropertyValue::String("x".into()));
        assert_eq!(PropertyValue::from(&json!(null)), PropertyValue::Null);
        assert_eq!(
            PropertyValue::from(&json!({"a": [1, 2]})),
            PropertyValue::Json(r#"{"a":[1,2]}"#.into())
        );
    }

    #[test]
    fn title_prefers_title_then_location_then_date() {
        let mut rec = record_at(141.0, 43.0);
        assert_eq!(rec.title(), "2020-05");
        rec.properties
            .insert("location".into(), PropertyValue::String("南区".into()));
        assert_eq!(rec.title(), "南区");
        rec.properties
            .insert("title".into(), PropertyValue::String("藻岩山".into()));
        assert_eq!(rec.title(), "藻岩山");
    }

    #[test]
    fn bounds_cover_all_records() {
        let recs = [record_at(141.2, 43.1), record_at(141.4, 42.9), record_at(141.3, 43.0)];
        let b = Bounds::of(&recs).unwrap();
        assert_eq!(b.min, Coordinates { longitude: 141.2, latitude: 42.9 });
        assert_eq!(b.max, Coordinates { longitude: 141.4, latitude: 43.1 });
        assert!(Bounds::of(&[] as &[SightingRecord]).is_none());
    }
}
