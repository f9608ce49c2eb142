use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::loader::DataSource;
use crate::data::normalize::{CategorySource, DateSource, NormalizerConfig};

// ---------------------------------------------------------------------------
// Command line / environment configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryKind {
    /// Icon file name (`bear.svg`, `footprint.svg`, ...)
    Icon,
    /// Status label
    Status,
    /// Free-text description, resolved by icon priority
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateKind {
    /// Numeric `year` and `month` properties
    Fields,
    /// A single `date` string property
    DateString,
}

#[derive(Debug, Parser)]
#[command(name = "bear-map", about = "Bear sighting map viewer")]
pub struct Cli {
    /// Base directory or URL; data is read from `<root>/data/bears.geojson`
    #[arg(long, env = "BEAR_MAP_ROOT_DIR", default_value = ".")]
    pub root_dir: String,

    /// Full path or URL of the GeoJSON file (overrides --root-dir)
    #[arg(long)]
    pub data: Option<String>,

    /// Which property carries the sighting category
    #[arg(long, value_enum, default_value_t = CategoryKind::Icon)]
    pub category_source: CategoryKind,

    /// Property key of the category field (defaults per source kind)
    #[arg(long)]
    pub category_key: Option<String>,

    /// How year and month are read
    #[arg(long, value_enum, default_value_t = DateKind::Fields)]
    pub date_source: DateKind,

    /// Drop features whose category is missing or unknown
    #[arg(long)]
    pub require_category: bool,

    /// TTF/OTF font added as a fallback (e.g. for Japanese text)
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl Cli {
    pub fn data_source(&self) -> DataSource {
        match &self.data {
            Some(location) => DataSource::parse(location),
            None => DataSource::under_root(&self.root_dir),
        }
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        let category_source = match self.category_source {
            CategoryKind::Icon => CategorySource::icon(),
            CategoryKind::Status => CategorySource::status(),
            CategoryKind::Description => CategorySource::description(),
        };
        let category_source = match &self.category_key {
            Some(key) => category_source.with_key(key.clone()),
            None => category_source,
        };
        let date_source = match self.date_source {
            DateKind::Fields => DateSource::fields(),
            DateKind::DateString => DateSource::date_string(),
        };

        NormalizerConfig {
            category_source,
            date_source,
            require_category: self.require_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["bear-map", "--root-dir", "/srv/map"]).unwrap();
        assert_eq!(
            cli.data_source(),
            DataSource::File(PathBuf::from("/srv/map/data/bears.geojson"))
        );
        assert_eq!(cli.normalizer_config(), NormalizerConfig::default());
        assert!(cli.font.is_none());
    }

    #[test]
    fn explicit_data_wins() {
        let cli = Cli::try_parse_from([
            "bear-map",
            "--root-dir",
            "/srv/map",
            "--data",
            "https://example.org/bears.geojson",
        ])
        .unwrap();
        assert_eq!(
            cli.data_source(),
            DataSource::Url("https://example.org/bears.geojson".into())
        );
    }

    #[test]
    fn status_variant_with_custom_key() {
        let cli = Cli::try_parse_from([
            "bear-map",
            "--category-source",
            "status",
            "--category-key",
            "状況",
            "--date-source",
            "date-string",
            "--require-category",
        ])
        .unwrap();
        let config = cli.normalizer_config();
        assert_eq!(
            config.category_source,
            CategorySource::Status { key: "状況".into() }
        );
        assert_eq!(config.date_source, DateSource::date_string());
        assert!(config.require_category);
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["bear-map", "--category-source", "emoji"]).is_err());
    }
}
