use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};

/// Sapporo city centre (lon, lat).
const CENTER: (f64, f64) = (141.3545, 43.0621);

const ICONS: [&str; 7] = [
    "bear.svg",
    "like-bear.svg",
    "excrement.svg",
    "footprint.svg",
    "camera.svg",
    "voice.svg",
    "other.svg",
];

const WARDS: [&str; 5] = ["南区", "西区", "手稲区", "清田区", "豊平区"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Properties of a generated report.
#[derive(Serialize)]
struct Report<'a> {
    id: String,
    year: i64,
    month: i64,
    category: &'a str,
    location: &'a str,
    title: String,
}

fn point(lon: f64, lat: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": properties,
    })
}

/// A plausible report: sightings cluster south-west of the centre, in the
/// hills, and peak in summer.
fn sighting(rng: &mut SimpleRng, id: usize) -> Result<Value> {
    let lon = rng.gauss(CENTER.0 - 0.05, 0.06);
    let lat = rng.gauss(CENTER.1 - 0.04, 0.04);
    let year = 2017 + rng.below(9) as i64;
    let month = (rng.gauss(7.5, 2.0).round() as i64).clamp(1, 12);
    let icon = ICONS[rng.below(ICONS.len() as u64) as usize];
    let ward = WARDS[rng.below(WARDS.len() as u64) as usize];

    let report = Report {
        id: format!("S{id:05}"),
        year,
        month,
        category: icon,
        location: ward,
        title: format!("{ward} {year}/{month}"),
    };
    Ok(point(lon, lat, serde_json::to_value(report)?))
}

/// Features the viewer must silently drop.
fn malformed() -> Vec<Value> {
    vec![
        point(CENTER.0, CENTER.1, json!({"year": 2016, "month": 6, "category": "bear.svg"})),
        point(CENTER.0, CENTER.1, json!({"year": 2020, "category": "bear.svg"})),
        point(CENTER.0, CENTER.1, json!({"year": 2020, "month": 13})),
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[CENTER.0, CENTER.1], [CENTER.0 + 0.01, CENTER.1]],
            },
            "properties": {"year": 2020, "month": 6},
        }),
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [CENTER.0, CENTER.1] },
        }),
    ]
}

/// Valid reports followed by the malformed ones. Returns the collection and
/// the number of malformed features.
fn build_collection(rng: &mut SimpleRng, count: usize) -> Result<(Value, usize)> {
    let mut features = (0..count)
        .map(|id| sighting(rng, id))
        .collect::<Result<Vec<Value>>>()?;
    // One report with an unknown icon: kept, but uncategorized.
    features.push(point(
        CENTER.0 + 0.02,
        CENTER.1 - 0.08,
        json!({"year": 2021, "month": 9, "category": "deer.svg", "location": "南区"}),
    ));
    let rejected = malformed();
    let rejected_count = rejected.len();
    features.extend(rejected);

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    Ok((collection, rejected_count))
}

fn write_geojson(path: &Path, collection: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, collection).context("writing GeoJSON")?;
    writer.flush().context("writing GeoJSON")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/bears.geojson"));

    let mut rng = SimpleRng::new(42);
    let count = 400;
    let (collection, rejected_count) = build_collection(&mut rng, count)?;
    write_geojson(&output_path, &collection)?;

    println!(
        "Wrote {} features ({} valid, {rejected_count} malformed) to {}",
        count + 1 + rejected_count,
        count + 1,
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bear_map::data::normalize::NormalizerConfig;
    use bear_map::data::parser::parse_str;

    #[test]
    fn written_file_parses_back() {
        let mut rng = SimpleRng::new(7);
        let (collection, rejected) = build_collection(&mut rng, 50).unwrap();
        assert_eq!(rejected, 5);

        let dir = std::env::temp_dir().join(format!("bear-map-sample-{}", std::process::id()));
        let path = dir.join("data/bears.geojson");
        write_geojson(&path, &collection).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let records = parse_str(&text, &NormalizerConfig::default()).unwrap();
        assert_eq!(records.len(), 51);
        assert_eq!(records.iter().filter(|r| r.category.is_none()).count(), 1);
        assert!(records.iter().all(|r| (2017..=2025).contains(&r.year)));
    }
}
