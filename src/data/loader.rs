use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::SightingRecord;
use super::normalize::NormalizerConfig;
use super::parser::parse_feature_collection;

/// Path of the data file below the configured root.
pub const DATA_FILE: &str = "data/bears.geojson";

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the GeoJSON document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// Interpret `location` as a URL when it has an http(s) scheme, otherwise
    /// as a filesystem path.
    pub fn parse(location: &str) -> Self {
        if is_http(location) {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// The data file below a root directory or base URL.
    pub fn under_root(root: &str) -> Self {
        if is_http(root) {
            DataSource::Url(format!("{}/{DATA_FILE}", root.trim_end_matches('/')))
        } else {
            DataSource::File(Path::new(root).join(DATA_FILE))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch and parse the sighting collection. Dispatch by source kind.
pub fn load(source: &DataSource, config: &NormalizerConfig) -> Result<Vec<SightingRecord>> {
    let root = match source {
        DataSource::Url(url) => fetch_json(url)?,
        DataSource::File(path) => read_json(path)?,
    };
    let records = parse_feature_collection(&root, config)?;
    Ok(records)
}

/// One unauthenticated GET. Any non-2xx status is an error.
fn fetch_json(url: &str) -> Result<JsonValue> {
    let response = reqwest::blocking::get(url).with_context(|| format!("requesting {url}"))?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {}", status.as_u16());
    }
    response.json().context("parsing JSON")
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).context("parsing JSON")
}

// ---------------------------------------------------------------------------
// Background load
// ---------------------------------------------------------------------------

/// A load running on its own thread. Dropping it abandons the load: the
/// worker's result is discarded.
pub struct PendingLoad {
    source: DataSource,
    rx: Receiver<Result<Vec<SightingRecord>>>,
}

impl PendingLoad {
    /// Start loading `source`. `notify` runs on the worker once a result is
    /// available (used to wake the UI).
    pub fn spawn(
        source: DataSource,
        config: NormalizerConfig,
        notify: impl FnOnce() + Send + 'static,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker_source = source.clone();
        thread::Builder::new()
            .name("sighting-loader".to_string())
            .spawn(move || {
                let result = load(&worker_source, &config);
                if tx.send(result).is_err() {
                    log::debug!("Discarding result for {worker_source}: load was cancelled");
                    return;
                }
                notify();
            })
            .context("spawning loader thread")?;

        Ok(Self { source, rx })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// The result, once the worker has finished.
    pub fn try_take(&self) -> Option<Result<Vec<SightingRecord>>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("loader for {} exited without a result", self.source)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{RecvTimeoutError, Sender};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::data::parser::FormatError;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bear-map-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn wait(pending: &PendingLoad) -> Result<Vec<SightingRecord>> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = pending.try_take() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Loopback server answering one request once `release` fires. Returns
    /// the data URL, the release handle and a receiver that fires when the
    /// request has arrived.
    fn one_shot_server(status: &'static str, body: &'static str) -> (String, Sender<()>, Receiver<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/{DATA_FILE}", listener.local_addr().unwrap());
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (arrived_tx, arrived_rx) = mpsc::channel();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = arrived_tx.send(());
            let _ = release_rx.recv();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/geo+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });
        (url, release_tx, arrived_rx)
    }

    const COLLECTION: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Point","coordinates":[141.35,43.06]},"properties":{"year":2022,"month":7}},
        {"type":"Feature","geometry":{"type":"Point","coordinates":[141.36,43.07]},"properties":{"year":2031,"month":7}}
    ]}"#;

    #[test]
    fn source_resolution() {
        assert_eq!(
            DataSource::under_root("https://example.org/bears/"),
            DataSource::Url("https://example.org/bears/data/bears.geojson".into())
        );
        assert_eq!(
            DataSource::under_root("/srv/map"),
            DataSource::File(PathBuf::from("/srv/map/data/bears.geojson"))
        );
        assert_eq!(
            DataSource::parse("http://localhost:8000/x.geojson"),
            DataSource::Url("http://localhost:8000/x.geojson".into())
        );
        assert_eq!(
            DataSource::parse("local.geojson"),
            DataSource::File(PathBuf::from("local.geojson"))
        );
    }

    #[test]
    fn loads_file() {
        let path = temp_file("ok.geojson", COLLECTION);
        let records = load(&DataSource::File(path), &NormalizerConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_error() {
        let path = std::env::temp_dir().join("bear-map-does-not-exist.geojson");
        assert!(load(&DataSource::File(path), &NormalizerConfig::default()).is_err());
    }

    #[test]
    fn wrong_document_type_is_format_error() {
        let path = temp_file("feature.geojson", r#"{"type":"Feature"}"#);
        let err = load(&DataSource::File(path), &NormalizerConfig::default()).unwrap_err();
        assert!(err.downcast_ref::<FormatError>().is_some());
    }

    #[test]
    fn invalid_json_is_error() {
        let path = temp_file("broken.geojson", "{ not json");
        let err = load(&DataSource::File(path), &NormalizerConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing JSON"));
    }

    #[test]
    fn background_load_delivers_and_notifies() {
        let path = temp_file("bg.geojson", COLLECTION);
        let (notify_tx, notify_rx) = mpsc::channel();
        let pending = PendingLoad::spawn(
            DataSource::File(path),
            NormalizerConfig::default(),
            move || {
                let _ = notify_tx.send(());
            },
        )
        .unwrap();
        let records = wait(&pending).unwrap();
        assert_eq!(records.len(), 1);
        assert!(notify_rx.recv_timeout(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn non_success_status_is_error() {
        let (url, release, _arrived) = one_shot_server("404 Not Found", "");
        release.send(()).unwrap();
        let err = load(&DataSource::Url(url), &NormalizerConfig::default()).unwrap_err();
        assert_eq!(format!("{err:#}"), "HTTP 404");
    }

    #[test]
    fn http_load_parses_body() {
        let (url, release, _arrived) = one_shot_server("200 OK", COLLECTION);
        release.send(()).unwrap();
        let records = load(&DataSource::Url(url), &NormalizerConfig::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn dropped_load_is_discarded_without_notify() {
        let (url, release, arrived) = one_shot_server("200 OK", COLLECTION);
        let (notify_tx, notify_rx) = mpsc::channel();
        let pending = PendingLoad::spawn(
            DataSource::Url(url),
            NormalizerConfig::default(),
            move || {
                let _ = notify_tx.send(());
            },
        )
        .unwrap();
        arrived.recv_timeout(Duration::from_secs(10)).unwrap();
        drop(pending);
        release.send(()).unwrap();

        // The worker drops `notify` unused once it finds the channel closed.
        assert_eq!(
            notify_rx.recv_timeout(Duration::from_secs(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
