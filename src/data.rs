//! Metadata provisioning: keeps `<index_path>/<lang>/` in sync with the
//! resource host.
//!
//! Freshness is decided by a small version marker published next to the
//! index. The local copy at `<index_path>/info.json` maps each language code
//! to the marker value its files were last downloaded under, so languages are
//! refreshed independently.

use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::model::Language;

pub use crate::index::INDEX_FILES;

/// Marker file name, both at the resource root and at the cache root.
pub const VERSION_FILE: &str = "info.json";

/// Downloads one index file into `<index_path>/<lang>/<file>`.
///
/// Returns `Ok(false)` when the resource host could not serve the file or
/// served something that is not JSON; only local I/O failures are errors.
pub async fn download_index<T: Transport>(
    config: &Config,
    transport: &T,
    file: &str,
    language: Language,
) -> Result<bool> {
    let url = config.index_url(language, file);
    let Some(body) = transport.get(&url).await else {
        return Ok(false);
    };
    if let Err(err) = serde_json::from_slice::<IgnoredAny>(&body) {
        warn!(url, error = %err, "index file is not valid JSON, discarding it");
        return Ok(false);
    }

    let folder = config.language_dir(language);
    fs::create_dir_all(&folder).await?;
    fs::write(folder.join(file), &body).await?;
    info!(%language, file, "downloaded index file");
    Ok(true)
}

/// Fetches the remote version marker. `None` disables the staleness check
/// for this run (missing files are still downloaded).
pub async fn fetch_remote_marker<T: Transport>(config: &Config, transport: &T) -> Option<Value> {
    let url = format!("{}{}", config.res_url, VERSION_FILE);
    let Some(body) = transport.get(&url).await else {
        warn!(url, "version marker unavailable, only missing index files will be fetched");
        return None;
    };
    match serde_json::from_slice(&body) {
        Ok(marker) => Some(marker),
        Err(err) => {
            warn!(url, error = %err, "version marker is not valid JSON, ignoring it");
            None
        }
    }
}

pub fn marker_path(config: &Config) -> PathBuf {
    config.index_path.join(VERSION_FILE)
}

/// Marker values recorded per language; empty when nothing was recorded yet.
pub async fn read_local_markers(config: &Config) -> Map<String, Value> {
    let path = marker_path(config);
    let Ok(content) = fs::read(&path).await else {
        return Map::new();
    };
    match serde_json::from_slice::<Value>(&content) {
        Ok(Value::Object(markers)) => markers,
        _ => {
            warn!(path = %path.display(), "local version marker is malformed, treating index as outdated");
            Map::new()
        }
    }
}

async fn write_local_markers(config: &Config, markers: &Map<String, Value>) -> Result<()> {
    fs::create_dir_all(&config.index_path).await?;
    let content = serde_json::to_vec_pretty(markers)?;
    fs::write(marker_path(config), content).await?;
    Ok(())
}

/// Outcome of [`ensure_language`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Refresh {
    pub downloaded: usize,
    /// Remote marker the language was refreshed to. Pass it to
    /// [`record_marker`] once the new files have loaded.
    pub marker: Option<Value>,
}

/// Makes sure every file of [`INDEX_FILES`] for `language` is present and,
/// when `remote_marker` is known, matches it.
///
/// A stale language has all of its files downloaded again; otherwise only
/// missing files are. The local marker is left untouched, so a set that
/// fails to load is downloaded again on the next call.
pub async fn ensure_language<T: Transport>(
    config: &Config,
    transport: &T,
    language: Language,
    remote_marker: Option<&Value>,
) -> Result<Refresh> {
    let markers = read_local_markers(config).await;
    let stale = remote_marker.is_some_and(|remote| markers.get(language.code()) != Some(remote));
    if stale {
        debug!(%language, "index version differs from remote");
    }

    let folder = config.language_dir(language);
    let mut downloaded = 0;
    for file in INDEX_FILES {
        if !stale && fs::try_exists(folder.join(file)).await.unwrap_or(false) {
            continue;
        }
        if !download_index(config, transport, file, language).await? {
            return Err(Error::IndexDownload {
                file: file.to_string(),
                language,
            });
        }
        downloaded += 1;
    }

    Ok(Refresh {
        downloaded,
        marker: remote_marker.filter(|_| stale).cloned(),
    })
}

/// Records `marker` as the version `language` is now current with.
pub async fn record_marker(config: &Config, language: Language, marker: Value) -> Result<()> {
    let mut markers = read_local_markers(config).await;
    markers.insert(language.code().to_string(), marker);
    write_local_markers(config, &markers).await?;
    info!(%language, "index updated to remote version");
    Ok(())
}
