//! Preferred-city store.
//!
//! A single JSON object on disk. Reads never fail: a missing, unreadable or
//! malformed file is treated as empty. Writes go to `<path>.tmp` first and
//! are renamed into place.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use puch_core::error::{PuchError, Result};

const PREFERRED_CITY: &str = "preferred_city";

/// JSON-file preference store.
pub struct PrefsStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl PrefsStore {
    /// Creates a store backed by `path`. Nothing is read until first use.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Reads the whole preference object.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Map<String, Value> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Failed to read preferences");
                return Map::new();
            }
        };

        match serde_json::from_slice::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = ?self.path, "Preferences file is not a JSON object");
                Map::new()
            }
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Preferences file is corrupt");
                Map::new()
            }
        }
    }

    /// Replaces the preference object on disk.
    ///
    /// On failure the temp file is removed and the previous file is intact.
    #[instrument(skip(self, prefs))]
    pub async fn save(&self, prefs: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(prefs)?;

        let temp_path = self.temp_path();
        if let Err(e) = self.replace_with(&temp_path, &contents).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %cleanup, path = ?temp_path, "Failed to remove temp file");
                }
            }
            return Err(e.into());
        }

        debug!(path = ?self.path, "Preferences saved");
        Ok(())
    }

    async fn replace_with(&self, temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(temp_path, &self.path).await
    }

    /// Returns the saved preferred city, if any.
    pub async fn preferred_city(&self) -> Option<String> {
        self.load()
            .await
            .get(PREFERRED_CITY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string)
    }

    /// Saves `city` (trimmed) as the preferred city and returns what was
    /// stored. Other keys in the file are preserved.
    pub async fn set_preferred_city(&self, city: &str) -> Result<String> {
        let city = city.trim();
        if city.is_empty() {
            return Err(PuchError::Validation("Please provide a city.".into()));
        }

        let _guard = self.write_lock.lock().await;
        let mut prefs = self.load().await;
        prefs.insert(PREFERRED_CITY.into(), Value::String(city.to_string()));
        self.save(&prefs).await?;
        Ok(city.to_string())
    }
}
