//! Durable key/value backends for persisted selections.
//!
//! Values are strings keyed by short logical names, matching a browser's
//! local storage. `FileStore` keeps them in one JSON object file and rewrites
//! it on every `set`; `MemoryStore` is the session-only fallback and the
//! test double.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const THEME_KEY: &str = "nav_theme";
pub const FAVORITES_KEY: &str = "nav_favorites";
pub const CATEGORY_KEY: &str = "nav_category";
pub const FAVORITES_ONLY_KEY: &str = "nav_fav_only";

/// File name used by `FileStore` inside its state directory.
pub const STATE_FILE_NAME: &str = "state.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("storage backend is unavailable")]
    Unavailable,
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-process map. `unavailable()` builds one that rejects every call.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            values: BTreeMap::new(),
            available: false,
        }
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            available: true,
        }
    }

}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object file of string values under a state directory.
///
/// Reads go to disk each time so an external edit is seen on the next
/// lookup. Writes go through a temp file in the same directory and are
/// renamed into place, so a crash never leaves a half-written file. A file
/// that is not a JSON object is moved to `state.json.corrupt` on the next
/// write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILE_NAME)
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        let path = self.path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        if data.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Corrupt {
                path,
                reason: "expected a JSON object".to_string(),
            }),
            Err(err) => Err(StoreError::Corrupt {
                path,
                reason: err.to_string(),
            }),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let path = self.path();
        let io_err = |source: io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        let body = serde_json::to_string_pretty(map).map_err(|err| StoreError::Corrupt {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        tmp.write_all(body.as_bytes()).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.persist(&path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.read_all()?;
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            // Non-string entries are handed to the per-key decoder as text.
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = match self.read_all() {
            Ok(map) => map,
            Err(StoreError::Corrupt { path, reason }) => {
                let aside = path.with_extension("json.corrupt");
                tracing::warn!(
                    path = %path.display(),
                    %reason,
                    "state file is corrupt; moving it aside and starting fresh"
                );
                fs::rename(&path, &aside).map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })?;
                Map::new()
            }
            Err(err) => return Err(err),
        };
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&map)
    }
}
