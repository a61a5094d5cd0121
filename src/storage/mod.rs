//! Storage Module
//!
//! Key-value persistence shared by the settings and the leaderboard. Values
//! are JSON; a store is either in memory or a single JSON file on disk.

pub mod leaderboard;
pub mod settings;

pub use leaderboard::{Leaderboard, ScoreEntry};
pub use settings::{GraphicsQuality, Settings};

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Failed persistence write
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store i/o failed: {e}"),
            StoreError::Json(e) => write!(f, "store encoding failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Persisted string-keyed values
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Write several values as one update
    fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store, used in tests and when no data directory is available
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        self.values.extend(entries);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// One JSON object on disk, rewritten whole on every write
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values: BTreeMap<String, Value> = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Replace the file atomically via a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<(), StoreError> {
        self.values.extend(entries);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Fresh path under the system temp dir
    fn temp_store_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir()
            .join(format!("hovercraft-{}-{}-{}", name, std::process::id(), nanos))
            .join("store.json")
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("a", json!(1)).unwrap();
        store
            .set_many(vec![("b".to_string(), json!("two")), ("a".to_string(), json!(3))])
            .unwrap();
        assert_eq!(store.get("a"), Some(json!(3)));
        assert_eq!(store.get("b"), Some(json!("two")));
        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let path = temp_store_path("reopen");
        {
            let mut store = JsonFileStore::open(&path);
            assert_eq!(store.get("volume"), None);
            store.set("volume", json!(0.25)).unwrap();
            store.set("name", json!("Ada")).unwrap();
        }

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("volume"), Some(json!(0.25)));
        assert_eq!(store.get("name"), Some(json!("Ada")));

        store.remove("name").unwrap();
        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("name"), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let path = temp_store_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything"), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
