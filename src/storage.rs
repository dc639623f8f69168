use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

/// Key/value persistence for named JSON blobs.
///
/// Every configuration surface in the crate goes through this trait so tests
/// can swap in [`MemoryStorage`] and a browser host can plug in whatever
/// storage it has.
pub trait Storage: Send + Sync {
    /// Raw blob for `key`, or `None` when nothing was stored.
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Deserialize the blob under `key`, falling back to `T::default()` when the
/// blob is missing or malformed. Malformed data is logged and discarded,
/// never surfaced as an error.
pub fn load_json<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    let Some(raw) = storage.read(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("malformed blob `{key}`: {e}; using default");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    storage.write(key, &json)
}

/// One pretty-printed JSON file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data directory, e.g. `~/.local/share/quick_tab` on Linux.
    pub fn default_dir() -> PathBuf {
        dirs_next::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("quick_tab")
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        let content = std::fs::read_to_string(self.path(key)).unwrap_or_default();
        if content.is_empty() {
            None
        } else {
            Some(content)
        }
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// In-memory storage for tests and hosts without a filesystem.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.blobs.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}
