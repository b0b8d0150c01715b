use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, SlideCraftError};
use crate::llm::Provider;

pub const API_KEY_PREF: &str = "slidecraft_api_key";
pub const PROVIDER_PREF: &str = "slidecraft_provider";

/// String key/value storage that outlives a session.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The two values remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedPreferences {
    pub credential: String,
    pub provider: Provider,
}

impl SavedPreferences {
    /// Read both keys, falling back to an empty credential and the default
    /// provider when a key is missing or unreadable.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let credential = read_or_default(store, API_KEY_PREF).unwrap_or_default();

        let provider = match read_or_default(store, PROVIDER_PREF) {
            Some(tag) => tag.parse::<Provider>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring saved provider '{}': {}", tag, e);
                Provider::default()
            }),
            None => Provider::default(),
        };

        Self {
            credential,
            provider,
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<()> {
        store.set(API_KEY_PREF, &self.credential)?;
        store.set(PROVIDER_PREF, self.provider.tag())
    }
}

fn read_or_default(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to read preference {}: {}", key, e);
            None
        }
    }
}

/// Preferences kept in a JSON object on disk.
///
/// Every `get` reads the file again, so edits made by another process are
/// picked up on the next load. `set` rewrites the whole file.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePreferences {
    /// Open the store, failing early if an existing file is not valid JSON.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        read_values(&path)?;

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content).map_err(|e| {
        SlideCraftError::Preferences(format!(
            "Invalid preferences file {}: {e}",
            path.display()
        ))
    })
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(read_values(&self.path)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = read_values(&self.path)?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

/// Process-local preferences, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
