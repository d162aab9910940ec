//! Persistent key-value store for credentials and identifiers.
//!
//! Values live in a flat JSON object at `~/.flavorlinetool/data.json`.
//! An unreadable or corrupt file reads as empty.

use crate::error::AppError;
use serde_json::{Map, Value};
#[cfg(test)]
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;
use tracing::{debug, warn};

/// Directory under the home directory holding all local data.
pub const DATA_DIR: &str = ".flavorlinetool";

/// Known settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    ApiKey,
    FlavorId,
    HackatimeKey,
    HackatimeUsername,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::ApiKey,
        SettingKey::FlavorId,
        SettingKey::HackatimeKey,
        SettingKey::HackatimeUsername,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::ApiKey => "api_key",
            SettingKey::FlavorId => "flavor_id",
            SettingKey::HackatimeKey => "hackatime_key",
            SettingKey::HackatimeUsername => "hackatime_username",
        }
    }

    /// Whether the value is a secret that must not be echoed.
    pub fn is_secret(&self) -> bool {
        matches!(self, SettingKey::ApiKey | SettingKey::HackatimeKey)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-valued settings storage.
pub trait ConfigStore: Send + Sync {
    /// Returns the value, or `None` if unset or empty.
    fn get(&self, key: SettingKey) -> Option<String>;

    fn set(&self, key: SettingKey, value: &str) -> Result<(), AppError>;

    /// Returns the value or a configuration error carrying `hint`.
    fn require(&self, key: SettingKey, hint: &str) -> Result<String, AppError> {
        self.get(key).ok_or_else(|| AppError::missing(key.as_str(), hint))
    }
}

/// JSON file backed store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.flavorlinetool/data.json`.
    pub fn open_default() -> Result<Self, AppError> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Store("Cannot determine home directory".to_string()))?;
        Ok(Self::new(home.join(DATA_DIR).join("data.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Map<String, Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No data file at {}: {}", self.path.display(), e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Ignoring unreadable data file: {}", self.path.display());
                Map::new()
            }
        }
    }

    fn save(&self, data: &Map<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Store(format!("{}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::Store(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| AppError::Store(format!("{}: {}", self.path.display(), e)))
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.load()
            .get(key.as_str())
            .and_then(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    }

    fn set(&self, key: SettingKey, value: &str) -> Result<(), AppError> {
        let mut data = self.load();
        data.insert(key.as_str().to_string(), Value::String(value.to_string()));
        self.save(&data)?;
        debug!("Saved {} to {}", key, self.path.display());
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<SettingKey, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(values: &[(SettingKey, &str)]) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.values.lock() {
            for (key, value) in values {
                map.insert(*key, value.to_string());
            }
        }
        store
    }
}

#[cfg(test)]
impl ConfigStore for MemoryStore {
    fn get(&self, key: SettingKey) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|map| map.get(&key).cloned())
            .filter(|s| !s.is_empty())
    }

    fn set(&self, key: SettingKey, value: &str) -> Result<(), AppError> {
        self.values
            .lock()
            .map_err(|_| AppError::Store("store lock poisoned".to_string()))?
            .insert(key, value.to_string());
        Ok(())
    }
}
