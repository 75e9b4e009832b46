//! Key-value preference storage and the typed preferences read from it.
//!
//! The controller holds two [`KeyValueStore`] scopes: a synced one for
//! [`Preferences`] and a device-local one for the recency list.
//! [`JsonFileStore`] keeps a scope as a single JSON object on disk.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which the canonical folder ID is persisted.
pub const FOLDER_ID_KEY: &str = "bookmarkFolderId";
pub const DARK_MODE_KEY: &str = "darkMode";
pub const READ_LATER_KEY: &str = "readLater";

/// A JSON object keyed by preference name.
pub type ValueMap = Map<String, Value>;

/// Minimal get/set access to a persistent key-value scope.
pub trait KeyValueStore {
    /// Returns the stored values for `keys`; missing keys are simply absent.
    fn get(&self, keys: &[&str]) -> Result<ValueMap>;

    /// Merges `values` into the scope, overwriting existing keys.
    fn set(&mut self, values: ValueMap) -> Result<()>;
}

/// A [`KeyValueStore`] persisted as one pretty-printed JSON object.
///
/// A missing file reads as an empty scope; the file and its parent
/// directories are created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<ValueMap> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(ValueMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ValueMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, keys: &[&str]) -> Result<ValueMap> {
        let mut all = self.load_all()?;
        Ok(keys
            .iter()
            .filter_map(|key| all.remove(*key).map(|value| (key.to_string(), value)))
            .collect())
    }

    fn set(&mut self, values: ValueMap) -> Result<()> {
        let mut all = self.load_all()?;
        all.extend(values);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

/// User preferences kept in the synced scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub bookmark_folder_id: Option<String>,
    pub dark_mode: bool,
    pub read_later: bool,
}

impl Preferences {
    /// Reads the recognised keys, defaulting anything absent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarkError::Json`] if a stored value has the wrong type.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let values = store.get(&[FOLDER_ID_KEY, DARK_MODE_KEY, READ_LATER_KEY])?;
        Ok(serde_json::from_value(Value::Object(values))?)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

pub fn store_folder_id(store: &mut dyn KeyValueStore, folder_id: &str) -> Result<()> {
    store_value(store, FOLDER_ID_KEY, Value::from(folder_id))
}

pub fn store_dark_mode(store: &mut dyn KeyValueStore, enabled: bool) -> Result<()> {
    store_value(store, DARK_MODE_KEY, Value::Bool(enabled))
}

pub fn store_read_later(store: &mut dyn KeyValueStore, enabled: bool) -> Result<()> {
    store_value(store, READ_LATER_KEY, Value::Bool(enabled))
}

fn store_value(store: &mut dyn KeyValueStore, key: &str, value: Value) -> Result<()> {
    let mut values = ValueMap::new();
    values.insert(key.to_string(), value);
    store.set(values)
}

/// Popup colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Caption for the button that switches away from this theme.
    #[must_use]
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }
}
