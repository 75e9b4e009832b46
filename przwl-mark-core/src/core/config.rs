//! Static configuration for the resolver, recorder, and controller.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FOLDER_TITLE: &str = "przwl-mark";

/// Settings threaded into the components at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkConfig {
    /// Title of the canonical folder, used for lookup and creation.
    pub folder_title: String,
    /// Parent for a freshly created canonical folder.
    pub default_parent_id: String,
    /// Maximum length of the recency list.
    pub recent_limit: usize,
    /// Title shown on user notifications.
    pub notification_title: String,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            folder_title: DEFAULT_FOLDER_TITLE.to_string(),
            default_parent_id: "1".to_string(),
            recent_limit: 10,
            notification_title: DEFAULT_FOLDER_TITLE.to_string(),
        }
    }
}

impl MarkConfig {
    /// Loads a config file; returns defaults if the file is missing or corrupt.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves the config, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
