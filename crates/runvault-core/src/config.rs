//! Where the vault lives on disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Paths used by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Store root holding one directory per category.
    pub root: PathBuf,
    /// Settings document updated on save.
    pub settings_path: PathBuf,
    /// Mode table loaded by [`crate::TableModeParser::from_json_file`].
    pub modes_path: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        let root = std::env::var("RUNVAULT_ROOT").unwrap_or_else(|_| "saves".to_string());
        let root = PathBuf::from(root);
        VaultConfig {
            settings_path: std::env::var("RUNVAULT_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| root.join("settings.json")),
            modes_path: std::env::var("RUNVAULT_MODES")
                .map(PathBuf::from)
                .unwrap_or_else(|_| root.join("modes.json")),
            root,
        }
    }
}

impl VaultConfig {
    /// Config from `RUNVAULT_ROOT`, `RUNVAULT_SETTINGS` and `RUNVAULT_MODES`.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Config rooted at `root`, with the settings and mode files inside it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        VaultConfig {
            settings_path: root.join("settings.json"),
            modes_path: root.join("modes.json"),
            root,
        }
    }

    pub fn with_settings(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    pub fn with_modes(mut self, path: impl Into<PathBuf>) -> Self {
        self.modes_path = path.into();
        self
    }
}
