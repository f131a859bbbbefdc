//! Application settings persistence for Popnotes.
//!
//! Stores the store descriptor, data directory, popup geometry and log level
//! in a JSON file at an OS-appropriate location.

use log::LevelFilter;
use popnotes_core::{PopupLayout, StoreDescriptor, DEFAULT_DESCRIPTOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Connection string both windows open, e.g. `sqlite:notes.db`.
    pub store_descriptor: String,
    /// Directory relative descriptors are resolved against.
    pub data_directory: String,
    pub popup: PopupLayout,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            store_descriptor: DEFAULT_DESCRIPTOR.to_string(),
            data_directory: default_data_directory().to_string_lossy().to_string(),
            popup: PopupLayout::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// The configured descriptor, or the default one if it does not parse.
    pub fn descriptor(&self) -> StoreDescriptor {
        StoreDescriptor::parse(&self.store_descriptor).unwrap_or_else(|e| {
            log::warn!("ignoring store descriptor from settings: {e}");
            StoreDescriptor::default()
        })
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/popnotes/settings.json`
/// - Windows: `%APPDATA%/Popnotes/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Popnotes").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("popnotes").join("settings.json")
    }
}

/// Returns the default data directory, e.g. `~/.local/share/popnotes`.
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("popnotes")
}

/// Loads settings from disk; returns defaults if the file is missing or corrupt.
pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_file_path())
}

pub fn load_settings_from(path: &Path) -> AppSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => AppSettings::default(),
    }
}

/// Saves settings to disk, creating parent directories as needed.
pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    save_settings_to(&settings_file_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {e}"))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write settings: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings_from(&temp.path().join("settings.json"));
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.descriptor().as_str(), "sqlite:notes.db");
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), AppSettings::default());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("settings.json");
        let settings = AppSettings {
            store_descriptor: "sqlite:other.db".to_string(),
            log_level: "debug".to_string(),
            ..AppSettings::default()
        };

        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);

        assert_eq!(loaded, settings);
        assert_eq!(loaded.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "popup": { "width": 500.0, "height": 300.0, "gap": 8.0 } }"#)
            .unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.popup.width, 500.0);
        assert_eq!(settings.store_descriptor, DEFAULT_DESCRIPTOR);
    }

    #[test]
    fn bad_values_fall_back() {
        let settings = AppSettings {
            store_descriptor: "mysql://nope".to_string(),
            log_level: "loud".to_string(),
            ..AppSettings::default()
        };
        assert_eq!(settings.descriptor(), StoreDescriptor::default());
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }
}
