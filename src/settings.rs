//! Decoder settings persistence.
//!
//! This module handles loading and saving decoder options across runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::OutputFormat;
use crate::parsers::{AlignmentMode, RecordLayout};

/// Decoder settings that persist across runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecoderSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Record layout of the instrument
    #[serde(default)]
    pub layout: RecordLayout,
    /// How the alignment scan picks the first record
    #[serde(default)]
    pub alignment: AlignmentMode,
    /// Default output format
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_version() -> u32 {
    1
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            version: 1,
            layout: RecordLayout::default(),
            alignment: AlignmentMode::default(),
            output: OutputFormat::default(),
        }
    }
}

impl DecoderSettings {
    /// Get the config directory path for radlog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("radlog"))
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir().map(|p| p.join("radlog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file. A missing file yields defaults;
    /// an unreadable or malformed one is logged and yields defaults too.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        self.save_to(&path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }
}
