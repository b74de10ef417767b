//! Application settings loading from config.toml
//!
//! Search tuning (debounce window, result cap) and the product catalog used
//! to seed the database on first run both live in `config.toml`. The file is
//! optional; a missing file means defaults and an empty catalog.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Search pipeline tuning
    pub search: SearchSettings,
    /// Products to seed the database with on first run
    pub catalog: Vec<CatalogProduct>,
}

/// Tuning for the debounced search pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period between the last keystroke and the query, in milliseconds
    pub debounce_ms: u64,
    /// Maximum number of hits a one-shot search returns
    pub limit: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            limit: 5,
        }
    }
}

impl SearchSettings {
    /// The debounce window as a [`Duration`]
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// One product entry under `[[catalog]]`
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogProduct {
    /// Product name; seeding skips names already present
    pub name: String,
    /// Longer description shown in catalogs
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Category storage string (e.g. `"textile"`, `"service"`)
    pub category: String,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Storage {
        message: format!("failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Validation {
        message: format!("failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults when the file does not exist.
///
/// # Errors
/// Returns an error only when the file exists but cannot be read or parsed.
pub fn load_default_settings() -> Result<Settings> {
    if Path::new("config.toml").exists() {
        load_settings("config.toml")
    } else {
        debug!("config.toml not found, using default settings");
        Ok(Settings::default())
    }
}
