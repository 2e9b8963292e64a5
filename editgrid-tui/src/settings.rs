//! Demo settings stored as JSON in the config directory.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use thiserror::Error;

use editgrid_lib::viewport::DEFAULT_OVERSCAN;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

/// Row counts and runtime knobs for the demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows generated for the people section.
    pub people_rows: usize,
    /// Rows generated for the products section.
    pub product_rows: usize,
    /// Rows generated for the read-only catalog.
    pub catalog_rows: usize,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            people_rows: 5000,
            product_rows: 3000,
            catalog_rows: 10_000,
            overscan: DEFAULT_OVERSCAN,
            log_level: "debug".into(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Parsed log level.
    pub fn level_filter(&self) -> Result<LevelFilter, SettingsError> {
        self.log_level
            .parse()
            .map_err(|_| SettingsError::LogLevel(self.log_level.clone()))
    }
}
