//! Application configuration
//!
//! Loaded from a JSON file; every section falls back to defaults so a
//! partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gesture::GestureConfig;
use crate::recorder::RecorderConfig;
use crate::utils::{AppError, AppResult};

pub const DEFAULT_LOG_FILTER: &str = "gesture_recorder=debug";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub recorder: RecorderConfig,

    /// Directory finished recordings are written to
    pub output_dir: PathBuf,

    /// Tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            recorder: RecorderConfig::default(),
            output_dir: PathBuf::from("recordings"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.recorder.extension.trim().is_empty() {
            return Err(AppError::Config("recorder.extension must not be empty".into()));
        }
        if self.recorder.default_filename.trim().is_empty() {
            return Err(AppError::Config(
                "recorder.defaultFilename must not be empty".into(),
            ));
        }
        Ok(())
    }
}
