//! Configuration loading.
//!
//! Settings come from built-in defaults, then an optional TOML file
//! (`--config`, or an `ernorm` config file discovered by `prefer` in the
//! standard locations), then environment variables (a `.env` file is loaded
//! by `main`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm::LlmConfig;
use crate::ocr::OcrConfig;

/// Name under which config files are discovered.
pub const APP_NAME: &str = "ernorm";

/// Suggested file name for a saved configuration.
pub const DEFAULT_CONFIG_FILE: &str = "ernorm.toml";

/// Default bind address for the web interface.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Default upload size limit (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Address the web server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Model endpoint.
    #[serde(default)]
    pub llm: LlmConfig,
    /// OCR engine.
    #[serde(default)]
    pub ocr: OcrConfig,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            llm: LlmConfig::default(),
            ocr: OcrConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars (in addition to the `LLM_*` and `OCR_*` ones):
    /// - `ERNORM_BIND`: listen address
    /// - `ERNORM_MAX_UPLOAD_BYTES`: upload size limit
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("ERNORM_BIND") {
            if !val.is_empty() {
                self.bind = val;
            }
        }
        if let Ok(val) = std::env::var("ERNORM_MAX_UPLOAD_BYTES") {
            if let Ok(n) = val.parse() {
                self.max_upload_bytes = n;
            }
        }
        self.llm = self.llm.with_env_overrides();
        self.ocr = self.ocr.with_env_overrides();
        self
    }

    /// Render as TOML for `ernorm config`.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Options controlling where settings are loaded from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; must exist when given.
    pub config_path: Option<PathBuf>,
    /// Skip environment overrides (used by tests).
    pub ignore_env: bool,
}

/// Find a config file for `app` in the standard locations.
pub async fn discover_config(app: &str) -> Option<PathBuf> {
    match prefer::load(app).await {
        Ok(found) => found.source_path().map(|path| path.to_path_buf()),
        Err(_) => None,
    }
}

/// Load settings from file and environment.
pub async fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let path = match &options.config_path {
        Some(path) => Some(path.clone()),
        None => discover_config(APP_NAME).await,
    };
    let settings = match path {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            Settings::from_file(&path)?
        }
        None => Settings::default(),
    };

    if options.ignore_env {
        Ok(settings)
    } else {
        Ok(settings.with_env_overrides())
    }
}
