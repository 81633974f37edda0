//! OCR backend abstraction.

use image::RgbImage;
use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

impl From<image::ImageError> for OcrError {
    fn from(e: image::ImageError) -> Self {
        OcrError::ImageError(e.to_string())
    }
}

/// Trait for OCR backends.
///
/// Backends are blocking; callers on the async runtime should run them on
/// the blocking pool.
pub trait OcrBackend: Send + Sync {
    /// Name used in user-facing error messages.
    fn display_name(&self) -> &str;

    /// Check if this backend can run (binaries installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Detect text lines in an image, in reading order.
    fn recognize(&self, image: &RgbImage) -> Result<Vec<String>, OcrError>;
}

/// Configuration for OCR backends.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OcrConfig {
    /// Language for OCR (e.g., "eng", "deu").
    #[serde(default = "default_language")]
    pub language: String,
    /// Bounded wait for a single OCR run, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OcrConfig {
    /// Apply the `OCR_LANGUAGE` and `OCR_TIMEOUT_SECS` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("OCR_LANGUAGE") {
            if !val.is_empty() {
                self.language = val;
            }
        }
        if let Ok(val) = std::env::var("OCR_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
