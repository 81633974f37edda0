//! Model endpoint configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the chat model endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama API endpoint (default: http://localhost:11434)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Vision-capable model used for every method (default: llava)
    #[serde(default = "default_model")]
    pub model: String,
    /// Name used in error messages shown to the user
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Bounded wait for a single model call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Context window requested for OCR-derived text prompts
    #[serde(default = "default_ocr_num_ctx")]
    pub ocr_num_ctx: u32,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llava".to_string()
}

fn default_display_name() -> String {
    "LLaVA".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_ocr_num_ctx() -> u32 {
    2048
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            display_name: default_display_name(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            ocr_num_ctx: default_ocr_num_ctx(),
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENDPOINT`: API endpoint
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_TIMEOUT_SECS`: Per-call timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENDPOINT") {
            if !val.is_empty() {
                self.endpoint = val.trim_end_matches('/').to_string();
            }
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            if !val.is_empty() {
                self.model = val;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "llava");
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.ocr_num_ctx, 2048);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LlmConfig = toml::from_str("model = \"llava:13b\"").unwrap();
        assert_eq!(config.model, "llava:13b");
        assert_eq!(config.display_name, "LLaVA");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_builders() {
        let config = LlmConfig::default()
            .with_endpoint("http://gpu-box:11434/")
            .with_timeout_secs(5);
        assert_eq!(config.endpoint, "http://gpu-box:11434");
        assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
    }
}
