//! Configuration for the Pipeline

use auditor_llm::gemini::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Maximum characters of extracted document text sent in one prompt
    pub max_input_chars: usize,

    /// Maximum time for a single LLM call (seconds)
    pub llm_timeout_secs: u64,
}

impl PipelineConfig {
    /// Get the LLM timeout as a Duration
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_input_chars == 0 {
            return Err("max_input_chars must be greater than 0".to_string());
        }
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    /// Default configuration sized for large SPs and several lists
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_input_chars: 1_000_000,
            llm_timeout_secs: 300,
        }
    }
}

impl PipelineConfig {
    /// Fast preset: smaller inputs, shorter timeout
    pub fn fast() -> Self {
        Self {
            max_input_chars: 200_000,
            llm_timeout_secs: 120,
            ..Self::default()
        }
    }

    /// Thorough preset: larger inputs, longer timeout
    pub fn thorough() -> Self {
        Self {
            max_input_chars: 3_000_000,
            llm_timeout_secs: 900,
            ..Self::default()
        }
    }

    /// Look up a preset by name (`default`, `fast`, `thorough`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "fast" => Some(Self::fast()),
            "thorough" => Some(Self::thorough()),
            _ => None,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
