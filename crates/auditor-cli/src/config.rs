//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use auditor_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Directory that receives exported reports
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Report, table and chart
    Table,
    /// JSON format
    Json,
    /// Report text only
    Quiet,
}

impl Config {
    /// Directory holding the config file and REPL history.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".auditor"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default path or return defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or return defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.pipeline.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Replace the pipeline settings with a named preset, keeping the model.
    pub fn apply_preset(&mut self, name: &str) -> Result<()> {
        let preset = PipelineConfig::preset(name)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown preset '{}' (default, fast, thorough)", name)))?;
        self.pipeline = PipelineConfig {
            model: std::mem::take(&mut self.pipeline.model),
            ..preset
        };
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            export_dir: default_export_dir(),
            history_size: 1000,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_history_size() -> usize {
    1000
}
