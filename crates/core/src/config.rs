use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hybrid::HybridOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_duration() -> u32 {
    5
}

fn default_fps() -> u32 {
    60
}

fn default_extensions() -> Vec<String> {
    vec!["milk".to_string(), "json".to_string()]
}

fn default_output() -> String {
    "hybrid_report.jsonld".to_string()
}

/// Serializable scan configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides. CLI flags take precedence over file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub enable_dynamic: bool,
    /// Render duration in seconds.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// File extensions picked up when scanning a directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Path of the EARL report.
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub score_quality: bool,
    /// Include per-error entries in the EARL report.
    #[serde(default)]
    pub include_details: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enable_dynamic: false,
            duration: default_duration(),
            fps: default_fps(),
            extensions: default_extensions(),
            output: default_output(),
            score_quality: false,
            include_details: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_dynamic && self.fps == 0 {
            return Err(ConfigError::Invalid(
                "fps must be positive when dynamic scanning is enabled".into(),
            ));
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::Invalid("output path is required".into()));
        }
        Ok(())
    }

    pub fn hybrid_options(&self) -> HybridOptions {
        HybridOptions { enable_dynamic: self.enable_dynamic, duration: self.duration, fps: self.fps }
    }

    /// Whether `path` has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

/// Load a config file: JSON for `.json`, YAML for anything else.
pub fn load_scan_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    let body = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config: ScanConfig = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&body)?
    } else {
        serde_yaml::from_str(&body)?
    };
    config.validate()?;
    Ok(config)
}
