// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for tagbot

use crate::error::{Result, TagbotError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer settings
    #[serde(default)]
    pub analysis: AnalyzerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Inputs to the detection rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Words strictly larger than this font size (points) are heading candidates
    #[serde(default = "default_heading_threshold")]
    pub heading_threshold: f64,

    /// Slack (points) allowed before a backwards move counts as a reading-order inversion
    #[serde(default = "default_reading_order_tolerance")]
    pub reading_order_tolerance: f64,

    /// Minimum empty vertical band (points) that makes a page multi-column
    #[serde(default = "default_column_gutter")]
    pub column_gutter: f64,

    /// Run the low-severity and manual-only checks (contrast, metadata)
    #[serde(default)]
    pub advisory_checks: bool,

    /// Skip tiny images that are almost certainly decorative
    #[serde(default)]
    pub skip_decorative_images: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            heading_threshold: default_heading_threshold(),
            reading_order_tolerance: default_reading_order_tolerance(),
            column_gutter: default_column_gutter(),
            advisory_checks: false,
            skip_decorative_images: false,
        }
    }
}

impl AnalyzerConfig {
    /// Reject values the rules cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.heading_threshold.is_finite() || self.heading_threshold <= 0.0 {
            return Err(TagbotError::configuration(format!(
                "heading_threshold must be a positive number, got {}",
                self.heading_threshold
            )));
        }
        if !self.reading_order_tolerance.is_finite() || self.reading_order_tolerance < 0.0 {
            return Err(TagbotError::configuration(format!(
                "reading_order_tolerance must be zero or positive, got {}",
                self.reading_order_tolerance
            )));
        }
        if !self.column_gutter.is_finite() || self.column_gutter <= 0.0 {
            return Err(TagbotError::configuration(format!(
                "column_gutter must be a positive number, got {}",
                self.column_gutter
            )));
        }
        Ok(())
    }
}

fn default_heading_threshold() -> f64 {
    16.0
}

fn default_reading_order_tolerance() -> f64 {
    3.0
}

fn default_column_gutter() -> f64 {
    18.0
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a path
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    config.analysis.validate()?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Default config location, relative to the working directory
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".tagbot.toml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config).map_err(|e| TagbotError::configuration(e.to_string()))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|e| e == "toml").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.heading_threshold, 16.0);
        assert_eq!(config.analysis.reading_order_tolerance, 3.0);
        assert!(!config.analysis.advisory_checks);
        assert!(config.analysis.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[analysis]\nheading_threshold = 20.0\n").unwrap();
        assert_eq!(config.analysis.heading_threshold, 20.0);
        assert_eq!(config.analysis.column_gutter, 18.0);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_yaml_config() {
        let config: Config =
            serde_yaml::from_str("analysis:\n  advisory_checks: true\nlog:\n  level: debug\n").unwrap();
        assert!(config.analysis.advisory_checks);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = AnalyzerConfig {
            heading_threshold: 0.0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TagbotError::Configuration(_))));

        let config = AnalyzerConfig {
            reading_order_tolerance: f64::NAN,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_write_then_load_default_config() {
        let dir = TempDir::new().unwrap();
        for name in ["tagbot.toml", "tagbot.yml"] {
            let path = dir.path().join("nested").join(name);
            write_default_config(&path).unwrap();
            assert_eq!(load_config(&path).unwrap(), Config::default());
        }
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis]\nheading_threshold = -4.0\n").unwrap();
        assert!(matches!(load_config(&path), Err(TagbotError::Configuration(_))));
    }
}
