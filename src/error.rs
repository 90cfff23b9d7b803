// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for tagbot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TagbotError>;

#[derive(Error, Debug)]
pub enum TagbotError {
    /// The extraction violates its own structural invariants.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A rule, taxonomy or analyzer setting is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TagbotError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        TagbotError::MalformedInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        TagbotError::Configuration(msg.into())
    }
}
