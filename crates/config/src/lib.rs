//! Configuration management for the AutoStream support agent
//!
//! Supports loading configuration from:
//! - JSON/TOML files under `config/`
//! - Environment variables (AUTOSTREAM_ prefix)

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, AgentSettings, KnowledgeSettings, LeadSettings, LlmSettings, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
