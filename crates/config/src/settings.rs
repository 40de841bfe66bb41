//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{classifier, endpoints, generation};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// LLM backend configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Agent configuration
    #[serde(default)]
    pub agent: AgentSettings,

    /// Knowledge base configuration
    #[serde(default)]
    pub knowledge: KnowledgeSettings,

    /// Lead capture configuration
    #[serde(default)]
    pub leads: LeadSettings,
}

/// LLM backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model name/ID
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_llm_endpoint() -> String {
    endpoints::DEFAULT_LLM_ENDPOINT.to_string()
}

fn default_llm_model() -> String {
    endpoints::DEFAULT_LLM_MODEL.to_string()
}

fn default_max_tokens() -> usize {
    generation::DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    generation::DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    generation::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    generation::DEFAULT_MAX_RETRIES
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Minimum local-model confidence before falling back to the LLM
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_confidence_threshold() -> f32 {
    classifier::CONFIDENCE_THRESHOLD
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// Knowledge base settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeSettings {
    /// Path to the knowledge base JSON file.
    /// When unset, the built-in AutoStream knowledge base is used.
    #[serde(default)]
    pub path: Option<String>,
}

/// Lead capture settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadSettings {
    /// CRM webhook URL for captured leads.
    /// When unset, leads are recorded in-process only.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.agent.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "agent.confidence_threshold".to_string(),
                message: format!(
                    "Must be between 0.0 and 1.0, got {}",
                    self.agent.confidence_threshold
                ),
            });
        }

        if self.llm.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.endpoint".to_string(),
                message: "Endpoint must not be empty".to_string(),
            });
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from config files and environment
///
/// Sources, later sources override earlier ones:
/// 1. `config/default` (optional)
/// 2. `config/{env}` when an environment name is given (optional)
/// 3. `AUTOSTREAM__` prefixed environment variables
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("AUTOSTREAM")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
