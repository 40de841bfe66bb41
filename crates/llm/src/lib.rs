//! LLM integration for the AutoStream support agent
//!
//! Features:
//! - Ollama backend with retry and availability probing
//! - Prompt construction for reply synthesis, lead extraction,
//!   and fallback intent classification

pub mod backend;
pub mod prompt;

pub use backend::{GenerationResult, LlmConfig, OllamaBackend};
pub use prompt::{classification_prompt, extraction_prompt, KnownFields, ReplyPromptBuilder};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for autostream_core::Error {
    fn from(err: LlmError) -> Self {
        autostream_core::Error::Llm(err.to_string())
    }
}
