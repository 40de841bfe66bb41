//! Intent-routing dialogue engine for the AutoStream support agent
//!
//! Features:
//! - Cascading intent classification (keywords, local model, LLM fallback)
//! - Bounded per-session conversation state with lead-field tracking
//! - Deterministic stage routing (retrieve, collect lead, respond)
//! - Keyed session storage with exclusive per-session access

pub mod classifier;
pub mod engine;
pub mod model;
pub mod router;
pub mod session;
pub mod state;

pub use classifier::IntentClassifier;
pub use engine::{DialogueEngine, Stage, FALLBACK_REPLY};
pub use model::LocalIntentModel;
pub use router::route;
pub use session::{InMemorySessionStore, SessionHandle, SessionStore};
pub use state::{ConversationState, LeadExtraction};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Lead capture error: {0}")]
    Lead(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<autostream_core::Error> for AgentError {
    fn from(err: autostream_core::Error) -> Self {
        use autostream_core::Error as CoreError;
        match err {
            CoreError::Llm(msg) => AgentError::Llm(msg),
            CoreError::Retrieval(msg) => AgentError::Retrieval(msg),
            CoreError::Lead(msg) => AgentError::Lead(msg),
            CoreError::Config(msg) => AgentError::Config(msg),
            CoreError::Serialization(msg) => AgentError::Engine(msg),
        }
    }
}

impl From<autostream_llm::LlmError> for AgentError {
    fn from(err: autostream_llm::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}

impl From<autostream_rag::RagError> for AgentError {
    fn from(err: autostream_rag::RagError) -> Self {
        AgentError::Retrieval(err.to_string())
    }
}

impl From<autostream_tools::ToolError> for AgentError {
    fn from(err: autostream_tools::ToolError) -> Self {
        AgentError::Lead(err.to_string())
    }
}

impl From<autostream_config::ConfigError> for AgentError {
    fn from(err: autostream_config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}
