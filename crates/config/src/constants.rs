//! Centralized constants for the support agent
//!
//! Single source of truth for business constants and default values used
//! across the workspace.

/// Conversation history limits
pub mod history {
    /// Maximum turns retained in the rolling conversation history
    pub const MAX_TURNS: usize = 5;
}

/// Intent classification
pub mod classifier {
    /// Minimum local-model confidence to accept its label without
    /// falling through to the generative fallback
    pub const CONFIDENCE_THRESHOLD: f32 = 0.40;
}

/// Default service endpoints
pub mod endpoints {
    /// Default Ollama endpoint for local inference
    pub const DEFAULT_LLM_ENDPOINT: &str = "http://localhost:11434";

    /// Default model served by Ollama
    pub const DEFAULT_LLM_MODEL: &str = "qwen2.5:7b-instruct-q4_K_M";
}

/// Generation limits
pub mod generation {
    /// Maximum tokens per completion
    pub const DEFAULT_MAX_TOKENS: usize = 256;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Maximum retry attempts for transient failures
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
}
