//! Language model trait

use async_trait::async_trait;

use crate::Result;

/// Text generation interface
///
/// Implementations:
/// - `OllamaBackend` - local Ollama inference (autostream-llm)
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(OllamaBackend::new(config)?);
/// let reply = llm.generate("Classify this message: ...").await?;
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a single prompt.
    ///
    /// The prompt may contain structured-output instructions; parsing and
    /// validating the result is the caller's responsibility.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("mock reply".to_string())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn test_mock_llm() {
        let llm = MockLlm;
        assert!(llm.is_available().await);
        assert_eq!(llm.generate("anything").await.unwrap(), "mock reply");
    }
}
