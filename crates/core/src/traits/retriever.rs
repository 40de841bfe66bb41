//! Knowledge lookup trait

use async_trait::async_trait;

use crate::Result;

/// Knowledge lookup interface
///
/// Maps a user query to canned product/policy text. Returns an empty string
/// when nothing relevant is found; errors are reserved for hard I/O failure.
///
/// Implementations:
/// - `KbRetriever` - static knowledge base lookup (autostream-rag)
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Retrieve relevant text for the query, or an empty string on no match
    async fn retrieve(&self, query: &str) -> Result<String>;

    /// Get retriever name for logging
    fn name(&self) -> &str;
}
