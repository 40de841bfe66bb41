//! Knowledge base lookup for the AutoStream support agent
//!
//! Maps user queries to canned plan/policy text. Lookup is deterministic
//! keyword routing over a small JSON knowledge base; an empty result means
//! nothing relevant was found.

pub mod knowledge;
pub mod retriever;

pub use knowledge::{KnowledgeBase, Plan};
pub use retriever::KbRetriever;

use thiserror::Error;

/// Retrieval errors (hard I/O failures only; "no match" is an empty result)
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Knowledge base I/O error: {0}")]
    Io(String),

    #[error("Knowledge base parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for RagError {
    fn from(err: std::io::Error) -> Self {
        RagError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RagError {
    fn from(err: serde_json::Error) -> Self {
        RagError::Parse(err.to_string())
    }
}

impl From<RagError> for autostream_core::Error {
    fn from(err: RagError) -> Self {
        autostream_core::Error::Retrieval(err.to_string())
    }
}
