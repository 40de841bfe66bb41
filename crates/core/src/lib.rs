//! Core traits and types for the AutoStream support agent
//!
//! This crate provides foundational types used across all other crates:
//! - Conversation types (turns, intent labels)
//! - Core traits for pluggable collaborators (LLM, knowledge lookup)
//! - Error types

pub mod conversation;
pub mod error;
pub mod traits;

pub use conversation::{Intent, Turn, TurnRole};
pub use error::{Error, Result};
pub use traits::{KnowledgeRetriever, LanguageModel};
