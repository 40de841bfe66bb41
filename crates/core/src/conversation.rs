//! Conversation types: turns and intent labels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intent of a user message
///
/// The classifier resolves every message to `Greeting`, `ProductInquiry`,
/// or `HighIntentLead`. `PostLead` is set by the engine after a successful
/// lead capture; `Unknown` marks messages no strategy could resolve, and is
/// handled as small talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// User greeting / small talk opener
    Greeting,
    /// Question about product features, pricing, plans
    ProductInquiry,
    /// Interest in signing up, purchasing, account actions
    HighIntentLead,
    /// Set after a lead was just captured
    PostLead,
    /// Could not be resolved; treated as small talk
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::ProductInquiry => "product_inquiry",
            Intent::HighIntentLead => "high_intent_lead",
            Intent::PostLead => "post_lead",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse a classifier label.
    ///
    /// Only the three classifiable labels are accepted; anything else
    /// (including `post_lead`, which the classifier never emits) is `None`.
    pub fn parse_label(label: &str) -> Option<Intent> {
        match label.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "greeting" => Some(Intent::Greeting),
            "product_inquiry" => Some(Intent::ProductInquiry),
            "high_intent_lead" => Some(Intent::HighIntentLead),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Format as a transcript line
    pub fn as_transcript_line(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}
