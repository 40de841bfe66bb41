//! Per-session conversation state
//!
//! Tracks the rolling chat history, the last detected intent, and the lead
//! fields being collected across turns. One `ConversationState` exists per
//! session and is mutated turn-by-turn by the engine.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use autostream_config::constants::history;
use autostream_core::{Intent, Turn};

/// Lead fields extracted from a single generative extraction call.
/// Each field is nullable; absent fields never overwrite known values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadExtraction {
    pub name: Option<String>,
    pub email: Option<String>,
    pub platform: Option<String>,
}

/// Conversation state for one session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationState {
    /// Rolling chat history, bounded to the most recent [`Self::MAX_TURNS`]
    history: VecDeque<Turn>,

    /// Last detected intent; unset before the first turn
    pub last_intent: Option<Intent>,

    /// True while collecting lead details. Sticky: stays true until all
    /// three fields are filled and captured, or the cycle is reset.
    pub collecting_lead: bool,

    /// Lead fields; first non-empty value wins within a collection cycle
    pub name: Option<String>,
    pub email: Option<String>,
    pub platform: Option<String>,

    /// True only when the most recent reply was built from a non-empty
    /// knowledge lookup. Reset on every classify step.
    pub knowledge_grounded: bool,

    /// One-shot flag set when the lead fields transition to complete.
    /// Consumed with [`Self::take_lead_just_captured`].
    lead_just_captured: bool,
}

impl ConversationState {
    /// Maximum turns retained in history
    pub const MAX_TURNS: usize = history::MAX_TURNS;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, dropping the oldest entries beyond the bound
    pub fn push_turn(&mut self, turn: Turn) {
        self.history.push_back(turn);
        while self.history.len() > Self::MAX_TURNS {
            self.history.pop_front();
        }
    }

    /// The retained history, oldest first
    pub fn history(&self) -> &VecDeque<Turn> {
        &self.history
    }

    /// The retained history as transcript text
    pub fn transcript(&self) -> String {
        self.history
            .iter()
            .map(Turn::as_transcript_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Merge extracted lead fields. First non-empty value wins per field
    /// per collection cycle; later extractions never overwrite.
    pub fn merge_extraction(&mut self, extraction: LeadExtraction) {
        Self::keep(&mut self.name, extraction.name);
        Self::keep(&mut self.email, extraction.email);
        Self::keep(&mut self.platform, extraction.platform);
    }

    fn keep(existing: &mut Option<String>, candidate: Option<String>) {
        if existing.is_none() {
            if let Some(value) = candidate.and_then(Self::sanitize) {
                *existing = Some(value);
            }
        }
    }

    /// Treat empty strings and the literal null-words the extractor
    /// sometimes emits as absent.
    fn sanitize(value: String) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed.eq_ignore_ascii_case("none")
        {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Names of the lead fields still missing, in fixed order
    pub fn missing_lead_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.email.is_none() {
            missing.push("email");
        }
        if self.platform.is_none() {
            missing.push("platform");
        }
        missing
    }

    pub fn is_lead_complete(&self) -> bool {
        self.missing_lead_fields().is_empty()
    }

    /// End the current collection cycle: clears the collecting flag and the
    /// three lead fields. History and last intent are untouched.
    pub fn reset_lead_capture(&mut self) {
        self.collecting_lead = false;
        self.name = None;
        self.email = None;
        self.platform = None;
    }

    /// Mark that the lead fields just transitioned to complete
    pub fn mark_lead_captured(&mut self) {
        self.lead_just_captured = true;
    }

    /// Whether a lead was just captured, without consuming the flag
    pub fn lead_just_captured(&self) -> bool {
        self.lead_just_captured
    }

    /// Consume the one-shot capture flag. Subsequent reads return false
    /// until the next completed capture.
    pub fn take_lead_just_captured(&mut self) -> bool {
        std::mem::take(&mut self.lead_just_captured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut state = ConversationState::new();
        for i in 0..8 {
            state.push_turn(Turn::user(format!("message {}", i)));
        }

        assert_eq!(state.history().len(), ConversationState::MAX_TURNS);
        // The retained turns are exactly the most recent five, in order
        let contents: Vec<&str> = state.history().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["message 3", "message 4", "message 5", "message 6", "message 7"]
        );
    }

    #[test]
    fn test_short_history_is_untruncated() {
        let mut state = ConversationState::new();
        state.push_turn(Turn::user("hello"));
        state.push_turn(Turn::assistant("hi there"));
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.transcript(), "user: hello\nassistant: hi there");
    }

    #[test]
    fn test_first_extraction_wins() {
        let mut state = ConversationState::new();

        state.merge_extraction(LeadExtraction {
            name: Some("Alice".into()),
            ..Default::default()
        });
        assert_eq!(state.name.as_deref(), Some("Alice"));

        // A later extraction in the same cycle must not overwrite
        state.merge_extraction(LeadExtraction {
            name: Some("Bob".into()),
            email: Some("bob@example.com".into()),
            ..Default::default()
        });
        assert_eq!(state.name.as_deref(), Some("Alice"));
        assert_eq!(state.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn test_null_words_do_not_fill_fields() {
        let mut state = ConversationState::new();
        state.merge_extraction(LeadExtraction {
            name: Some("null".into()),
            email: Some("None".into()),
            platform: Some("   ".into()),
        });
        assert_eq!(state.missing_lead_fields(), vec!["name", "email", "platform"]);
    }

    #[test]
    fn test_missing_fields_fixed_order() {
        let mut state = ConversationState::new();
        state.platform = Some("YouTube".into());
        assert_eq!(state.missing_lead_fields(), vec!["name", "email"]);

        state.name = Some("Alice".into());
        state.email = Some("alice@example.com".into());
        assert!(state.is_lead_complete());
    }

    #[test]
    fn test_reset_lead_capture_keeps_history_and_intent() {
        let mut state = ConversationState::new();
        state.push_turn(Turn::user("I want to sign up"));
        state.last_intent = Some(Intent::HighIntentLead);
        state.collecting_lead = true;
        state.name = Some("Alice".into());
        state.email = Some("alice@example.com".into());
        state.platform = Some("YouTube".into());

        state.reset_lead_capture();

        assert!(!state.collecting_lead);
        assert!(state.name.is_none() && state.email.is_none() && state.platform.is_none());
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.last_intent, Some(Intent::HighIntentLead));
    }

    #[test]
    fn test_capture_flag_is_consumed_once() {
        let mut state = ConversationState::new();
        assert!(!state.take_lead_just_captured());

        state.mark_lead_captured();
        assert!(state.lead_just_captured());
        assert!(state.take_lead_just_captured());
        assert!(!state.take_lead_just_captured());
        assert!(!state.lead_just_captured());
    }
}
