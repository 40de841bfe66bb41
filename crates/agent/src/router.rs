//! Stage routing
//!
//! Pure mapping from conversation state to the next stage. Lead-collection
//! mode is sticky: once entered it wins over any freshly detected intent
//! until the cycle completes or is reset.

use autostream_core::Intent;

use crate::engine::Stage;
use crate::state::ConversationState;

/// Pick the stage that handles the current turn.
///
/// Pure function of `collecting_lead` and `last_intent`; identical inputs
/// always yield the same stage.
pub fn route(state: &ConversationState) -> Stage {
    if state.collecting_lead {
        return Stage::CollectLead;
    }

    match state.last_intent {
        Some(Intent::ProductInquiry) => Stage::Retrieve,
        Some(Intent::HighIntentLead) => Stage::CollectLead,
        // Greeting, post-lead, unknown, or nothing classified yet:
        // plain response
        _ => Stage::Respond,
    }
}
