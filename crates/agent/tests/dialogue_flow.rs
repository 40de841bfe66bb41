//! Integration tests for the dialogue engine (classify -> route -> respond)
//!
//! These tests drive full traversals with scripted collaborators and verify
//! routing, grounding, lead collection, and degradation behavior.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use autostream_agent::{
    ConversationState, DialogueEngine, InMemorySessionStore, SessionStore, FALLBACK_REPLY,
};
use autostream_core::{Intent, KnowledgeRetriever, LanguageModel, TurnRole};
use autostream_rag::{KbRetriever, KnowledgeBase};
use autostream_tools::{LeadRecord, StubLeadGateway};

/// LLM replaying a scripted sequence of responses. `Err` entries simulate
/// service failures. Prompts are recorded for inspection.
struct ScriptedLlm {
    script: Mutex<VecDeque<Result<String, ()>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(script: Vec<Result<&str, ()>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|step| step.map(|s| s.to_string()))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> autostream_core::Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(())) => Err(autostream_core::Error::Llm("service exhausted".into())),
            None => Ok("Okay.".to_string()),
        }
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Retriever that always fails with a hard I/O error
struct FailingRetriever;

#[async_trait]
impl KnowledgeRetriever for FailingRetriever {
    async fn retrieve(&self, _query: &str) -> autostream_core::Result<String> {
        Err(autostream_core::Error::Retrieval("knowledge source offline".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn engine_with(
    llm: Arc<ScriptedLlm>,
    leads: Arc<StubLeadGateway>,
) -> DialogueEngine {
    let retriever = Arc::new(KbRetriever::new(KnowledgeBase::autostream()));
    DialogueEngine::new(llm, retriever, leads)
}

const NULL_EXTRACTION: &str = r#"{"name": null, "email": null, "platform": null}"#;

#[tokio::test]
async fn test_greeting_turn_touches_no_lead_state() {
    let llm = Arc::new(ScriptedLlm::new(vec![Ok("Hi! How can I help you today?")]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads.clone());
    let mut state = ConversationState::new();

    let reply = engine.handle_message(&mut state, "Hello!").await.unwrap();

    assert_eq!(reply, "Hi! How can I help you today?");
    assert_eq!(state.last_intent, Some(Intent::Greeting));
    assert!(!state.collecting_lead);
    assert!(state.name.is_none() && state.email.is_none() && state.platform.is_none());
    assert!(!state.knowledge_grounded);
    assert!(leads.captured().is_empty());

    // One user turn, one assistant turn
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.history()[0].role, TurnRole::User);
    assert_eq!(state.history()[1].role, TurnRole::Assistant);
}

#[tokio::test]
async fn test_product_inquiry_grounds_reply_in_knowledge() {
    let llm = Arc::new(ScriptedLlm::new(vec![Ok("The Pro plan is $79/month.")]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads);
    let mut state = ConversationState::new();

    let reply = engine
        .handle_message(&mut state, "What's the price of the Pro plan?")
        .await
        .unwrap();

    assert_eq!(reply, "The Pro plan is $79/month.");
    assert_eq!(state.last_intent, Some(Intent::ProductInquiry));
    assert!(state.knowledge_grounded);

    // The generation prompt carried the retrieved plan text and the
    // grounding instruction
    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Pro Plan details:"));
    assert!(prompts[0].contains("grounded"));
}

#[tokio::test]
async fn test_unmatched_inquiry_is_ungrounded() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Ok("product_inquiry"),
        Ok("I don't have that information."),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads);
    let mut state = ConversationState::new();

    // No keywords, no model match: the scripted fallback classifies it as
    // an inquiry, but the knowledge base has nothing relevant.
    let reply = engine
        .handle_message(&mut state, "Can I bring my ferret?")
        .await
        .unwrap();

    assert_eq!(reply, "I don't have that information.");
    assert!(!state.knowledge_grounded);
    let prompts = llm.prompts();
    assert!(prompts.last().unwrap().contains("No reliable info found"));
}

#[tokio::test]
async fn test_lookup_failure_is_treated_as_no_knowledge() {
    let llm = Arc::new(ScriptedLlm::new(vec![Ok("Let me connect you to sales.")]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = DialogueEngine::new(llm.clone(), Arc::new(FailingRetriever), leads);
    let mut state = ConversationState::new();

    let reply = engine
        .handle_message(&mut state, "What's the price of the Pro plan?")
        .await
        .unwrap();

    assert_eq!(reply, "Let me connect you to sales.");
    assert!(!state.knowledge_grounded);
    assert!(llm.prompts()[0].contains("No reliable info found"));
}

#[tokio::test]
async fn test_lead_capture_flow_over_four_turns() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        // Turn 1: "I want to sign up" (keyword classified)
        Ok(NULL_EXTRACTION),
        Ok("Happy to get you set up! Could you share your name, email, and platform?"),
        // Turn 2: "Alice"
        Ok("unknown"),
        Ok(r#"{"name": "Alice", "email": null, "platform": null}"#),
        Ok("Thanks Alice! What's your email and preferred platform?"),
        // Turn 3: "alice@example.com" (extractor also hallucinates a name)
        Ok("unknown"),
        Ok(r#"{"name": "Bobby", "email": "alice@example.com", "platform": null}"#),
        Ok("Got it. Which platform are you interested in?"),
        // Turn 4: "YouTube"
        Ok("unknown"),
        Ok(r#"{"name": null, "email": null, "platform": "YouTube"}"#),
        Ok("You're all set, Alice! Our team will reach out soon."),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads.clone());
    let mut state = ConversationState::new();

    // Turn 1: enters lead mode, all three fields missing
    engine.handle_message(&mut state, "I want to sign up").await.unwrap();
    assert_eq!(state.last_intent, Some(Intent::HighIntentLead));
    assert!(state.collecting_lead);
    assert!(state
        .history()
        .iter()
        .any(|t| t.content == "Great! To complete your signup, I still need your name, email, platform."));

    // Turn 2: name arrives
    engine.handle_message(&mut state, "Alice").await.unwrap();
    assert_eq!(state.name.as_deref(), Some("Alice"));
    assert!(state
        .history()
        .iter()
        .any(|t| t.content == "Great! To complete your signup, I still need your email, platform."));

    // Turn 3: email arrives; the hallucinated name must not overwrite
    engine
        .handle_message(&mut state, "alice@example.com")
        .await
        .unwrap();
    assert_eq!(state.name.as_deref(), Some("Alice"));
    assert_eq!(state.email.as_deref(), Some("alice@example.com"));
    assert!(state.collecting_lead);
    assert!(leads.captured().is_empty());

    // Turn 4: platform completes the lead
    let reply = engine.handle_message(&mut state, "YouTube").await.unwrap();
    assert_eq!(reply, "You're all set, Alice! Our team will reach out soon.");

    // Captured exactly once with the collected values
    assert_eq!(
        leads.captured(),
        vec![LeadRecord::new("Alice", "alice@example.com", "YouTube")]
    );

    // Cycle reset, post-lead intent, one-shot flag set then consumed
    assert!(!state.collecting_lead);
    assert!(state.name.is_none() && state.email.is_none() && state.platform.is_none());
    assert_eq!(state.last_intent, Some(Intent::PostLead));
    assert!(state.take_lead_just_captured());
    assert!(!state.take_lead_just_captured());

    // History stayed bounded the whole way
    assert_eq!(state.history().len(), ConversationState::MAX_TURNS);
}

#[tokio::test]
async fn test_lead_mode_is_sticky_across_fresh_intents() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        // Turn 1
        Ok(NULL_EXTRACTION),
        Ok("Could you share your details?"),
        // Turn 2: an inquiry arrives mid-collection
        Ok(NULL_EXTRACTION),
        Ok("Let's finish your signup first."),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads.clone());
    let mut state = ConversationState::new();

    engine.handle_message(&mut state, "I want to sign up").await.unwrap();
    assert!(state.collecting_lead);

    engine
        .handle_message(&mut state, "What's the price of the Pro plan?")
        .await
        .unwrap();

    // The fresh inquiry intent was recorded but did not break out of lead
    // mode: no retrieval ran, the extraction prompt was sent instead.
    assert_eq!(state.last_intent, Some(Intent::ProductInquiry));
    assert!(state.collecting_lead);
    assert!(!state.knowledge_grounded);
    assert!(leads.captured().is_empty());
    let prompts = llm.prompts();
    assert!(prompts[2].contains("extract structured lead details")
        || prompts[2].contains("You extract structured lead details"));
}

#[tokio::test]
async fn test_generation_failure_still_replies() {
    let llm = Arc::new(ScriptedLlm::new(vec![Err(())]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm, leads);
    let mut state = ConversationState::new();

    let reply = engine.handle_message(&mut state, "Hello!").await.unwrap();

    assert_eq!(reply, FALLBACK_REPLY);
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.history()[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_generation_failure_during_collection_uses_staged_ask() {
    let llm = Arc::new(ScriptedLlm::new(vec![Ok(NULL_EXTRACTION), Err(())]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm, leads);
    let mut state = ConversationState::new();

    let reply = engine.handle_message(&mut state, "I want to sign up").await.unwrap();

    assert_eq!(
        reply,
        "Great! To complete your signup, I still need your name, email, platform."
    );
    // The ask was recorded once, not duplicated by the fallback path
    let asks = state
        .history()
        .iter()
        .filter(|t| t.content == reply)
        .count();
    assert_eq!(asks, 1);
}

#[tokio::test]
async fn test_extraction_failure_keeps_collection_cycle_alive() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Err(()),
        Ok("Sorry, could you repeat your details?"),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm, leads.clone());
    let mut state = ConversationState::new();

    let reply = engine.handle_message(&mut state, "I want to sign up").await.unwrap();

    // Extraction degraded to an empty record; the traversal completed
    assert_eq!(reply, "Sorry, could you repeat your details?");
    assert!(state.collecting_lead);
    assert_eq!(state.missing_lead_fields(), vec!["name", "email", "platform"]);
    assert!(leads.captured().is_empty());
}

#[tokio::test]
async fn test_post_capture_reply_stops_selling() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Ok(r#"{"name": "Alice", "email": "alice@example.com", "platform": "YouTube"}"#),
        Ok("Welcome aboard, Alice!"),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm.clone(), leads);
    let mut state = ConversationState::new();

    // Everything arrives in one message
    engine
        .handle_message(
            &mut state,
            "I want to sign up. I'm Alice, alice@example.com, for YouTube",
        )
        .await
        .unwrap();

    assert_eq!(state.last_intent, Some(Intent::PostLead));
    // The reply prompt for the capture turn carried the no-selling note
    let prompts = llm.prompts();
    assert!(prompts.last().unwrap().contains("Do NOT try to sell again"));
}

#[tokio::test]
async fn test_sessions_are_isolated_by_key() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        Ok(NULL_EXTRACTION),
        Ok("Could you share your details?"),
        Ok("Hi there!"),
    ]));
    let leads = Arc::new(StubLeadGateway::new());
    let engine = engine_with(llm, leads);
    let store = InMemorySessionStore::new();

    engine.chat(&store, "thread-a", "I want to sign up").await.unwrap();
    engine.chat(&store, "thread-b", "Hello!").await.unwrap();

    let a = store.get_or_create("thread-a");
    let b = store.get_or_create("thread-b");
    assert!(a.lock().await.collecting_lead);
    assert!(!b.lock().await.collecting_lead);
    assert_eq!(store.len(), 2);
}
