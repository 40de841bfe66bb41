//! Dialogue engine
//!
//! Drives one traversal of the stage graph per inbound message:
//!
//! ```text
//! Classify -> { Retrieve | CollectLead | Respond }
//! Retrieve -> Respond
//! CollectLead -> Respond
//! Respond -> Terminal
//! ```
//!
//! Conversation state persists across traversals via the session store;
//! beyond classification, each traversal makes at most two collaborator
//! calls (one extraction or retrieval, one generation).

use std::sync::Arc;

use autostream_config::Settings;
use autostream_core::{Intent, KnowledgeRetriever, LanguageModel, Turn};
use autostream_llm::{
    extraction_prompt, KnownFields, LlmConfig, OllamaBackend, ReplyPromptBuilder,
};
use autostream_rag::{KbRetriever, KnowledgeBase};
use autostream_tools::{LeadGateway, LeadRecord, StubLeadGateway, WebhookLeadGateway};

use crate::classifier::IntentClassifier;
use crate::router::route;
use crate::session::SessionStore;
use crate::state::{ConversationState, LeadExtraction};
use crate::AgentError;

/// Reply used when generation fails and nothing better was staged
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Stages of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Append the message, classify intent
    Classify,
    /// Knowledge base lookup
    Retrieve,
    /// Lead-field extraction and capture
    CollectLead,
    /// Synthesize the user-facing reply
    Respond,
    /// Traversal complete
    Terminal,
}

impl Stage {
    /// Transition table. Classify fans out through the router; every other
    /// stage has a single successor.
    pub fn next(self, state: &ConversationState) -> Stage {
        match self {
            Stage::Classify => route(state),
            Stage::Retrieve | Stage::CollectLead => Stage::Respond,
            Stage::Respond | Stage::Terminal => Stage::Terminal,
        }
    }
}

/// Per-traversal scratch state
struct TurnContext {
    message: String,
    /// Retrieved knowledge text for the Respond stage
    knowledge: Option<String>,
    /// Deterministic text produced by CollectLead, already in history
    staged_reply: Option<String>,
    /// Final user-facing reply
    reply: Option<String>,
}

impl TurnContext {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            knowledge: None,
            staged_reply: None,
            reply: None,
        }
    }
}

/// Dialogue engine assembling the stage graph over the collaborators
pub struct DialogueEngine {
    classifier: IntentClassifier,
    llm: Arc<dyn LanguageModel>,
    retriever: Arc<dyn KnowledgeRetriever>,
    leads: Arc<dyn LeadGateway>,
}

impl DialogueEngine {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        retriever: Arc<dyn KnowledgeRetriever>,
        leads: Arc<dyn LeadGateway>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(llm.clone()),
            llm,
            retriever,
            leads,
        }
    }

    /// Override the classifier's local-model confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.classifier = IntentClassifier::new(self.llm.clone()).with_threshold(threshold);
        self
    }

    /// Build an engine with the default collaborators from settings:
    /// Ollama generation, the knowledge base file (or the built-in one),
    /// and the CRM webhook (or the in-process stub).
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let llm: Arc<dyn LanguageModel> =
            Arc::new(OllamaBackend::new(LlmConfig::from(&settings.llm))?);

        let kb = match &settings.knowledge.path {
            Some(path) => KnowledgeBase::from_path(path)?,
            None => KnowledgeBase::autostream(),
        };
        let retriever: Arc<dyn KnowledgeRetriever> = Arc::new(KbRetriever::new(kb));

        let leads: Arc<dyn LeadGateway> = match &settings.leads.webhook_url {
            Some(url) => Arc::new(WebhookLeadGateway::new(url)),
            None => Arc::new(StubLeadGateway::new()),
        };

        Ok(Self::new(llm, retriever, leads)
            .with_confidence_threshold(settings.agent.confidence_threshold))
    }

    /// Process one inbound message against a session from the store.
    ///
    /// The session mutex is held for the whole traversal, so traversals
    /// against the same key never overlap.
    pub async fn chat(
        &self,
        sessions: &dyn SessionStore,
        session_id: &str,
        message: &str,
    ) -> Result<String, AgentError> {
        let handle = sessions.get_or_create(session_id);
        let mut state = handle.lock().await;
        self.handle_message(&mut state, message).await
    }

    /// Run one full traversal for an inbound message and return the reply
    pub async fn handle_message(
        &self,
        state: &mut ConversationState,
        message: &str,
    ) -> Result<String, AgentError> {
        let mut ctx = TurnContext::new(message);
        let mut stage = Stage::Classify;

        loop {
            tracing::debug!(stage = ?stage, "Entering stage");
            match stage {
                Stage::Classify => self.classify_stage(state, &ctx).await,
                Stage::Retrieve => self.retrieve_stage(state, &mut ctx).await,
                Stage::CollectLead => self.collect_lead_stage(state, &mut ctx).await?,
                Stage::Respond => self.respond_stage(state, &mut ctx).await,
                Stage::Terminal => break,
            }
            stage = stage.next(state);
        }

        Ok(ctx.reply.unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }

    /// Append the inbound message and classify its intent
    async fn classify_stage(&self, state: &mut ConversationState, ctx: &TurnContext) {
        state.knowledge_grounded = false;
        state.push_turn(Turn::user(&ctx.message));

        let intent = self.classifier.classify(&ctx.message).await;
        tracing::debug!(intent = %intent, "Classified inbound message");
        state.last_intent = Some(intent);
    }

    /// Look up knowledge for the raw message. Lookup failure means "no
    /// knowledge found"; the reply is then explicitly ungrounded.
    async fn retrieve_stage(&self, state: &mut ConversationState, ctx: &mut TurnContext) {
        match self.retriever.retrieve(&ctx.message).await {
            Ok(text) if !text.trim().is_empty() => {
                state.knowledge_grounded = true;
                ctx.knowledge = Some(text);
            }
            Ok(_) => {
                state.knowledge_grounded = false;
            }
            Err(e) => {
                tracing::warn!("Knowledge lookup failed, replying ungrounded: {}", e);
                state.knowledge_grounded = false;
            }
        }
    }

    /// Extract lead fields, merge them first-wins, and either ask for what
    /// is still missing or capture the completed lead.
    async fn collect_lead_stage(
        &self,
        state: &mut ConversationState,
        ctx: &mut TurnContext,
    ) -> Result<(), AgentError> {
        state.collecting_lead = true;

        let known = KnownFields {
            name: state.name.as_deref(),
            email: state.email.as_deref(),
            platform: state.platform.as_deref(),
        };
        let prompt = extraction_prompt(&state.transcript(), &ctx.message, known);

        let extraction = match self.llm.generate(&prompt).await {
            Ok(raw) => parse_extraction(&raw),
            Err(e) => {
                tracing::warn!("Lead extraction failed, continuing with empty record: {}", e);
                LeadExtraction::default()
            }
        };
        state.merge_extraction(extraction);

        let missing = state.missing_lead_fields();
        if !missing.is_empty() {
            let ask = format!(
                "Great! To complete your signup, I still need your {}.",
                missing.join(", ")
            );
            state.push_turn(Turn::assistant(&ask));
            ctx.staged_reply = Some(ask);
            return Ok(());
        }

        // All fields present: capture the lead. The gateway revalidates and
        // a validation failure here is an invariant violation, so it
        // propagates instead of degrading.
        let lead = LeadRecord::new(
            state.name.clone().unwrap_or_default(),
            state.email.clone().unwrap_or_default(),
            state.platform.clone().unwrap_or_default(),
        );
        let receipt = self.leads.submit(&lead).await?;

        state.reset_lead_capture();
        state.last_intent = Some(Intent::PostLead);
        state.mark_lead_captured();

        let confirmation = format!(
            "Lead captured successfully ({}). Our team will reach out soon.",
            receipt
        );
        state.push_turn(Turn::assistant(&confirmation));
        ctx.staged_reply = Some(confirmation);
        Ok(())
    }

    /// Synthesize the user-facing reply with the one generation call of the
    /// traversal. Generation failure degrades to the staged CollectLead
    /// text, or a canned apology; the user always gets a reply.
    async fn respond_stage(&self, state: &mut ConversationState, ctx: &mut TurnContext) {
        let intent = state
            .last_intent
            .map(|i| i.as_str())
            .unwrap_or(Intent::Unknown.as_str());

        let mut builder = ReplyPromptBuilder::new()
            .with_transcript(&state.transcript())
            .with_user_message(&ctx.message)
            .with_intent(intent)
            .with_knowledge(ctx.knowledge.as_deref());
        if state.lead_just_captured() {
            builder = builder.with_post_signup_note();
        }
        let prompt = builder.build();

        let reply = match self.llm.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                let reply = text.trim().to_string();
                state.push_turn(Turn::assistant(&reply));
                reply
            }
            Ok(_) => {
                tracing::warn!("Empty generation result, using fallback reply");
                self.fallback_reply(state, ctx)
            }
            Err(e) => {
                tracing::warn!("Reply generation failed, using fallback reply: {}", e);
                self.fallback_reply(state, ctx)
            }
        };
        ctx.reply = Some(reply);
    }

    /// The staged CollectLead text (already in history) when present,
    /// otherwise the canned apology.
    fn fallback_reply(&self, state: &mut ConversationState, ctx: &TurnContext) -> String {
        match &ctx.staged_reply {
            Some(staged) => staged.clone(),
            None => {
                state.push_turn(Turn::assistant(FALLBACK_REPLY));
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// Parse the extractor's response as a lead record, tolerating code fences
/// and surrounding prose. Malformed output degrades to an all-null record.
fn parse_extraction(raw: &str) -> LeadExtraction {
    let candidate = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            tracing::debug!("Extraction response contained no JSON object");
            return LeadExtraction::default();
        }
    };

    match serde_json::from_str(candidate) {
        Ok(extraction) => extraction,
        Err(e) => {
            tracing::debug!("Malformed extraction JSON, using empty record: {}", e);
            LeadExtraction::default()
        }
    }
}
