//! Cascading intent classification
//!
//! Three strategies, evaluated in order, first match wins:
//! 1. Keyword/rule pass (whole-word matching over priority-ordered sets)
//! 2. Local statistical model (accepted above a confidence threshold)
//! 3. Generative fallback (constrained one-word-label prompt)
//!
//! The generative fallback never raises past the classifier boundary; on
//! service failure the message is labeled unknown and handled as small talk.

use std::sync::Arc;

use autostream_config::constants::classifier::CONFIDENCE_THRESHOLD;
use autostream_core::{Intent, LanguageModel};
use autostream_llm::classification_prompt;

use crate::model::LocalIntentModel;

/// Keywords signaling signup/purchase interest. Checked first.
const HIGH_INTENT_KEYWORDS: &[&str] = &[
    "sign up",
    "subscribe",
    "buy",
    "purchase",
    "get started",
    "i want the pro plan",
    "i want to try",
    "ready to",
    "create account",
    "register",
];

/// Keywords signaling product/pricing questions. Checked second.
const INQUIRY_KEYWORDS: &[&str] = &[
    "price",
    "pricing",
    "plan",
    "plans",
    "cost",
    "features",
    "what do you offer",
    "resolution",
    "limits",
    "refund",
    "support",
    "basic",
    "pro",
];

/// Greeting keywords. Checked last.
const GREETING_KEYWORDS: &[&str] = &["hi", "hello", "hey", "good morning", "good evening"];

/// Normalize text for matching: lowercase, strip punctuation, collapse
/// whitespace.
pub fn normalize(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word phrase containment. Substring matches inside larger words do
/// not count ("support" must not match inside an unrelated word).
fn contains_phrase(text: &str, phrase: &str) -> bool {
    format!(" {} ", text).contains(&format!(" {} ", phrase))
}

/// Cascading intent classifier
pub struct IntentClassifier {
    model: LocalIntentModel,
    llm: Arc<dyn LanguageModel>,
    threshold: f32,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            model: LocalIntentModel::new(),
            llm,
            threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// Override the local-model confidence threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Classify a user message into one intent label
    pub async fn classify(&self, message: &str) -> Intent {
        let text = normalize(message);

        // Local strategies in priority order; first Some wins.
        let passes: [fn(&Self, &str) -> Option<Intent>; 2] =
            [Self::keyword_pass, Self::model_pass];
        for pass in passes {
            if let Some(intent) = pass(self, &text) {
                tracing::debug!(intent = %intent, "Intent resolved locally");
                return intent;
            }
        }

        self.generative_pass(message).await
    }

    /// Whole-word keyword matching, high intent before inquiry before
    /// greeting
    fn keyword_pass(&self, text: &str) -> Option<Intent> {
        let sets = [
            (HIGH_INTENT_KEYWORDS, Intent::HighIntentLead),
            (INQUIRY_KEYWORDS, Intent::ProductInquiry),
            (GREETING_KEYWORDS, Intent::Greeting),
        ];
        for (keywords, intent) in sets {
            if keywords.iter().any(|k| contains_phrase(text, k)) {
                return Some(intent);
            }
        }
        None
    }

    /// Local model pass, accepted only above the confidence threshold
    fn model_pass(&self, text: &str) -> Option<Intent> {
        let (intent, confidence) = self.model.predict(text);
        if intent != Intent::Unknown && confidence >= self.threshold {
            tracing::debug!(intent = %intent, confidence, "Local model accepted");
            Some(intent)
        } else {
            tracing::debug!(confidence, "Local model below threshold");
            None
        }
    }

    /// Generative fallback. Returns `Intent::Unknown` on service failure or
    /// an out-of-taxonomy label; never propagates errors.
    async fn generative_pass(&self, message: &str) -> Intent {
        let prompt = classification_prompt(message);
        match self.llm.generate(&prompt).await {
            Ok(raw) => {
                let label = raw.split_whitespace().next().unwrap_or_default();
                match Intent::parse_label(label) {
                    Some(intent) => intent,
                    None => {
                        tracing::debug!(label, "Fallback returned out-of-taxonomy label");
                        Intent::Unknown
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Fallback classification failed, defaulting to unknown: {}", e);
                Intent::Unknown
            }
        }
    }
}
