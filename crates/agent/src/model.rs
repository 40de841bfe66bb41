//! Local statistical intent model
//!
//! A pre-built example-utterance scorer standing in for a trained
//! bag-of-words classifier: each incoming message is scored against a fixed
//! set of labeled utterances by exact match, containment, and unicode-word
//! overlap. Deterministic and purely local; no network failure mode.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use autostream_core::Intent;

use crate::classifier::normalize;

/// Labeled training utterances
const TRAINING_DATA: &[(&str, Intent)] = &[
    // Greetings
    ("hi", Intent::Greeting),
    ("hello", Intent::Greeting),
    ("hey", Intent::Greeting),
    ("hey there", Intent::Greeting),
    ("good morning", Intent::Greeting),
    ("good evening", Intent::Greeting),
    ("good afternoon", Intent::Greeting),
    ("hi there", Intent::Greeting),
    ("hola", Intent::Greeting),
    ("hola amigo", Intent::Greeting),
    ("namaste", Intent::Greeting),
    ("yo", Intent::Greeting),
    ("what's up", Intent::Greeting),
    ("how's it going", Intent::Greeting),
    ("hey how are you", Intent::Greeting),
    // Product / pricing inquiries
    ("what are your plans", Intent::ProductInquiry),
    ("how much does it cost", Intent::ProductInquiry),
    ("tell me about pricing", Intent::ProductInquiry),
    ("what does your product do", Intent::ProductInquiry),
    ("what features do you have", Intent::ProductInquiry),
    ("difference between basic and pro", Intent::ProductInquiry),
    ("what is included in the pro plan", Intent::ProductInquiry),
    ("what are the benefits of your tool", Intent::ProductInquiry),
    ("how is this different from other tools", Intent::ProductInquiry),
    ("do you have a free trial", Intent::ProductInquiry),
    ("can you explain your pricing structure", Intent::ProductInquiry),
    ("what resolutions do you support", Intent::ProductInquiry),
    ("does it generate captions", Intent::ProductInquiry),
    ("is support available on all plans", Intent::ProductInquiry),
    // Soft interest / hedged language is still an inquiry
    ("i think this might be useful", Intent::ProductInquiry),
    ("this looks interesting", Intent::ProductInquiry),
    ("i am considering using this", Intent::ProductInquiry),
    ("it might be good for my linkedin", Intent::ProductInquiry),
    ("maybe i will use this for youtube", Intent::ProductInquiry),
    ("i am exploring options right now", Intent::ProductInquiry),
    ("hello i would like to know more about your product", Intent::ProductInquiry),
    ("good morning what is your pricing", Intent::ProductInquiry),
    // High-intent leads
    ("i want to buy", Intent::HighIntentLead),
    ("i want to sign up", Intent::HighIntentLead),
    ("i'm ready to purchase", Intent::HighIntentLead),
    ("i want the pro plan", Intent::HighIntentLead),
    ("i want to try for my youtube channel", Intent::HighIntentLead),
    ("how do i get started right now", Intent::HighIntentLead),
    ("i'm ready to get started", Intent::HighIntentLead),
    ("sign me up", Intent::HighIntentLead),
    ("i want to subscribe", Intent::HighIntentLead),
    ("help me register", Intent::HighIntentLead),
    ("i want to create an account", Intent::HighIntentLead),
    ("i want to upgrade to pro", Intent::HighIntentLead),
    ("i want to purchase a plan", Intent::HighIntentLead),
    ("i want to use this for my instagram channel", Intent::HighIntentLead),
    ("hello i would like to sign up for the pro plan", Intent::HighIntentLead),
    ("good evening how can i get started", Intent::HighIntentLead),
    ("i want to join now", Intent::HighIntentLead),
    ("i want to start today", Intent::HighIntentLead),
    ("i have decided to go with your product", Intent::HighIntentLead),
];

/// Local intent model
pub struct LocalIntentModel {
    examples: Vec<(String, Intent)>,
}

impl LocalIntentModel {
    /// Create the model over the built-in training utterances
    pub fn new() -> Self {
        Self {
            examples: TRAINING_DATA
                .iter()
                .map(|(text, intent)| (normalize(text), *intent))
                .collect(),
        }
    }

    /// Predict the best label with a confidence in [0, 1].
    ///
    /// `text` is expected to be normalized (lowercase, punctuation
    /// stripped). An unmatched message yields `(Intent::Unknown, 0.0)`.
    pub fn predict(&self, text: &str) -> (Intent, f32) {
        let text_words: HashSet<&str> = text.unicode_words().collect();

        let mut best = (Intent::Unknown, 0.0f32);
        for (example, intent) in &self.examples {
            let score = Self::score(text, &text_words, example);
            if score > best.1 {
                best = (*intent, score);
            }
        }
        best
    }

    /// Score one example against the message
    fn score(text: &str, text_words: &HashSet<&str>, example: &str) -> f32 {
        if text == example {
            return 1.0;
        }

        let mut score: f32 = 0.0;
        // Word-boundary containment: a short example like "yo" must not
        // match inside an unrelated word.
        if format!(" {} ", text).contains(&format!(" {} ", example)) {
            score = 0.9;
        }

        let example_words: HashSet<&str> = example.unicode_words().collect();
        let overlap = example_words.intersection(text_words).count();
        if overlap > 0 {
            let overlap_score = overlap as f32 / example_words.len().max(1) as f32;
            score = score.max(overlap_score * 0.8);
        }

        score
    }
}

impl Default for LocalIntentModel {
    fn default() -> Self {
        Self::new()
    }
}
