//! Keyword-routed knowledge base retriever

use std::collections::HashSet;

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use autostream_core::{KnowledgeRetriever, Result};

use crate::KnowledgeBase;

/// Query terms that signal generic plan/pricing interest
const GENERIC_PLAN_TERMS: &[&str] = &["plan", "pricing", "subscription"];

/// Query terms that map onto plan attributes
const ATTRIBUTE_TERMS: &[&str] = &[
    "price", "cost", "limit", "video", "quality", "resolution", "feature", "caption",
];

/// Query terms that map onto company policies
const POLICY_TERMS: &[&str] = &["refund", "support"];

/// Knowledge base retriever
///
/// Routes a query to policy text, a specific plan, or the full plan list
/// based on the terms it mentions. Returns empty text when no term matches.
pub struct KbRetriever {
    kb: KnowledgeBase,
}

impl KbRetriever {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Normalize the query into a set of lemmatized lowercase words
    fn lemmas(query: &str) -> HashSet<String> {
        query
            .to_lowercase()
            .unicode_words()
            .map(Self::lemma)
            .collect()
    }

    /// Light lemmatization: strip a plural "s" suffix
    fn lemma(word: &str) -> String {
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            word[..word.len() - 1].to_string()
        } else {
            word.to_string()
        }
    }

    fn lookup(&self, query: &str) -> String {
        let lemmas = Self::lemmas(query);
        let contains_any = |terms: &[&str]| terms.iter().any(|t| lemmas.contains(*t));

        // Policies take precedence: refund/support questions should never
        // be answered with plan pricing.
        if contains_any(POLICY_TERMS) {
            return self.kb.format_policies();
        }

        // Explicit plan mention gets the full plan.
        let plan = if lemmas.contains("basic") {
            self.kb.plan_by_keyword("basic")
        } else if lemmas.contains("pro") {
            self.kb.plan_by_keyword("pro")
        } else {
            None
        };
        if let Some(plan) = plan {
            return plan.format();
        }

        // Generic plan language or any attribute mention gets both plans in
        // full, so the answer never loses context.
        if contains_any(GENERIC_PLAN_TERMS) || contains_any(ATTRIBUTE_TERMS) {
            return self.kb.format_all_plans();
        }

        String::new()
    }
}

#[async_trait]
impl KnowledgeRetriever for KbRetriever {
    async fn retrieve(&self, query: &str) -> Result<String> {
        let result = self.lookup(query);
        if result.is_empty() {
            tracing::debug!("No knowledge base match for query");
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "knowledge-base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> KbRetriever {
        KbRetriever::new(KnowledgeBase::autostream())
    }

    #[tokio::test]
    async fn test_explicit_plan_lookup() {
        let result = retriever()
            .retrieve("What is the price of the Pro plan?")
            .await
            .unwrap();
        assert!(result.starts_with("Pro Plan details:"));
        assert!(result.contains("$79/month"));
    }

    #[tokio::test]
    async fn test_generic_plan_lookup_returns_both() {
        let result = retriever().retrieve("Tell me about your plans").await.unwrap();
        assert!(result.contains("Basic Plan details:"));
        assert!(result.contains("Pro Plan details:"));
    }

    #[tokio::test]
    async fn test_attribute_lookup_returns_both_plans() {
        let result = retriever()
            .retrieve("What resolutions do you support for videos?")
            .await
            .unwrap();
        // "support" routes to policies before attributes are considered
        assert!(result.starts_with("Company Policies:"));

        let result = retriever()
            .retrieve("What video quality do I get?")
            .await
            .unwrap();
        assert!(result.contains("Basic Plan details:"));
        assert!(result.contains("Pro Plan details:"));
    }

    #[tokio::test]
    async fn test_policy_lookup() {
        let result = retriever().retrieve("How can I get a refund?").await.unwrap();
        assert!(result.starts_with("Company Policies:"));
        assert!(result.contains("14 days"));
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let result = retriever().retrieve("Tell me a joke").await.unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_lemmatization() {
        assert_eq!(KbRetriever::lemma("plans"), "plan");
        assert_eq!(KbRetriever::lemma("features"), "feature");
        assert_eq!(KbRetriever::lemma("limits"), "limit");
        // Short words and double-s words are left alone
        assert_eq!(KbRetriever::lemma("les"), "les");
        assert_eq!(KbRetriever::lemma("class"), "class");
    }

    #[test]
    fn test_punctuation_is_ignored() {
        let lemmas = KbRetriever::lemmas("Pricing?! (for the PRO plan)");
        assert!(lemmas.contains("pricing"));
        assert!(lemmas.contains("pro"));
        assert!(lemmas.contains("plan"));
    }
}
