//! Knowledge base loading and formatting

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::RagError;

/// A single plan attribute, e.g. `Price: $79/month`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A subscription plan with its attributes, in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Plan {
    /// Format the full plan as display text
    pub fn format(&self) -> String {
        let lines: Vec<String> = self
            .attributes
            .iter()
            .map(|a| format!("{}: {}", a.name, a.value))
            .collect();
        format!("{} details:\n{}", self.name, lines.join("\n"))
    }
}

/// Static product/policy knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Subscription plans, in display order
    pub plans: Vec<Plan>,
    /// Company policies (refunds, support)
    pub policies: Vec<String>,
}

impl KnowledgeBase {
    /// Load from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RagError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse from a JSON string
    pub fn from_json(raw: &str) -> Result<Self, RagError> {
        let kb: KnowledgeBase = serde_json::from_str(raw)?;
        tracing::debug!(
            "Loaded knowledge base with {} plans and {} policies",
            kb.plans.len(),
            kb.policies.len()
        );
        Ok(kb)
    }

    /// Built-in AutoStream knowledge base
    pub fn autostream() -> Self {
        let plan = |name: &str, attrs: &[(&str, &str)]| Plan {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|(n, v)| Attribute {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        };

        Self {
            plans: vec![
                plan(
                    "Basic Plan",
                    &[
                        ("Price", "$29/month"),
                        ("Limits", "10 videos per month"),
                        ("Quality", "Up to 1080p resolution"),
                        ("Additional Features", "Auto-captions, standard templates"),
                    ],
                ),
                plan(
                    "Pro Plan",
                    &[
                        ("Price", "$79/month"),
                        ("Limits", "Unlimited videos"),
                        ("Quality", "Up to 4K resolution"),
                        (
                            "Additional Features",
                            "Auto-captions, premium templates, priority rendering",
                        ),
                    ],
                ),
            ],
            policies: vec![
                "Full refund available within 14 days of purchase".to_string(),
                "Email support on all plans, with 24-hour response time".to_string(),
                "Priority chat support on the Pro plan".to_string(),
                "Cancel anytime; access continues until the end of the billing cycle".to_string(),
            ],
        }
    }

    /// Find a plan by a lowercase keyword, e.g. "basic" or "pro"
    pub fn plan_by_keyword(&self, keyword: &str) -> Option<&Plan> {
        self.plans
            .iter()
            .find(|p| p.name.to_lowercase().contains(keyword))
    }

    /// Format all plans as display text
    pub fn format_all_plans(&self) -> String {
        self.plans
            .iter()
            .map(Plan::format)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format company policies as display text
    pub fn format_policies(&self) -> String {
        format!("Company Policies:\n- {}", self.policies.join("\n- "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_knowledge_base() {
        let kb = KnowledgeBase::autostream();
        assert_eq!(kb.plans.len(), 2);
        assert!(kb.plan_by_keyword("pro").is_some());
        assert!(kb.plan_by_keyword("basic").is_some());
        assert!(kb.plan_by_keyword("enterprise").is_none());
    }

    #[test]
    fn test_plan_formatting() {
        let kb = KnowledgeBase::autostream();
        let pro = kb.plan_by_keyword("pro").unwrap();
        let text = pro.format();
        assert!(text.starts_with("Pro Plan details:"));
        assert!(text.contains("Price: $79/month"));
    }

    #[test]
    fn test_policy_formatting() {
        let kb = KnowledgeBase::autostream();
        let text = kb.format_policies();
        assert!(text.starts_with("Company Policies:"));
        assert!(text.contains("refund"));
    }

    #[test]
    fn test_load_from_file() {
        let kb = KnowledgeBase::autostream();
        let json = serde_json::to_string(&kb).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = KnowledgeBase::from_path(file.path()).unwrap();
        assert_eq!(loaded.plans.len(), kb.plans.len());
        assert_eq!(loaded.policies, kb.policies);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        let err = KnowledgeBase::from_path(file.path()).unwrap_err();
        assert!(matches!(err, RagError::Parse(_)));
    }
}
