//! Lead capture gateway
//!
//! Sends captured lead details to a CRM webhook. A stub implementation
//! records leads in-process for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::ToolError;

/// A fully collected lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Lead's name
    pub name: String,
    /// Lead's email
    pub email: String,
    /// Platform of interest (LinkedIn, YouTube, ...)
    pub platform: String,
}

impl LeadRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            platform: platform.into(),
        }
    }

    /// Validate that every field is present.
    ///
    /// Callers must only submit complete leads; an empty field here is an
    /// invariant violation, not a user-facing condition.
    pub fn validate(&self) -> Result<(), ToolError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("platform", &self.platform),
        ] {
            if value.trim().is_empty() {
                return Err(ToolError::Validation(format!("missing field: {}", field)));
            }
        }
        Ok(())
    }
}

/// Confirmation returned by the gateway after a successful capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub status: String,
    pub lead: LeadRecord,
    pub captured_at: DateTime<Utc>,
}

impl LeadReceipt {
    fn accepted(lead: LeadRecord) -> Self {
        Self {
            status: "success".to_string(),
            lead,
            captured_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for LeadReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "status: {}, name: {}, email: {}, platform: {}",
            self.status, self.lead.name, self.lead.email, self.lead.platform
        )
    }
}

/// Lead capture gateway
///
/// Implement this trait to integrate with your CRM system.
#[async_trait]
pub trait LeadGateway: Send + Sync {
    /// Submit a complete lead. Fails with [`ToolError::Validation`] when
    /// any field is empty.
    async fn submit(&self, lead: &LeadRecord) -> Result<LeadReceipt, ToolError>;

    /// Gateway name for logging
    fn name(&self) -> &str;
}

/// Webhook-backed gateway posting leads as JSON
pub struct WebhookLeadGateway {
    client: reqwest::Client,
    url: String,
}

impl WebhookLeadGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LeadGateway for WebhookLeadGateway {
    async fn submit(&self, lead: &LeadRecord) -> Result<LeadReceipt, ToolError> {
        lead.validate()?;

        let response = self.client.post(&self.url).json(lead).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Rejected(format!("{}: {}", status, body)));
        }

        tracing::info!("Lead submitted to CRM webhook");
        Ok(LeadReceipt::accepted(lead.clone()))
    }

    fn name(&self) -> &str {
        "crm-webhook"
    }
}

/// In-process gateway recording captured leads
///
/// Used in development and tests; exposes the captured leads for
/// inspection.
#[derive(Default)]
pub struct StubLeadGateway {
    captured: Mutex<Vec<LeadRecord>>,
}

impl StubLeadGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leads captured so far
    pub fn captured(&self) -> Vec<LeadRecord> {
        self.captured.lock().clone()
    }
}

#[async_trait]
impl LeadGateway for StubLeadGateway {
    async fn submit(&self, lead: &LeadRecord) -> Result<LeadReceipt, ToolError> {
        lead.validate()?;

        self.captured.lock().push(lead.clone());
        tracing::info!(name = %lead.name, platform = %lead.platform, "Lead captured");
        Ok(LeadReceipt::accepted(lead.clone()))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_captures_lead() {
        let gateway = StubLeadGateway::new();
        let lead = LeadRecord::new("Alice", "alice@example.com", "YouTube");

        let receipt = gateway.submit(&lead).await.unwrap();
        assert_eq!(receipt.status, "success");
        assert_eq!(gateway.captured(), vec![lead]);
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_field() {
        let gateway = StubLeadGateway::new();

        for lead in [
            LeadRecord::new("", "alice@example.com", "YouTube"),
            LeadRecord::new("Alice", "  ", "YouTube"),
            LeadRecord::new("Alice", "alice@example.com", ""),
        ] {
            let err = gateway.submit(&lead).await.unwrap_err();
            assert!(matches!(err, ToolError::Validation(_)));
        }
        assert!(gateway.captured().is_empty());
    }

    #[test]
    fn test_receipt_display() {
        let receipt = LeadReceipt::accepted(LeadRecord::new("Alice", "alice@example.com", "YouTube"));
        let text = receipt.to_string();
        assert!(text.contains("status: success"));
        assert!(text.contains("alice@example.com"));
    }
}
