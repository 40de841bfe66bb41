//! External integrations for the AutoStream support agent
//!
//! Currently the lead capture gateway (CRM webhook plus an in-process stub).

pub mod lead;

pub use lead::{LeadGateway, LeadReceipt, LeadRecord, StubLeadGateway, WebhookLeadGateway};

use thiserror::Error;

/// Integration errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// A required field was empty or missing. Signals a logic bug in the
    /// caller, which must only submit complete leads.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rejected by remote system: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::ConnectionFailed(err.to_string())
    }
}

impl From<ToolError> for autostream_core::Error {
    fn from(err: ToolError) -> Self {
        autostream_core::Error::Lead(err.to_string())
    }
}
