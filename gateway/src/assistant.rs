//! Assistant gateway: free-text query in, structured guidance out.

use async_trait::async_trait;
use url::Url;

use marg_types::{QueryText, Step, WizardSpec};

use crate::wire::GuideResponseWire;
use crate::{endpoint, extract_detail_message, http_client, read_capped_error_body};

/// Normalized assistant reply.
///
/// `steps` and `checklist` may be empty - a conversational answer with no
/// procedure attached is a valid reply.
#[derive(Debug, Clone)]
pub struct GuideResponse {
    pub explanation: String,
    pub name: Option<String>,
    pub steps: Vec<Step>,
    pub checklist: Vec<String>,
    pub official_link: String,
}

impl GuideResponse {
    /// Wizard content for this reply, or `None` when there are no steps.
    #[must_use]
    pub fn wizard_spec(&self) -> Option<WizardSpec> {
        WizardSpec::new(
            self.name.clone(),
            self.steps.clone(),
            self.checklist.clone(),
            self.official_link.clone(),
        )
        .ok()
    }
}

/// Everything that can go wrong talking to the assistant, classified before
/// it crosses the crate boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure: connect, TLS, or body read.
    #[error("could not reach the assistant: {0}")]
    Network(String),
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// A 2xx reply whose body does not match the contract.
    #[error("the assistant sent an unreadable reply: {0}")]
    Decode(String),
}

#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn query(&self, query: &QueryText) -> Result<GuideResponse, GatewayError>;
}

/// HTTP implementation against `POST {base}/api/explain?query=...`.
#[derive(Debug, Clone)]
pub struct HttpAssistantGateway {
    base: Url,
}

impl HttpAssistantGateway {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

#[async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn query(&self, query: &QueryText) -> Result<GuideResponse, GatewayError> {
        let url = endpoint(&self.base, "api/explain")
            .map_err(|e| GatewayError::Network(format!("bad assistant URL: {e}")))?;

        tracing::debug!(query_chars = query.as_str().len(), "Submitting assistant query");

        let response = http_client()
            .post(url)
            .query(&[("query", query.as_str())])
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            let message = extract_detail_message(&body)
                .unwrap_or_else(|| format!("assistant request failed ({status})"));
            tracing::warn!(%status, "Assistant query rejected");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let wire: GuideResponseWire = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(wire.into_response())
    }
}
