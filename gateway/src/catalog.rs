//! Guidance catalog lookup: service listing and path-keyed detail fetch.

use async_trait::async_trait;
use url::Url;

use marg_types::{ServiceRecord, ServiceSummary};

use crate::wire::ServiceRecordWire;
use crate::{endpoint, extract_detail_message, http_client, read_capped_error_body};

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// The requested id does not exist. Carries the service's own message
    /// so the page can show it verbatim.
    #[error("{0}")]
    NotFound(String),
    /// Any other failure: transport, non-2xx, or an unreadable body.
    #[error("could not load service data: {0}")]
    Fetch(String),
}

#[async_trait]
pub trait GuidanceCatalog: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceSummary>, CatalogError>;
    async fn get_by_id(&self, id: &str) -> Result<ServiceRecord, CatalogError>;
}

/// HTTP implementation against `GET {base}/api/services[/{id}]`.
#[derive(Debug, Clone)]
pub struct HttpGuidanceCatalog {
    base: Url,
}

impl HttpGuidanceCatalog {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, CatalogError> {
        let url = endpoint(&self.base, path)
            .map_err(|e| CatalogError::Fetch(format!("bad catalog URL: {e}")))?;
        http_client()
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))
    }
}

#[async_trait]
impl GuidanceCatalog for HttpGuidanceCatalog {
    async fn list_services(&self) -> Result<Vec<ServiceSummary>, CatalogError> {
        let response = self.get("api/services").await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Service listing failed");
            return Err(CatalogError::Fetch(format!("listing failed ({status})")));
        }
        response
            .json()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))
    }

    async fn get_by_id(&self, id: &str) -> Result<ServiceRecord, CatalogError> {
        let response = self.get(&format!("api/services/{id}")).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let body = read_capped_error_body(response).await;
            let message =
                extract_detail_message(&body).unwrap_or_else(|| "Service not found".to_string());
            tracing::debug!(id, "Service id not in catalog");
            return Err(CatalogError::NotFound(message));
        }
        if !status.is_success() {
            tracing::warn!(%status, id, "Service detail fetch failed");
            return Err(CatalogError::Fetch(format!("detail fetch failed ({status})")));
        }
        let wire: ServiceRecordWire = response
            .json()
            .await
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        Ok(wire.into_record())
    }
}
