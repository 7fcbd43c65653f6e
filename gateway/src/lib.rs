//! HTTP adapters for marg's two remote collaborators.
//!
//! # Architecture
//!
//! - [`assistant`] - the AI assistant endpoint: free-text query in, a
//!   normalized [`GuideResponse`] out
//! - [`catalog`] - the curated guidance catalog: service listing and
//!   path-keyed detail lookup
//!
//! Both adapters share one hardened [`reqwest`] client and classify every
//! failure into a typed error before it crosses the crate boundary - a raw
//! transport error never reaches the session engine.

use std::sync::OnceLock;
use std::time::Duration;

use serde_json::Value;

pub mod assistant;
pub mod catalog;
mod wire;

pub use assistant::{AssistantGateway, GatewayError, GuideResponse, HttpAssistantGateway};
pub use catalog::{CatalogError, GuidanceCatalog, HttpGuidanceCatalog};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 4;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("Failed to build tuned HTTP client: {e}. Falling back to defaults.");
            reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("default HTTP client must build")
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Read an error-response body with a hard size cap so a misbehaving server
/// cannot balloon an error message.
pub(crate) async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Pull the human-readable message out of an error body.
///
/// The services speak FastAPI's `{"detail": "..."}` shape; `message` and a
/// bare JSON string are accepted as fallbacks. Non-JSON bodies yield `None`
/// and the caller falls back to a status-derived message.
pub(crate) fn extract_detail_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body.trim()).ok()?;
    payload
        .pointer("/detail")
        .and_then(Value::as_str)
        .or_else(|| payload.pointer("/message").and_then(Value::as_str))
        .or_else(|| payload.as_str())
        .map(ToString::to_string)
}

/// Join a relative API path onto the configured base URL.
///
/// The base is normalized to end with `/` so a base of
/// `http://host:8000/prefix` keeps its prefix under `Url::join`.
pub(crate) fn endpoint(base: &url::Url, path: &str) -> Result<url::Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base.join(path)
}
