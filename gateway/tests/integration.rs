//! Integration tests for the HTTP adapters, driven by a mock server.
//!
//! These exercise the full path: URL building -> request -> status
//! classification -> wire decoding -> domain conversion.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use marg_gateway::{
    AssistantGateway, CatalogError, GatewayError, GuidanceCatalog, HttpAssistantGateway,
    HttpGuidanceCatalog,
};
use marg_types::QueryText;

fn base(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server URI parses")
}

fn guide_body() -> serde_json::Value {
    json!({
        "explanation": "PAN takes three steps.",
        "name": "PAN Card",
        "steps": [
            {"step_id": 1, "title": "Fill Form 49A", "description": "Fill the online form."},
            {"step_id": 2, "title": "Upload documents", "description": "Upload proofs.",
             "action_label": "Open portal", "link": "https://www.onlineservices.nsdl.com"},
            {"step_id": 3, "title": "Pay the fee", "description": "Pay online.", "details": "UPI works."}
        ],
        "checklist": ["Photograph", "Address proof"],
        "official_link": "https://www.onlineservices.nsdl.com"
    })
}

#[tokio::test]
async fn assistant_query_returns_normalized_guide() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .and(query_param("query", "apply for PAN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(guide_body()))
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(base(&server));
    let query = QueryText::new("apply for PAN").unwrap();
    let response = gateway.query(&query).await.unwrap();

    assert_eq!(response.explanation, "PAN takes three steps.");
    assert_eq!(response.name.as_deref(), Some("PAN Card"));
    assert_eq!(response.steps.len(), 3);
    assert_eq!(response.steps[0].id, 1);
    assert_eq!(response.steps[1].action_label.as_deref(), Some("Open portal"));
    assert_eq!(response.checklist.len(), 2);

    let spec = response.wizard_spec().expect("three steps make a wizard");
    assert_eq!(spec.steps().len(), 3);
}

#[tokio::test]
async fn assistant_reply_without_steps_has_no_wizard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "explanation": "Hello! Ask me about a government service.",
            "steps": [],
            "checklist": [],
            "official_link": "#"
        })))
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(base(&server));
    let query = QueryText::new("hello").unwrap();
    let response = gateway.query(&query).await.unwrap();

    assert!(response.steps.is_empty());
    assert!(response.wizard_spec().is_none());
}

#[tokio::test]
async fn assistant_non_2xx_carries_the_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "GUARDRAIL ALERT: Request refused."
        })))
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(base(&server));
    let query = QueryText::new("my pan number is ...").unwrap();
    let err = gateway.query(&query).await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "GUARDRAIL ALERT: Request refused.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn assistant_unreachable_server_is_a_network_error() {
    // Start and immediately drop a server so the port refuses connections.
    let dead_base = {
        let server = MockServer::start().await;
        base(&server)
    };

    let gateway = HttpAssistantGateway::new(dead_base);
    let query = QueryText::new("apply for PAN").unwrap();
    let err = gateway.query(&query).await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn assistant_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/explain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(base(&server));
    let query = QueryText::new("apply for PAN").unwrap();
    let err = gateway.query(&query).await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn catalog_lists_services_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "pan", "name": "PAN Card", "description": "Apply for PAN", "version": "1.2"},
            {"id": "voter-id", "name": "Voter ID", "description": "Register to vote", "version": "0.9"}
        ])))
        .mount(&server)
        .await;

    let catalog = HttpGuidanceCatalog::new(base(&server));
    let services = catalog.list_services().await.unwrap();

    assert_eq!(services.len(), 2);
    assert_eq!(services[0].id, "pan");
    assert_eq!(services[1].name, "Voter ID");
}

#[tokio::test]
async fn catalog_detail_normalizes_legacy_documents_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/voter-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "voter-id",
            "name": "Voter ID",
            "description": "Register to vote",
            "version": "0.9",
            "last_updated": "2024-11-02",
            "official_link": "https://voters.eci.gov.in",
            "steps": [
                {"step_id": 1, "title": "Form 6", "description": "Fill Form 6 online."}
            ],
            "documents_required": ["Passport photo", "Age proof"],
            "legal_disclaimer": "Guidance only."
        })))
        .mount(&server)
        .await;

    let catalog = HttpGuidanceCatalog::new(base(&server));
    let record = catalog.get_by_id("voter-id").await.unwrap();

    assert_eq!(record.checklist, vec!["Passport photo", "Age proof"]);
    assert_eq!(record.steps.len(), 1);
    assert_eq!(record.last_updated, "2024-11-02");

    let spec = record.wizard_spec().expect("record has a step");
    assert_eq!(spec.name(), Some("Voter ID"));
}

#[tokio::test]
async fn catalog_404_surfaces_the_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/xyz"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Service not found"})),
        )
        .mount(&server)
        .await;

    let catalog = HttpGuidanceCatalog::new(base(&server));
    let err = catalog.get_by_id("xyz").await.unwrap_err();

    match err {
        CatalogError::NotFound(message) => assert_eq!(message, "Service not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_server_error_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/pan"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let catalog = HttpGuidanceCatalog::new(base(&server));
    let err = catalog.get_by_id("pan").await.unwrap_err();
    assert!(matches!(err, CatalogError::Fetch(_)));
}
