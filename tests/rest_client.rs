//! HTTP transport tests against a local mock server
//!
//! Exercises [`RestClient`] end to end over loopback HTTP:
//! - Endpoint routing and headers of both request kinds
//! - Response envelope parsing
//! - Error mapping for HTTP failures and malformed bodies

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ais_client::document::PreparedDocument;
use ais_client::rest::builder;
use ais_client::{
    AisError, DigestAlgorithm, DocumentSource, RestClient, RestConfig, SignatureTransport,
    SigningIntent,
};

fn rest_client(server: &MockServer) -> RestClient {
    let config = RestConfig::new(
        format!("{}/sign", server.uri()),
        format!("{}/pending", server.uri()),
    );
    RestClient::new(config).unwrap()
}

fn sign_envelope() -> ais_client::rest::model::SignRequestEnvelope {
    let intent = SigningIntent::static_signature(
        vec![DocumentSource::new("contract.pdf", "contract.p7s")],
        "ais-identity",
    );
    let prepared = vec![PreparedDocument {
        document_id: "DOC-1".to_string(),
        digest_algorithm: DigestAlgorithm::Sha512,
        digest_base64: "aGFzaA==".to_string(),
        reserved_size: 30_000,
    }];
    builder::build_sign_request(&intent, &prepared)
}

// =============================================================================
// Endpoint Routing and Headers
// =============================================================================

#[tokio::test]
async fn test_sign_request_posts_json_to_the_sign_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "SignRequest": {
                "@Profile": "http://ais.swisscom.ch/1.1",
                "OptionalInputs": { "ClaimedIdentity": { "Name": "ais-identity" } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "SignResponse": {
                "Result": { "ResultMajor": "urn:oasis:names:tc:dss:1.0:resultmajor:Success" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let response = client
        .request_signature(&sign_envelope(), "trace-1")
        .await
        .unwrap();

    assert!(response.is_major_success());
}

#[tokio::test]
async fn test_pending_request_posts_to_the_pending_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pending"))
        .and(body_partial_json(json!({
            "async.PendingRequest": {
                "OptionalInputs": { "async.ResponseID": "resp-1" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "SignResponse": {
                "Result": {
                    "ResultMajor":
                        "urn:oasis:names:tc:dss:1.0:profiles:asynchronousprocessing:resultmajor:Pending"
                },
                "OptionalOutputs": { "async.ResponseID": "resp-2" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let intent = SigningIntent::static_signature(
        vec![DocumentSource::new("contract.pdf", "contract.p7s")],
        "ais-identity",
    );
    let client = rest_client(&server);
    let response = client
        .poll_signature_status(&builder::build_pending_request("resp-1", &intent), "trace-1")
        .await
        .unwrap();

    assert!(response.is_pending());
    assert_eq!(response.async_response_id(), Some("resp-2"));
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_http_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid request"))
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let err = client
        .request_signature(&sign_envelope(), "trace-1")
        .await
        .unwrap_err();

    match err {
        AisError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Invalid request");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_response_body_is_a_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_string("surprise: not json"))
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let err = client
        .request_signature(&sign_envelope(), "trace-1")
        .await
        .unwrap_err();

    assert!(matches!(err, AisError::Json(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    // Port 1 is closed on loopback, the connection is refused immediately.
    let config = RestConfig::new("http://127.0.0.1:1/sign", "http://127.0.0.1:1/pending");
    let client = RestClient::new(config).unwrap();

    let err = client
        .request_signature(&sign_envelope(), "trace-1")
        .await
        .unwrap_err();

    assert!(matches!(err, AisError::Transport { .. }));
}
