use accessorize::edit::FAILURE_PREFIX;
use accessorize::prelude::*;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash-image:generateContent";

fn client_for(server: &MockServer) -> EditClient {
    EditClient::builder()
        .api_key("test-api-key")
        .base_url(server.uri())
        .build()
        .unwrap()
}

fn sample_image() -> EncodedImage {
    encode_bytes(b"\x89PNG\r\n\x1a\nfake-png", "image/png").unwrap()
}

async fn mount_response(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sends_image_then_instruction_with_image_modality() {
    let server = MockServer::start().await;
    let image = sample_image();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": image.data() } },
                    { "text": "Add sunglasses" }
                ]
            }],
            "generationConfig": { "responseModalities": ["IMAGE"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "AAAA" } }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let edited = client_for(&server)
        .transform(&image, "Add sunglasses")
        .await
        .unwrap();

    assert_eq!(edited.data(), "AAAA");
    assert_eq!(edited.mime_type(), "image/png");
}

#[tokio::test]
async fn first_image_part_wins_over_preceding_text() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "ok" },
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                    { "inlineData": { "mimeType": "image/png", "data": "BBBB" } }
                ] }
            }]
        }),
    )
    .await;

    let edited = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap();

    assert_eq!(edited.data(), "AAAA");
}

#[tokio::test]
async fn empty_candidates_is_no_image_failure() {
    let server = MockServer::start().await;
    mount_response(&server, json!({ "candidates": [] })).await;

    let failure = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(failure.is_empty_result());
    assert!(failure.message().starts_with(FAILURE_PREFIX));
    assert!(failure.message().contains("no image data found"));
}

#[tokio::test]
async fn text_only_response_is_failure() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        }),
    )
    .await;

    let failure = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(failure.is_empty_result());
}

#[tokio::test]
async fn blank_instruction_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .transform(&sample_image(), "  ")
        .await
        .unwrap_err();

    assert!(matches!(
        failure.cause(),
        AccessorizeError::InvalidRequest(_)
    ));
}

#[tokio::test]
async fn unauthorized_maps_to_auth_cause() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(matches!(failure.cause(), AccessorizeError::Auth(m) if m == "API key not valid"));
    assert_eq!(
        failure.message(),
        "Failed to edit image: authentication failed: API key not valid"
    );
    assert!(!failure.is_empty_result());
}

#[tokio::test]
async fn server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(matches!(
        failure.cause(),
        AccessorizeError::Api { status: 503, message } if message == "overloaded"
    ));
}

#[tokio::test]
async fn malformed_body_is_json_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(failure.message().starts_with("Failed to edit image: JSON error"));
    assert!(matches!(failure.cause(), AccessorizeError::Json(_)));
    assert!(!failure.cause().is_retryable());
    assert!(!failure.is_empty_result());
}

#[tokio::test]
async fn connection_failure_is_network_failure() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = EditClient::builder()
        .api_key("test-api-key")
        .base_url(format!("http://{}", addr))
        .build()
        .unwrap();

    let failure = client
        .transform(&sample_image(), "Add sunglasses")
        .await
        .unwrap_err();

    assert!(matches!(failure.cause(), AccessorizeError::Network(_)));
    assert!(failure.message().starts_with("Failed to edit image: network error"));
    assert!(failure.cause().is_retryable());
}

#[tokio::test]
async fn overlapping_transforms_resolve_independently() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{}, { "text": "slow" }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(json!({
                    "candidates": [{ "content": { "parts": [{ "inlineData": { "data": "AAAA" } }] } }]
                })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{}, { "text": "fast" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let image = sample_image();
    let (slow, fast) = tokio::join!(
        client.transform(&image, "slow"),
        client.transform(&image, "fast"),
    );

    assert_eq!(slow.unwrap().data(), "AAAA");
    assert!(fast.unwrap_err().is_empty_result());
}

#[tokio::test]
async fn health_check_reports_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/gemini-2.5-flash-image"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server).health_check().await.unwrap_err();
    assert!(matches!(err, AccessorizeError::Auth(_)));
}

#[tokio::test]
async fn health_check_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/gemini-2.5-flash-image"))
        .and(header("x-goog-api-key", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-2.5-flash-image" })))
        .mount(&server)
        .await;

    assert!(client_for(&server).health_check().await.is_ok());
}
