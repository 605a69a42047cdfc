//! Integration tests for request execution and error classification.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hcloud_api::{
    ApiEndpoint, ApiRequest, ApiToken, Client, ClientConfig, ErrorCode, HttpError, HttpMethod,
};

fn test_client(uri: &str) -> Client {
    let config = ClientConfig::builder()
        .token(ApiToken::new("test-token").unwrap())
        .endpoint(ApiEndpoint::new(uri).unwrap())
        .build()
        .unwrap();
    Client::new(config)
}

#[tokio::test]
async fn test_requests_carry_bearer_token_and_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "servers": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let response = client.request(request).await.unwrap();

    assert!(response.is_ok());
}

#[tokio::test]
async fn test_structured_json_error_becomes_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "not_found", "message": "server with ID '42' not found"}
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers/42")
        .build()
        .unwrap();
    let err = client.request(request).await.unwrap_err();

    match err {
        HttpError::Api(api_err) => {
            assert_eq!(api_err.code, ErrorCode::NotFound);
            assert_eq!(api_err.message, "server with ID '42' not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_becomes_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string("<html>Service Unavailable</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let err = client.request(request).await.unwrap_err();

    assert!(matches!(err, HttpError::UnexpectedStatus { status: 503 }));
}

#[tokio::test]
async fn test_empty_error_envelope_becomes_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let err = client.request(request).await.unwrap_err();

    assert!(matches!(err, HttpError::UnexpectedStatus { status: 500 }));
}

#[tokio::test]
async fn test_rate_limit_headers_are_parsed_into_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "servers": [] }))
                .insert_header("RateLimit-Limit", "3600")
                .insert_header("RateLimit-Remaining", "2999")
                .insert_header("RateLimit-Reset", "1700000000"),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let response = client.request(request).await.unwrap();

    assert_eq!(response.meta.rate_limit.limit, 3600);
    assert_eq!(response.meta.rate_limit.remaining, 2999);
    assert!(response.meta.rate_limit.reset.is_some());
}

#[tokio::test]
async fn test_buffered_body_supports_repeated_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "servers": [] })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let response = client.request(request).await.unwrap();

    #[derive(serde::Deserialize)]
    struct Body {
        servers: Vec<serde_json::Value>,
    }

    let first: Body = response.json().unwrap();
    let second: Body = response.json().unwrap();
    assert!(first.servers.is_empty());
    assert!(second.servers.is_empty());
    assert_eq!(response.body(), response.body());
}

#[tokio::test]
async fn test_mismatched_payload_shape_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/servers/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "server": {"id": "not-a-number"} })),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client.servers().get_by_id(1).await.unwrap_err();

    assert!(matches!(err, HttpError::Decode(_)));
}

#[tokio::test]
async fn test_connection_failure_is_a_network_error() {
    // Nothing listens on this port.
    let client = test_client("http://127.0.0.1:9");
    let request = ApiRequest::builder(HttpMethod::Get, "/servers").build().unwrap();
    let err = client.request(request).await.unwrap_err();

    assert!(matches!(err, HttpError::Network(_)));
}
