//! Integration tests for the automation client using wiremock.
//!
//! These tests mock the secrets service to verify that the automation
//! client constructs the right request, deserializes the client list,
//! and surfaces API and parse failures with their diagnostics intact:
//!
//! - GET /automation/v2/clients: list_clients

use keywhiz_client::automation::AutomationClient;
use keywhiz_client::error::ClientError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates an automation client pointed at the given wiremock
/// server. No client identity; the mock speaks plain HTTP.
fn mock_client(server: &MockServer) -> AutomationClient {
    AutomationClient::with_base_url(&server.uri()).unwrap()
}

// ── list_clients ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_clients_returns_names_in_order() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!(["a", "b"])),
        )
        .mount(&server)
        .await;

    let names = client.list_clients().await.unwrap();
    assert_eq!(names, vec!["a", "b"], "order must match the response body");
}

#[tokio::test]
async fn list_clients_handles_empty_registry() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let names = client.list_clients().await.unwrap();
    assert!(names.is_empty(), "an empty registry is a valid response");
}

#[tokio::test]
async fn list_clients_preserves_large_listings() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    let expected: Vec<String> = (0..250).map(|i| format!("automation-client-{i}")).collect();
    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(expected)))
        .mount(&server)
        .await;

    let names = client.list_clients().await.unwrap();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn list_clients_rejects_malformed_json() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    // A proxy or error page can hand back HTML with a 200 status.
    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login required</html>"))
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Parse(_)),
        "malformed body should surface as a parse error, got: {err}"
    );
}

#[tokio::test]
async fn list_clients_rejects_wrong_json_shape() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    // Valid JSON, wrong shape: an object where an array of strings is
    // expected.
    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"clients": ["a"]})),
        )
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn list_clients_surfaces_api_error_with_body() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(r#"{"error":"client certificate not registered"}"#),
        )
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert!(
                body.contains("client certificate not registered"),
                "service diagnostics must survive, got: {body}"
            );
        }
        other => panic!("expected Api error, got: {other}"),
    }
}

#[tokio::test]
async fn list_clients_surfaces_server_errors() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    assert!(
        err.to_string().contains("500"),
        "error display should include the status, got: {err}"
    );
}

// ── transport characteristics ──────────────────────────────────────────

#[tokio::test]
async fn automation_requests_carry_no_xsrf_header() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/automation/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    client.list_clients().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0].headers.contains_key("x-xsrf-token"),
        "the automation pipeline has no XSRF interceptor"
    );
    assert!(
        !requests[0].headers.contains_key("cookie"),
        "the automation pipeline has no cookie jar"
    );
}

#[tokio::test]
async fn client_auth_flag_reports_mutual_tls() {
    let server = MockServer::start().await;
    let client = mock_client(&server);
    assert!(client.is_client_auth_enabled());
}
