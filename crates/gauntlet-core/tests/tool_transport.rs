//! HTTP tool-server transport tests.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gauntlet_core::errors::ToolError;
use gauntlet_core::tool::{HttpToolServer, ToolTransport};

fn server_client(server: &MockServer) -> HttpToolServer {
    HttpToolServer::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_tools_decodes_declarations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "execute-program",
                "description": "Run a program in the sandbox",
                "input_schema": {
                    "type": "object",
                    "properties": {"program": {"type": "string"}},
                    "required": ["program"]
                }
            }
        ])))
        .mount(&server)
        .await;

    let tools = server_client(&server)
        .list_tools(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "execute-program");
    assert_eq!(tools[0].input_schema["type"], json!("object"));
}

#[tokio::test]
async fn call_tool_round_trips_name_and_opaque_input() {
    let server = MockServer::start().await;
    let input = json!({"program": "print(6*7)", "timeout_secs": 5});
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .and(body_json(json!({"name": "execute-program", "input": input})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"output": "42\n", "is_error": false})),
        )
        .mount(&server)
        .await;

    let reply = server_client(&server)
        .call_tool("execute-program", &input, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(reply.output, "42\n");
    assert!(!reply.is_error);
}

#[tokio::test]
async fn tool_reported_failure_is_not_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": "failed to execute program: timeout",
            "is_error": true
        })))
        .mount(&server)
        .await;

    let reply = server_client(&server)
        .call_tool("execute-program", &json!({}), &CancellationToken::new())
        .await
        .unwrap();
    assert!(reply.is_error);
    assert!(reply.output.contains("timeout"));
}

#[tokio::test]
async fn non_2xx_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tools/call"))
        .respond_with(ResponseTemplate::new(500).set_body_string("broken"))
        .mount(&server)
        .await;

    let err = server_client(&server)
        .call_tool("execute-program", &json!({}), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Server { status: 500, .. }));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client =
        HttpToolServer::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
    let tools = client.list_tools(&CancellationToken::new()).await.unwrap();
    assert!(tools.is_empty());
}
