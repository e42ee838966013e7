//! Full facade round trips against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `get` / `store` /
//! `update` / `destroy` over real HTTP through `ReqwestTransport`. Validates
//! that the wire format the request model emits is what the server parses,
//! and that real status codes classify as expected.
#![cfg(feature = "reqwest")]

use fetch_core::{ExpectedFormat, Fetch, FetchError, Overrides, ReqwestTransport, Status, Verb};
use serde_json::{json, Value};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn fetch() -> Fetch<ReqwestTransport> {
    Fetch::new(ReqwestTransport::new())
}

#[tokio::test]
async fn user_lifecycle() {
    let base = start_server().await;
    let fetch = fetch();

    // Step 1: create.
    let created = fetch
        .store(&format!("{base}/users"), &json!({"name": "Ann"}), None, ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.status, Status::Success);
    assert_eq!(created.data, json!({"id": 1, "name": "Ann"}));

    // Step 2: find by name; the query value travels JSON-quoted.
    let found = fetch
        .get(&format!("{base}/users"), &json!({"name": "Ann"}), ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.data, json!([{"id": 1, "name": "Ann"}]));

    // Step 3: update.
    let updated = fetch
        .update(
            &format!("{base}/users/1"),
            &json!({"name": "Bo", "email": "bo@example.com", "nickname": null}),
            None,
            ExpectedFormat::Json,
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.data, json!({"id": 1, "name": "Bo", "email": "bo@example.com"}));

    // Step 4: delete; the id lives in the route.
    let deleted = fetch
        .destroy(&format!("{base}/users/1"), &(), None, ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted.data, json!({"deleted": 1}));

    // Step 5: get after delete is an error envelope carrying the JSON body.
    let missing = fetch
        .get(&format!("{base}/users/1"), &(), ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(missing.status, Status::Error);
    assert_eq!(missing.data, json!({"error": "user not found"}));
}

#[tokio::test]
async fn echo_sees_default_headers_and_flat_body() {
    let base = start_server().await;
    let result = fetch()
        .store(
            &format!("{base}/echo"),
            &json!({"a": 1, "b": {"c": 2}, "skip": null}),
            None,
            ExpectedFormat::Json,
        )
        .await
        .unwrap()
        .unwrap();

    let echo = result.data;
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"], r#"a=1&b={"c":2}"#);
    assert_eq!(echo["content_type"], "application/x-www-form-urlencoded");
    assert_eq!(echo["accept"], "application/json");
}

#[tokio::test]
async fn echo_sees_json_quoted_query() {
    let base = start_server().await;
    let result = fetch()
        .get(&format!("{base}/echo"), &json!({"a": 1, "b": "x"}), ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.data["method"], "GET");
    assert_eq!(result.data["params"], json!([["a", "1"], ["b", "\"x\""]]));
    assert_eq!(result.data["body"], "");
}

#[tokio::test]
async fn delete_body_is_not_moved_to_query() {
    let base = start_server().await;
    let result = fetch()
        .run(
            Verb::parse_lossy("delete"),
            &format!("{base}/echo"),
            &json!({"id": 9}),
            None,
            ExpectedFormat::Json,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.data["method"], "DELETE");
    assert_eq!(result.data["query"], Value::Null);
    assert_eq!(result.data["body"], "id=9");
}

#[tokio::test]
async fn header_override_replaces_defaults() {
    let base = start_server().await;
    let overrides = Overrides::default()
        .headers(vec![("Content-Type".to_string(), "text/plain".to_string())]);
    let result = fetch()
        .update(
            &format!("{base}/echo"),
            &json!({"k": "v"}),
            Some(overrides),
            ExpectedFormat::Json,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.data["content_type"], "text/plain");
    assert_ne!(result.data["accept"], "application/json");
}

#[tokio::test]
async fn text_mode_returns_raw_body() {
    let base = start_server().await;
    let result = fetch()
        .get(&format!("{base}/text"), &(), ExpectedFormat::Text)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.status, Status::Success);
    assert_eq!(result.data, json!("plain text body"));
}

#[tokio::test]
async fn expecting_json_from_text_route_yields_none() {
    let base = start_server().await;
    let result = fetch()
        .get(&format!("{base}/text"), &(), ExpectedFormat::Json)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn server_error_is_classified_not_raised() {
    let base = start_server().await;
    let result = fetch()
        .destroy(&format!("{base}/status/500"), &(), None, ExpectedFormat::Json)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.status, Status::Error);
    assert_eq!(result.data, json!("status 500"));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let err = fetch()
        .get("http://127.0.0.1:1/", &(), ExpectedFormat::Json)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}
