mod common;

use axum::extract::RawQuery;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use common::{closed_origin, spawn_app, spawn_truncated_body};
use geo_task_rs::transport::{ApiError, HostClient, HostOptions, HttpHostClient, HttpMethod};
use geo_task_rs::SessionToken;

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn host_app() -> Router {
    Router::new()
        .route(
            "/api/user/current",
            get(|headers: HeaderMap, RawQuery(query): RawQuery| async move {
                Json(json!({
                    "query": query,
                    "session": headers
                        .get("x-metabase-session")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                }))
            }),
        )
        .route("/api/card", post(|Json(body): Json<Value>| async move { Json(body) }))
        .route("/api/plain", get(|| async { "pong" }))
        .route(
            "/api/broken",
            get(|| async { (StatusCode::BAD_REQUEST, "bad things") }),
        )
}

#[tokio::test]
async fn get_sends_payload_as_query_with_session() {
    let client = HttpHostClient::new(&spawn_app(host_app()), Some(SessionToken::new("host-session").unwrap())).unwrap();

    let value = client
        .request(
            HttpMethod::Get,
            "/api/user/current",
            payload(json!({"include": "groups", "limit": 3})),
            &HostOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(value["query"], "include=groups&limit=3");
    assert_eq!(value["session"], "host-session");
}

#[tokio::test]
async fn post_sends_payload_as_json_body() {
    let client = HttpHostClient::new(&spawn_app(host_app()), None).unwrap();

    let value = client
        .request(
            HttpMethod::Post,
            "/api/card",
            payload(json!({"name": "Revenue", "display": "line"})),
            &HostOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(value, json!({"name": "Revenue", "display": "line"}));
}

#[tokio::test]
async fn body_param_name_sends_only_that_key() {
    let client = HttpHostClient::new(&spawn_app(host_app()), None).unwrap();
    let options = HostOptions {
        body_param_name: Some("card".to_string()),
        no_event: true,
    };

    let value = client
        .request(
            HttpMethod::Post,
            "/api/card",
            payload(json!({"card": {"name": "Revenue"}, "ignored": 1})),
            &options,
        )
        .await
        .unwrap();

    assert_eq!(value, json!({"name": "Revenue"}));
}

#[tokio::test]
async fn non_json_success_body_comes_back_as_string() {
    let client = HttpHostClient::new(&spawn_app(host_app()), None).unwrap();

    let value = client
        .request(HttpMethod::Get, "/api/plain", Map::new(), &HostOptions::default())
        .await
        .unwrap();

    assert_eq!(value, json!("pong"));
}

#[tokio::test]
async fn error_status_becomes_transport_error() {
    let client = HttpHostClient::new(&spawn_app(host_app()), None).unwrap();

    let err = client
        .request(HttpMethod::Get, "/api/broken", Map::new(), &HostOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Transport {
            status: 400,
            data: "bad things".to_string(),
            message: "host API responded with HTTP 400".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let client = HttpHostClient::new(&closed_origin(), None).unwrap();

    let err = client
        .request(HttpMethod::Get, "/api/user/current", Map::new(), &HostOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn unreadable_success_body_is_a_network_error() {
    let client = HttpHostClient::new(&spawn_truncated_body(), None).unwrap();

    let err = client
        .request(HttpMethod::Get, "/api/user/current", Map::new(), &HostOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)), "{:?}", err);
}
