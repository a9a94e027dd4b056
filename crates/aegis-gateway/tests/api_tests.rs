// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the /api/users wire contract, driving the router
//! directly with tower's oneshot against a temp SQLite store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use aegis_config::model::StorageConfig;
use aegis_gateway::{build_router, AuthConfig, GatewayState};
use aegis_storage::SubscriberStore;

async fn test_state(dir: &TempDir, bearer_token: Option<&str>) -> GatewayState {
    let db_path = dir.path().join("api.db");
    let store = SubscriberStore::open(&StorageConfig {
        database_path: db_path.to_str().unwrap().to_string(),
        wal_mode: true,
    })
    .await
    .unwrap();
    GatewayState::new(
        Arc::new(store),
        AuthConfig {
            bearer_token: bearer_token.map(str::to_string),
        },
    )
}

fn draft_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": 5550001111i64,
        "accepted_terms": true,
        "subscription_tier": "free"
    })
}

async fn send(state: &GatewayState, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn json_request(method: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, None).await;

    let (status, body) = send(&state, json_request("POST", draft_body("Ann", "ann@x.com"))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["name"], "Ann");
    assert!(body["user"]["created_at"].is_string());

    let (status, body) = send(
        &state,
        Request::builder()
            .uri("/api/users")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], Value::String(id));
}

#[tokio::test]
async fn invalid_draft_is_rejected_with_422() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, None).await;

    let (status, body) = send(
        &state,
        json_request("POST", draft_body("Ann", "not-an-address")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn patch_merges_fields_and_reports_unknown_ids() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, None).await;

    let (_, body) = send(&state, json_request("POST", draft_body("Ann", "ann@x.com"))).await;
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &state,
        json_request("PATCH", json!({"id": id, "data": {"phone": 5559998888i64}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["phone"], 5559998888i64);
    assert_eq!(body["user"]["name"], "Ann");

    // Missing id -> 400.
    let (status, body) = send(
        &state,
        json_request("PATCH", json!({"data": {"phone": 1i64}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "id required");

    // Unknown id -> 404.
    let (status, _) = send(
        &state,
        json_request("PATCH", json!({"id": "ghost", "data": {"phone": 1i64}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_and_reports_unknown_ids() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, None).await;

    let (_, body) = send(&state, json_request("POST", draft_body("Ann", "ann@x.com"))).await;
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&state, json_request("DELETE", json!({"id": id}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = send(&state, json_request("DELETE", json!({"id": id}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&state, json_request("DELETE", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_auth_guards_api_but_not_health() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, Some("s3cret")).await;

    // No token -> 401.
    let (status, _) = send(
        &state,
        Request::builder()
            .uri("/api/users")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct token -> 200.
    let (status, _) = send(
        &state,
        Request::builder()
            .uri("/api/users")
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Health stays public.
    let (status, body) = send(
        &state,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
