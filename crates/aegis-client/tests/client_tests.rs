// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-level tests for the HTTP gateway client against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aegis_client::HttpRecordGateway;
use aegis_core::{AegisError, RecordGateway, SubscriberDraft, SubscriberId, SubscriberPatch};

fn user_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": 5550001111i64,
        "accepted_terms": true,
        "subscription_tier": "free",
        "created_at": "2026-08-01T10:00:00Z"
    })
}

fn draft(name: &str) -> SubscriberDraft {
    SubscriberDraft {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: 5550001111,
        emergency_phone: None,
        home_address: None,
        accepted_terms: true,
        subscription_tier: "free".into(),
        subscription_expiration: None,
        last_known_location: None,
        is_agent: None,
        is_safe: None,
        profile_picture: None,
        device_ids: None,
    }
}

fn gateway(server: &MockServer) -> HttpRecordGateway {
    HttpRecordGateway::new(server.uri(), None, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_parses_users_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user_json("sub-1", "Ann"), user_json("sub-2", "Bob")]
        })))
        .mount(&server)
        .await;

    let users = gateway(&server).list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, SubscriberId("sub-1".into()));
    assert_eq!(users[1].name, "Bob");
}

#[tokio::test]
async fn create_posts_draft_and_returns_stored_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_partial_json(json!({"name": "Ann"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user": user_json("sub-9", "Ann")})),
        )
        .mount(&server)
        .await;

    let record = gateway(&server).create(&draft("Ann")).await.unwrap();
    assert_eq!(record.id, SubscriberId("sub-9".into()));
    assert!(record.created_at.is_some());
}

#[tokio::test]
async fn update_sends_id_and_partial_data() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/users"))
        .and(body_partial_json(
            json!({"id": "sub-1", "data": {"phone": 5559998888i64}}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user": user_json("sub-1", "Ann")})),
        )
        .mount(&server)
        .await;

    let patch = SubscriberPatch {
        phone: Some(5559998888),
        ..Default::default()
    };
    let record = gateway(&server)
        .update(&SubscriberId("sub-1".into()), &patch)
        .await
        .unwrap();
    assert_eq!(record.id, SubscriberId("sub-1".into()));
}

#[tokio::test]
async fn not_found_status_maps_to_not_found_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "no record with id ghost"})),
        )
        .mount(&server)
        .await;

    let err = gateway(&server)
        .update(&SubscriberId("ghost".into()), &SubscriberPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn validation_status_maps_to_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "name must not be empty"})),
        )
        .mount(&server)
        .await;

    let err = gateway(&server).create(&draft("Ann")).await.unwrap_err();
    match err {
        AegisError::Validation { message } => assert_eq!(message, "name must not be empty"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn backend_failure_maps_to_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
        .mount(&server)
        .await;

    let err = gateway(&server).list().await.unwrap_err();
    match err {
        AegisError::Transport { message, .. } => assert!(message.contains("db down")),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_round_trips_ok_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users"))
        .and(body_partial_json(json!({"id": "sub-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    gateway(&server)
        .delete(&SubscriberId("sub-1".into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .mount(&server)
        .await;

    let gateway = HttpRecordGateway::new(server.uri(), Some("s3cret"), Duration::from_secs(5)).unwrap();
    let users = gateway.list().await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"users": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let gateway = HttpRecordGateway::new(server.uri(), None, Duration::from_millis(50)).unwrap();
    let err = gateway.list().await.unwrap_err();
    assert!(matches!(err, AegisError::Transport { .. }));
}
