// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the record store REST API.
//!
//! Handles GET/POST/PATCH/DELETE on `/api/users` plus the public
//! `/health` probe. Error bodies are always `{"error": "..."}`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use aegis_core::{AegisError, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch};

use crate::server::GatewayState;

/// Response body for GET /api/users.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    /// Every subscriber record, newest first.
    pub users: Vec<Subscriber>,
}

/// Response body for POST/PATCH /api/users.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The stored record after the mutation.
    pub user: Subscriber,
}

/// Request body for PATCH /api/users.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// Target record id.
    #[serde(default)]
    pub id: Option<String>,
    /// Fields to change; everything absent is retained.
    #[serde(default)]
    pub data: SubscriberPatch,
}

/// Request body for DELETE /api/users.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// Target record id.
    #[serde(default)]
    pub id: Option<String>,
}

/// Response body for DELETE /api/users.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a store failure onto the wire contract.
fn map_store_error(err: AegisError) -> Response {
    match err {
        AegisError::NotFound { id } => {
            error_response(StatusCode::NOT_FOUND, format!("no record with id {id}"))
        }
        AegisError::Validation { message } => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
        }
        other => {
            tracing::error!(error = %other, "store operation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Reject obviously malformed candidate payloads before they reach the store.
fn validate_draft(draft: &SubscriberDraft) -> Result<(), String> {
    if draft.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if !draft.email.contains('@') {
        return Err(format!("email `{}` is not an address", draft.email));
    }
    if draft.phone < 0 {
        return Err("phone must be non-negative".to_string());
    }
    Ok(())
}

/// GET /api/users
pub async fn get_users(State(state): State<GatewayState>) -> Response {
    match state.store.list().await {
        Ok(users) => (StatusCode::OK, Json(UsersResponse { users })).into_response(),
        Err(err) => map_store_error(err),
    }
}

/// POST /api/users
pub async fn post_users(
    State(state): State<GatewayState>,
    Json(draft): Json<SubscriberDraft>,
) -> Response {
    if let Err(message) = validate_draft(&draft) {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, message);
    }
    match state.store.create(&draft).await {
        Ok(user) => {
            tracing::info!(id = %user.id, "subscriber created");
            (StatusCode::OK, Json(UserResponse { user })).into_response()
        }
        Err(err) => map_store_error(err),
    }
}

/// PATCH /api/users
pub async fn patch_users(
    State(state): State<GatewayState>,
    Json(body): Json<UpdateRequest>,
) -> Response {
    let Some(id) = body.id.filter(|id| !id.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "id required");
    };
    match state.store.update(&SubscriberId(id), &body.data).await {
        Ok(user) => {
            tracing::info!(id = %user.id, "subscriber updated");
            (StatusCode::OK, Json(UserResponse { user })).into_response()
        }
        Err(err) => map_store_error(err),
    }
}

/// DELETE /api/users
pub async fn delete_users(
    State(state): State<GatewayState>,
    Json(body): Json<DeleteRequest>,
) -> Response {
    let Some(id) = body.id.filter(|id| !id.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "id required");
    };
    match state.store.delete(&SubscriberId(id.clone())).await {
        Ok(()) => {
            tracing::info!(id = %id, "subscriber deleted");
            (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
        }
        Err(err) => map_store_error(err),
    }
}

/// GET /health
///
/// Public, unauthenticated. Reports degraded when the store is unreachable.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(_) => "degraded",
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_tolerates_missing_id() {
        let body: UpdateRequest = serde_json::from_str(r#"{"data": {"phone": 555}}"#).unwrap();
        assert!(body.id.is_none());
        assert_eq!(body.data.phone, Some(555));
    }

    #[test]
    fn update_request_parses_id_and_partial_data() {
        let body: UpdateRequest =
            serde_json::from_str(r#"{"id": "sub-1", "data": {"name": "Ann"}}"#).unwrap();
        assert_eq!(body.id.as_deref(), Some("sub-1"));
        assert_eq!(body.data.name.as_deref(), Some("Ann"));
        assert!(body.data.email.is_none());
    }

    #[test]
    fn delete_request_tolerates_empty_body() {
        let body: DeleteRequest = serde_json::from_str("{}").unwrap();
        assert!(body.id.is_none());
    }

    #[test]
    fn error_body_has_wire_shape() {
        let resp = ErrorResponse {
            error: "id required".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"id required"}"#);
    }

    #[test]
    fn ok_body_has_wire_shape() {
        let json = serde_json::to_string(&OkResponse { ok: true }).unwrap();
        assert_eq!(json, r#"{"ok":true}"#);
    }

    #[test]
    fn draft_validation_rejects_bad_payloads() {
        let mut draft = SubscriberDraft {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: 5550001111,
            emergency_phone: None,
            home_address: None,
            accepted_terms: false,
            subscription_tier: "free".into(),
            subscription_expiration: None,
            last_known_location: None,
            is_agent: None,
            is_safe: None,
            profile_picture: None,
            device_ids: None,
        };
        assert!(validate_draft(&draft).is_ok());

        draft.name = "  ".into();
        assert!(validate_draft(&draft).is_err());

        draft.name = "Ann".into();
        draft.email = "not-an-address".into();
        assert!(validate_draft(&draft).is_err());

        draft.email = "ann@example.com".into();
        draft.phone = -1;
        assert!(validate_draft(&draft).is_err());
    }
}
