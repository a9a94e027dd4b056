// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of [`RecordGateway`] against the record store API.
//!
//! One round-trip per operation, no retries, no caching. Failures map onto
//! the workspace error taxonomy: 404 becomes `NotFound`, 400/422 become
//! `Validation`, everything else (including connection errors) `Transport`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use aegis_core::{
    AegisError, RecordGateway, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch,
};

/// Wire body of GET /api/users.
#[derive(Debug, Deserialize)]
struct ListResponse {
    users: Vec<Subscriber>,
}

/// Wire body of POST/PATCH /api/users.
#[derive(Debug, Deserialize)]
struct UserResponse {
    user: Subscriber,
}

/// Wire body of DELETE /api/users.
#[derive(Debug, Deserialize)]
struct OkResponse {
    #[allow(dead_code)]
    ok: bool,
}

/// Wire body of any failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    id: &'a str,
    data: &'a SubscriberPatch,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    id: &'a str,
}

/// HTTP client for the record store API.
#[derive(Debug, Clone)]
pub struct HttpRecordGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordGateway {
    /// Creates a new API client.
    ///
    /// # Arguments
    /// * `base_url` - root of the record store API, e.g. `http://127.0.0.1:8642`
    /// * `bearer_token` - optional token sent as `Authorization: Bearer <token>`
    /// * `timeout` - whole-request timeout applied to every call
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, AegisError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(token) = bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AegisError::Config(format!("invalid bearer token value: {e}")))?;
            headers.insert("authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AegisError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn users_url(&self) -> String {
        format!("{}/api/users", self.base_url)
    }

    /// Flatten a non-success response onto the error taxonomy.
    async fn error_for(&self, response: reqwest::Response, id: Option<&SubscriberId>) -> AegisError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.clone());

        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            AegisError::not_found(id.0.clone())
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            AegisError::Validation { message }
        } else {
            AegisError::transport(format!("API returned {status}: {message}"))
        }
    }
}

fn send_error(e: reqwest::Error) -> AegisError {
    AegisError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn decode_error(e: reqwest::Error) -> AegisError {
    AegisError::Transport {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    async fn list(&self) -> Result<Vec<Subscriber>, AegisError> {
        let response = self
            .client
            .get(self.users_url())
            .send()
            .await
            .map_err(send_error)?;

        debug!(status = %response.status(), "list response received");
        if !response.status().is_success() {
            return Err(self.error_for(response, None).await);
        }
        let body: ListResponse = response.json().await.map_err(decode_error)?;
        Ok(body.users)
    }

    async fn create(&self, draft: &SubscriberDraft) -> Result<Subscriber, AegisError> {
        let response = self
            .client
            .post(self.users_url())
            .json(draft)
            .send()
            .await
            .map_err(send_error)?;

        debug!(status = %response.status(), "create response received");
        if !response.status().is_success() {
            return Err(self.error_for(response, None).await);
        }
        let body: UserResponse = response.json().await.map_err(decode_error)?;
        Ok(body.user)
    }

    async fn update(
        &self,
        id: &SubscriberId,
        patch: &SubscriberPatch,
    ) -> Result<Subscriber, AegisError> {
        let response = self
            .client
            .patch(self.users_url())
            .json(&UpdateRequest {
                id: &id.0,
                data: patch,
            })
            .send()
            .await
            .map_err(send_error)?;

        debug!(status = %response.status(), id = %id, "update response received");
        if !response.status().is_success() {
            return Err(self.error_for(response, Some(id)).await);
        }
        let body: UserResponse = response.json().await.map_err(decode_error)?;
        Ok(body.user)
    }

    async fn delete(&self, id: &SubscriberId) -> Result<(), AegisError> {
        let response = self
            .client
            .delete(self.users_url())
            .json(&DeleteRequest { id: &id.0 })
            .send()
            .await
            .map_err(send_error)?;

        debug!(status = %response.status(), id = %id, "delete response received");
        if !response.status().is_success() {
            return Err(self.error_for(response, Some(id)).await);
        }
        let _body: OkResponse = response.json().await.map_err(decode_error)?;
        Ok(())
    }
}
