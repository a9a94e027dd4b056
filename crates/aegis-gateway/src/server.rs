// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST API server built on axum.
//!
//! Sets up routes, middleware, and shared state for the record store API.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use aegis_core::AegisError;
use aegis_storage::SubscriberStore;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The backing subscriber store.
    pub store: Arc<SubscriberStore>,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Health state for the public endpoint.
    pub health: HealthState,
}

impl GatewayState {
    /// Build handler state over an opened store.
    pub fn new(store: Arc<SubscriberStore>, auth: AuthConfig) -> Self {
        Self {
            store,
            auth,
            health: HealthState {
                start_time: std::time::Instant::now(),
            },
        }
    }
}

/// Server bind configuration (mirrors `ServerConfig` from aegis-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full application router.
///
/// Exposed separately from [`start_server`] so tests can drive it with
/// `tower::ServiceExt::oneshot` without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    // Unauthenticated public route (health for systemd probes).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    // The single /api/users resource, guarded by bearer auth when configured.
    let api_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::get_users)
                .post(handlers::post_users)
                .patch(handlers::patch_users)
                .delete(handlers::delete_users),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the REST API server.
///
/// Binds to the configured host:port and serves until ctrl-c.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AegisError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AegisError::Transport {
                message: format!("failed to bind API server to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| AegisError::Transport {
            message: format!("API server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
