// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aegis serve` command implementation.
//!
//! Opens the subscriber store (running migrations as needed) and serves the
//! record store REST API until ctrl-c.

use std::sync::Arc;

use tracing::info;

use aegis_config::model::AegisConfig;
use aegis_core::AegisError;
use aegis_gateway::{AuthConfig, GatewayState, ServerConfig};
use aegis_storage::SubscriberStore;

/// Run the `aegis serve` command.
pub async fn run_serve(config: AegisConfig) -> Result<(), AegisError> {
    init_tracing(&config.console.log_level);

    info!("starting aegis serve");

    let store = Arc::new(SubscriberStore::open(&config.storage).await?);
    let state = GatewayState::new(
        store.clone(),
        AuthConfig {
            bearer_token: config.server.bearer_token.clone(),
        },
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    aegis_gateway::start_server(&server_config, state).await?;

    store.close().await?;
    info!("aegis serve stopped");
    Ok(())
}

/// Initialize the tracing subscriber from the configured level, honoring a
/// RUST_LOG override.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aegis={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
