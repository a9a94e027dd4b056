// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway serving the subscriber record store.
//!
//! The gateway is a thin pass-through: handlers translate the wire contract
//! onto [`aegis_storage::SubscriberStore`] calls and map failures onto
//! `{"error": ...}` bodies. No business logic lives here.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
