// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Aegis console.
//!
//! This crate provides the subscriber record model, the error taxonomy, and
//! the [`RecordGateway`] trait that both the HTTP client and test mocks
//! implement. Everything else in the workspace builds on these definitions.

pub mod error;
pub mod gateway;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AegisError;
pub use gateway::RecordGateway;
pub use types::{GeoPoint, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch};
