// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aegis integration tests.
//!
//! Provides a scripted mock gateway and shared record fixtures for fast,
//! deterministic, CI-runnable tests without a running API server.
//!
//! # Components
//!
//! - [`MockGateway`] - scripted [`aegis_core::RecordGateway`] with
//!   per-operation outcome queues, optional delays, and a call gate
//! - [`fixtures`] - canned drafts and records

pub mod fixtures;
pub mod mock_gateway;

pub use mock_gateway::{MockCall, MockGate, MockGateway};
