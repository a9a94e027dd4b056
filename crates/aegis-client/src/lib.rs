// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client crate for the Aegis record store API.
//!
//! [`HttpRecordGateway`] is the production implementation of
//! [`aegis_core::RecordGateway`]; the roster state manager takes it (or any
//! other implementation) as an injected dependency.

pub mod client;

pub use client::HttpRecordGateway;
