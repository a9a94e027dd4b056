// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record store gateway contract.

use async_trait::async_trait;

use crate::error::AegisError;
use crate::types::{Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch};

/// Gateway to the subscriber record store.
///
/// Four operations, each one network round-trip against the backing store.
/// Implementations perform no retries and no caching; errors surface as-is.
/// The production implementation lives in `aegis-client`; tests use the
/// scripted mock from `aegis-test-utils`.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Fetch every subscriber record.
    async fn list(&self) -> Result<Vec<Subscriber>, AegisError>;

    /// Create a record from the candidate payload. The store assigns
    /// `id` and `created_at` and returns the stored record.
    async fn create(&self, draft: &SubscriberDraft) -> Result<Subscriber, AegisError>;

    /// Apply a partial-field update and return the stored record.
    async fn update(
        &self,
        id: &SubscriberId,
        patch: &SubscriberPatch,
    ) -> Result<Subscriber, AegisError>;

    /// Remove a record by id.
    async fn delete(&self, id: &SubscriberId) -> Result<(), AegisError>;
}
