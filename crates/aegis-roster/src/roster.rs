// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The collection state manager.
//!
//! [`Roster`] owns the session's in-memory copy of the subscriber
//! collection and is its sole writer. Every mutation is applied
//! optimistically, sent through the injected [`RecordGateway`], and then
//! reconciled: a confirmed result replaces the optimistic entry, a failure
//! (or timeout) rolls back to the exact pre-mutation state.
//!
//! Mutations on the same id may resolve out of issue order; the intent
//! journal ensures only the latest issued mutation's resolution is applied
//! and everything older is discarded as stale. The lock is never held
//! across a gateway await, so readers observe optimistic state while a
//! mutation is in flight.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use aegis_core::{
    AegisError, RecordGateway, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch,
};

use crate::journal::IntentJournal;
use crate::projection::{project, ProjectedRecord, Selection, SortState};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

struct RosterState {
    records: Vec<Subscriber>,
    journal: IntentJournal,
}

/// The authoritative client-side snapshot of the subscriber collection.
///
/// Cheap to clone; clones share the same state. Inject one instance into
/// every consumer rather than reaching for a process-wide singleton.
#[derive(Clone)]
pub struct Roster {
    gateway: Arc<dyn RecordGateway>,
    timeout: Duration,
    state: Arc<Mutex<RosterState>>,
}

fn position(records: &[Subscriber], id: &SubscriberId) -> Option<usize> {
    records.iter().position(|record| &record.id == id)
}

/// Keep the first occurrence of every id.
fn dedup_by_id(records: Vec<Subscriber>) -> Vec<Subscriber> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

impl Roster {
    /// Create a roster with an empty snapshot.
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        Self::with_records(gateway, Vec::new())
    }

    /// Create a roster seeded with an initial snapshot.
    pub fn with_records(gateway: Arc<dyn RecordGateway>, initial: Vec<Subscriber>) -> Self {
        Self {
            gateway,
            timeout: DEFAULT_TIMEOUT,
            state: Arc::new(Mutex::new(RosterState {
                records: dedup_by_id(initial),
                journal: IntentJournal::default(),
            })),
        }
    }

    /// Override the per-call gateway timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A materialized copy of the current snapshot, optimistic entries
    /// included.
    pub async fn snapshot(&self) -> Vec<Subscriber> {
        self.state.lock().await.records.clone()
    }

    /// Compute the table view over the current snapshot.
    pub async fn project(
        &self,
        query: &str,
        sort: Option<SortState>,
        selection: &Selection,
    ) -> Vec<ProjectedRecord> {
        let state = self.state.lock().await;
        project(&state.records, query, sort, selection)
    }

    /// Bound a gateway round-trip by the configured timeout; an elapsed
    /// timer counts as a failed mutation.
    async fn bounded<T, F>(&self, operation: F) -> Result<T, AegisError>
    where
        F: Future<Output = Result<T, AegisError>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(AegisError::Timeout {
                duration: self.timeout,
            }),
        }
    }

    /// Replace the snapshot with the store's current contents.
    ///
    /// On failure the previous snapshot stays untouched and the error is
    /// returned; there is no fallback dataset. A successful reload starts a
    /// new epoch: resolutions of mutations issued before it are discarded.
    pub async fn load_all(&self) -> Result<(), AegisError> {
        let fetched = self.bounded(self.gateway.list()).await?;

        let mut state = self.state.lock().await;
        state.records = dedup_by_id(fetched);
        state.journal.advance_epoch();
        debug!(count = state.records.len(), "snapshot replaced from store");
        Ok(())
    }

    /// Create a record.
    ///
    /// A provisional entry appears at the head of the snapshot immediately
    /// and stays visible while the create is in flight. On confirmation it
    /// is re-keyed to the server-assigned record; on failure it is removed,
    /// so no caller ever observes a rejected candidate afterwards.
    pub async fn add(&self, draft: SubscriberDraft) -> Result<Subscriber, AegisError> {
        let provisional_id = SubscriberId(format!("pending-{}", Uuid::new_v4()));
        let provisional = draft.clone().into_subscriber(provisional_id.clone(), None);

        let intent = {
            let mut state = self.state.lock().await;
            state.records.insert(0, provisional);
            state.journal.begin(&provisional_id)
        };
        debug!(id = %provisional_id, "optimistic create applied");

        let result = self.bounded(self.gateway.create(&draft)).await;

        let mut state = self.state.lock().await;
        if !state.journal.is_current(&provisional_id, intent) {
            warn!(id = %provisional_id, "discarding stale create resolution");
            return Err(AegisError::Conflict {
                id: provisional_id.0,
                seq: intent.seq(),
            });
        }

        match result {
            Ok(confirmed) => {
                let pos = position(&state.records, &provisional_id).unwrap_or(0);
                // Re-key the provisional entry in place; drop any duplicate
                // of the server id so the id-uniqueness invariant holds.
                state
                    .records
                    .retain(|record| record.id != provisional_id && record.id != confirmed.id);
                let pos = pos.min(state.records.len());
                state.records.insert(pos, confirmed.clone());
                state.journal.finish(&provisional_id, intent);
                debug!(provisional = %provisional_id, id = %confirmed.id, "create confirmed");
                Ok(confirmed)
            }
            Err(err) => {
                state.records.retain(|record| record.id != provisional_id);
                state.journal.finish(&provisional_id, intent);
                warn!(id = %provisional_id, error = %err, "create failed, optimistic entry removed");
                Err(err)
            }
        }
    }

    /// Apply a partial update to the record with `id`.
    ///
    /// Named fields change immediately (optimistic merge); on confirmation
    /// the server's canonical record replaces the local one, on failure the
    /// pre-mutation record is restored exactly, value and position.
    pub async fn update(
        &self,
        id: &SubscriberId,
        patch: SubscriberPatch,
    ) -> Result<Subscriber, AegisError> {
        let (pre_image, pre_pos, intent) = {
            let mut state = self.state.lock().await;
            let Some(pos) = position(&state.records, id) else {
                return Err(AegisError::not_found(id.0.clone()));
            };
            let pre_image = state.records[pos].clone();
            patch.apply(&mut state.records[pos]);
            let intent = state.journal.begin(id);
            (pre_image, pos, intent)
        };
        debug!(%id, "optimistic update applied");

        let result = self.bounded(self.gateway.update(id, &patch)).await;

        let mut state = self.state.lock().await;
        if !state.journal.is_current(id, intent) {
            warn!(%id, "discarding stale update resolution");
            return Err(AegisError::Conflict {
                id: id.0.clone(),
                seq: intent.seq(),
            });
        }

        match result {
            Ok(confirmed) => {
                if let Some(pos) = position(&state.records, id) {
                    state.records[pos] = confirmed.clone();
                }
                state.journal.finish(id, intent);
                debug!(%id, "update confirmed");
                Ok(confirmed)
            }
            Err(err) => {
                match position(&state.records, id) {
                    Some(pos) => state.records[pos] = pre_image,
                    None => {
                        let pos = pre_pos.min(state.records.len());
                        state.records.insert(pos, pre_image);
                    }
                }
                state.journal.finish(id, intent);
                warn!(%id, error = %err, "update failed, pre-mutation state restored");
                Err(err)
            }
        }
    }

    /// Remove the record with `id`.
    ///
    /// The record disappears from the snapshot immediately; on failure it
    /// reappears at its original position.
    pub async fn delete(&self, id: &SubscriberId) -> Result<(), AegisError> {
        let (pre_image, pre_pos, intent) = {
            let mut state = self.state.lock().await;
            let Some(pos) = position(&state.records, id) else {
                return Err(AegisError::not_found(id.0.clone()));
            };
            let pre_image = state.records.remove(pos);
            let intent = state.journal.begin(id);
            (pre_image, pos, intent)
        };
        debug!(%id, "optimistic delete applied");

        let result = self.bounded(self.gateway.delete(id)).await;

        let mut state = self.state.lock().await;
        if !state.journal.is_current(id, intent) {
            warn!(%id, "discarding stale delete resolution");
            return Err(AegisError::Conflict {
                id: id.0.clone(),
                seq: intent.seq(),
            });
        }

        match result {
            Ok(()) => {
                state.journal.finish(id, intent);
                debug!(%id, "delete confirmed");
                Ok(())
            }
            Err(err) => {
                let pos = pre_pos.min(state.records.len());
                state.records.insert(pos, pre_image);
                state.journal.finish(id, intent);
                warn!(%id, error = %err, "delete failed, record restored");
                Err(err)
            }
        }
    }
}
