// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock record gateway for deterministic testing.
//!
//! `MockGateway` implements [`RecordGateway`] with scripted per-operation
//! outcomes, enabling fast, CI-runnable tests without a server. Outcomes are
//! popped from FIFO queues; each outcome may carry a delay so tests can
//! control resolution order. A global gate lets a test hold every call
//! in flight and observe optimistic state before releasing it.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

use aegis_core::{
    AegisError, RecordGateway, Subscriber, SubscriberDraft, SubscriberId, SubscriberPatch,
};

/// A recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    List,
    Create { name: String },
    Update { id: String },
    Delete { id: String },
}

struct Scripted<T> {
    result: Result<T, AegisError>,
    delay: Option<Duration>,
}

/// Handle to a gated [`MockGateway`]; every gateway call blocks until a
/// permit is released. Permits wake callers in FIFO order.
#[derive(Clone)]
pub struct MockGate(Arc<Semaphore>);

impl MockGate {
    /// Let `n` held calls proceed.
    pub fn release(&self, n: usize) {
        self.0.add_permits(n);
    }
}

/// A mock record gateway with scripted outcomes.
///
/// Unscripted calls behave like a permissive backend: `list` returns an
/// empty collection, `create` echoes the draft under a fresh server id,
/// `delete` succeeds, and `update` fails (a mock has no stored record to
/// merge into -- script it).
#[derive(Default)]
pub struct MockGateway {
    list_results: Mutex<VecDeque<Scripted<Vec<Subscriber>>>>,
    create_results: Mutex<VecDeque<Scripted<Subscriber>>>,
    update_results: Mutex<VecDeque<Scripted<Subscriber>>>,
    delete_results: Mutex<VecDeque<Scripted<()>>>,
    calls: Mutex<Vec<MockCall>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockGateway {
    /// Create an ungated mock with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gated mock: every call blocks until the returned
    /// [`MockGate`] releases a permit for it.
    pub fn gated() -> (Self, MockGate) {
        let semaphore = Arc::new(Semaphore::new(0));
        let gateway = Self {
            gate: Some(semaphore.clone()),
            ..Self::default()
        };
        (gateway, MockGate(semaphore))
    }

    /// Queue the next `list` outcome.
    pub async fn script_list(&self, result: Result<Vec<Subscriber>, AegisError>) {
        self.list_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: None,
            });
    }

    /// Queue the next `create` outcome.
    pub async fn script_create(&self, result: Result<Subscriber, AegisError>) {
        self.create_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: None,
            });
    }

    /// Queue the next `update` outcome.
    pub async fn script_update(&self, result: Result<Subscriber, AegisError>) {
        self.update_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: None,
            });
    }

    /// Queue the next `update` outcome, resolved only after `delay`.
    pub async fn script_update_after(
        &self,
        result: Result<Subscriber, AegisError>,
        delay: Duration,
    ) {
        self.update_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: Some(delay),
            });
    }

    /// Queue the next `delete` outcome.
    pub async fn script_delete(&self, result: Result<(), AegisError>) {
        self.delete_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: None,
            });
    }

    /// Queue the next `delete` outcome, resolved only after `delay`.
    pub async fn script_delete_after(&self, result: Result<(), AegisError>, delay: Duration) {
        self.delete_results
            .lock()
            .await
            .push_back(Scripted {
                result,
                delay: Some(delay),
            });
    }

    /// All gateway invocations so far, in order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    async fn enter(&self, call: MockCall) {
        self.calls.lock().await.push(call);
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("mock gate closed");
            permit.forget();
        }
    }

    async fn resolve<T>(scripted: Option<Scripted<T>>, fallback: Result<T, AegisError>) -> Result<T, AegisError> {
        match scripted {
            Some(Scripted { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => fallback,
        }
    }
}

#[async_trait]
impl RecordGateway for MockGateway {
    async fn list(&self) -> Result<Vec<Subscriber>, AegisError> {
        self.enter(MockCall::List).await;
        let scripted = self.list_results.lock().await.pop_front();
        Self::resolve(scripted, Ok(Vec::new())).await
    }

    async fn create(&self, draft: &SubscriberDraft) -> Result<Subscriber, AegisError> {
        self.enter(MockCall::Create {
            name: draft.name.clone(),
        })
        .await;
        let scripted = self.create_results.lock().await.pop_front();
        let fallback = Ok(draft.clone().into_subscriber(
            SubscriberId(format!("srv-{}", Uuid::new_v4())),
            Some(Utc::now()),
        ));
        Self::resolve(scripted, fallback).await
    }

    async fn update(
        &self,
        id: &SubscriberId,
        _patch: &SubscriberPatch,
    ) -> Result<Subscriber, AegisError> {
        self.enter(MockCall::Update { id: id.0.clone() }).await;
        let scripted = self.update_results.lock().await.pop_front();
        Self::resolve(
            scripted,
            Err(AegisError::Internal("unscripted mock update".into())),
        )
        .await
    }

    async fn delete(&self, id: &SubscriberId) -> Result<(), AegisError> {
        self.enter(MockCall::Delete { id: id.0.clone() }).await;
        let scripted = self.delete_results.lock().await.pop_front();
        Self::resolve(scripted, Ok(())).await
    }
}
