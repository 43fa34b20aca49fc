//! Single-flight authentication retry
//!
//! Remote calls that fail with an auth classification are retried exactly
//! once after a credential refresh. Concurrent callers needing a refresh
//! serialize on one gate: the first performs the physical refresh, the rest
//! observe the bumped generation and go straight to their retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use wi_core::{ExpandMode, WiError, WiResult, WorkItemRecord};

use crate::remote::{CredentialsProvider, RemoteClient};
use crate::wire::{BatchResponse, BatchWireRequest, QueryRun, SavedQuery};

/// Serializes credential refreshes across concurrent callers.
///
/// The generation counter avoids thundering-herd re-refreshes: a caller that
/// snapshotted the generation before its failed attempt will find it already
/// bumped inside the critical section and skip the redundant refresh.
#[derive(Default)]
pub struct AuthRefreshGate {
    generation: Mutex<u64>,
}

impl AuthRefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current refresh generation.
    pub async fn generation(&self) -> u64 {
        *self.generation.lock().await
    }

    /// Refresh credentials unless another caller already did so after
    /// `observed` was snapshotted.
    pub async fn refresh_once(
        &self,
        observed: u64,
        provider: &dyn CredentialsProvider,
    ) -> WiResult<()> {
        let mut generation = self.generation.lock().await;
        if *generation != observed {
            debug!(
                observed,
                current = *generation,
                "credentials already refreshed, skipping"
            );
            return Ok(());
        }
        provider.refresh_credentials().await?;
        *generation += 1;
        Ok(())
    }
}

/// A [`RemoteClient`] decorator applying the auth-retry policy to every call.
pub struct RetryingClient<C> {
    inner: Arc<C>,
    credentials: Arc<dyn CredentialsProvider>,
    gate: Arc<AuthRefreshGate>,
    cancel: CancellationToken,
}

impl<C> RetryingClient<C> {
    pub fn new(inner: Arc<C>, credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self {
            inner,
            credentials,
            gate: Arc::new(AuthRefreshGate::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Share a refresh gate between several clients talking to one account.
    pub fn with_gate(mut self, gate: Arc<AuthRefreshGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Observe a cancellation token: a cancelled client refuses to refresh
    /// credentials or retry, surfacing [`WiError::Cancelled`] instead.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run `operation`; on an auth failure refresh credentials (single-flight)
    /// and retry exactly once. A second auth failure propagates. Cancellation
    /// is raced against the refresh and checked again before the retry.
    pub async fn run<T, F, Fut>(&self, operation: F) -> WiResult<T>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = WiResult<T>> + Send,
        T: Send,
    {
        let observed = self.gate.generation().await;
        match operation().await {
            Err(error) if error.is_auth() => {
                if self.cancel.is_cancelled() {
                    return Err(WiError::Cancelled);
                }
                debug!(%error, "auth failure, refreshing credentials and retrying");
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(WiError::Cancelled),
                    refreshed = self.gate.refresh_once(observed, self.credentials.as_ref()) => {
                        refreshed?;
                    }
                }
                if self.cancel.is_cancelled() {
                    return Err(WiError::Cancelled);
                }
                operation().await
            }
            result => result,
        }
    }
}

#[async_trait]
impl<C: RemoteClient> RemoteClient for RetryingClient<C> {
    async fn get_query(&self, project: &str, path: &str) -> WiResult<SavedQuery> {
        self.run(|| self.inner.get_query(project, path)).await
    }

    async fn run_query_by_id(
        &self,
        project: &str,
        team: Option<&str>,
        id: Uuid,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        self.run(|| self.inner.run_query_by_id(project, team, id, max_items))
            .await
    }

    async fn run_query_by_wiql(
        &self,
        project: &str,
        team: Option<&str>,
        wiql: &str,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        self.run(|| self.inner.run_query_by_wiql(project, team, wiql, max_items))
            .await
    }

    async fn get_work_items(
        &self,
        ids: &[i32],
        fields: &[String],
        as_of: Option<DateTime<Utc>>,
        expand: Option<ExpandMode>,
    ) -> WiResult<Vec<WorkItemRecord>> {
        self.run(|| self.inner.get_work_items(ids, fields, as_of, expand))
            .await
    }

    async fn execute_batch(&self, requests: &[BatchWireRequest]) -> WiResult<Vec<BatchResponse>> {
        self.run(|| self.inner.execute_batch(requests)).await
    }
}
