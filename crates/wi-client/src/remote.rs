//! Remote service boundary
//!
//! The abstract client the engine is written against. Production code uses
//! [`crate::HttpRemoteClient`] (usually wrapped in [`crate::RetryingClient`]);
//! tests substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use wi_core::{ExpandMode, WiResult, WorkItemRecord};

use crate::wire::{BatchResponse, BatchWireRequest, QueryRun, SavedQuery};

/// Abstract client for the work item tracking service
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Resolve a saved query by its folder path
    async fn get_query(&self, project: &str, path: &str) -> WiResult<SavedQuery>;

    /// Run a saved query by id
    async fn run_query_by_id(
        &self,
        project: &str,
        team: Option<&str>,
        id: Uuid,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun>;

    /// Run an ad-hoc query from raw query text
    async fn run_query_by_wiql(
        &self,
        project: &str,
        team: Option<&str>,
        wiql: &str,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun>;

    /// Bulk-read work items by id
    async fn get_work_items(
        &self,
        ids: &[i32],
        fields: &[String],
        as_of: Option<DateTime<Utc>>,
        expand: Option<ExpandMode>,
    ) -> WiResult<Vec<WorkItemRecord>>;

    /// Issue one multi-operation write; responses are parallel to `requests`
    async fn execute_batch(&self, requests: &[BatchWireRequest]) -> WiResult<Vec<BatchResponse>>;
}

/// Host-supplied hook for refreshing expired credentials.
///
/// Invoked at most once per failed call, single-flight across concurrent
/// callers (see [`crate::AuthRefreshGate`]).
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn refresh_credentials(&self) -> WiResult<()>;
}
