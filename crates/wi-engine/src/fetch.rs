//! Batched bulk reads
//!
//! The service rejects oversized read requests, so id sets are split into
//! fixed-size batches fetched sequentially. Sequential, not fan-out: latency
//! is traded for predictable load on the remote service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use wi_client::RemoteClient;
use wi_core::{ExpandMode, WiError, WiResult, WorkItemRecord};

/// Ids per read round trip. Deliberately below the service's documented
/// maximum; longer requests have been observed to fail with request-too-long.
pub const MAX_BATCH_SIZE: usize = 100;

/// Splits large id sets into bounded batches and merges the results.
pub struct BatchFetcher<C> {
    client: Arc<C>,
}

impl<C: RemoteClient> BatchFetcher<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch `ids` in order, batch by batch.
    ///
    /// Guarantees: an empty input returns empty with no network call; inputs
    /// up to [`MAX_BATCH_SIZE`] issue exactly one call; larger inputs are
    /// split into consecutive full batches with the remainder last, and the
    /// concatenation preserves every id exactly once. `max_items` truncates
    /// the id set before batching. Cancellation is checked before each batch
    /// and surfaces as [`WiError::Cancelled`], never as a partial result.
    #[instrument(skip_all, fields(total = ids.len()))]
    pub async fn fetch(
        &self,
        ids: &[i32],
        fields: &[String],
        as_of: Option<DateTime<Utc>>,
        expand: Option<ExpandMode>,
        max_items: Option<usize>,
        cancel: &CancellationToken,
    ) -> WiResult<Vec<WorkItemRecord>> {
        let ids = match max_items {
            Some(cap) if ids.len() > cap => &ids[..cap],
            _ => ids,
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(ids.len());
        for batch in ids.chunks(MAX_BATCH_SIZE) {
            if cancel.is_cancelled() {
                return Err(WiError::Cancelled);
            }
            let fetched = self
                .client
                .get_work_items(batch, fields, as_of, expand)
                .await?;
            debug!(requested = batch.len(), fetched = fetched.len(), "batch fetched");
            records.extend(fetched);
        }
        Ok(records)
    }
}
