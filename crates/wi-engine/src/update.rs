//! Batched writes
//!
//! All updates go out as one multi-operation write. Responses are partitioned
//! by status code; any failure surfaces as an aggregate error that still
//! carries the records that did update, so callers can keep partial progress
//! and retry only the failed subset.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use wi_client::{BatchWireRequest, RemoteClient};
use wi_core::{
    BatchUpdateError, BatchUpdateFailure, BatchUpdateRequest, WiError, WiResult, WorkItemRecord,
};

/// Issues one multi-operation write and partitions the outcome.
pub struct BatchUpdateExecutor<C> {
    client: Arc<C>,
}

impl<C: RemoteClient> BatchUpdateExecutor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Execute all `requests` in one write call.
    ///
    /// An empty input is a configuration error. When any operation fails,
    /// the whole call fails with [`WiError::BatchUpdate`] carrying both the
    /// failures and the successfully updated records.
    #[instrument(skip_all, fields(count = requests.len()))]
    pub async fn execute(
        &self,
        requests: &[BatchUpdateRequest],
        cancel: &CancellationToken,
    ) -> WiResult<Vec<WorkItemRecord>> {
        if requests.is_empty() {
            return Err(WiError::Config(
                "batch update requires at least one request".into(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(WiError::Cancelled);
        }

        let wire: Vec<BatchWireRequest> = requests
            .iter()
            .map(BatchWireRequest::work_item_patch)
            .collect::<WiResult<_>>()?;
        let responses = self.client.execute_batch(&wire).await?;
        if responses.len() != requests.len() {
            return Err(WiError::Data(format!(
                "batch write returned {} responses for {} requests",
                responses.len(),
                requests.len()
            )));
        }

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for (request, response) in requests.iter().zip(&responses) {
            if response.is_ok() {
                let record: WorkItemRecord = serde_json::from_value(response.body.clone())
                    .map_err(|e| {
                        WiError::Data(format!(
                            "malformed batch response body for work item {}: {e}",
                            request.id
                        ))
                    })?;
                successes.push(record);
            } else {
                let message = failure_message(&response.body);
                warn!(
                    id = request.id,
                    code = response.code,
                    error = %message,
                    "batch operation failed"
                );
                failures.push(BatchUpdateFailure {
                    id: request.id,
                    message,
                });
            }
        }

        if !failures.is_empty() {
            return Err(WiError::BatchUpdate(BatchUpdateError {
                successes,
                failures,
            }));
        }
        info!(count = successes.len(), "batch update succeeded");
        Ok(successes)
    }
}

/// Extract the service's error message from a failed operation body.
fn failure_message(body: &serde_json::Value) -> String {
    body.get("message")
        .or_else(|| body.get("Message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
