//! Query execution
//!
//! The engine's single entry point: validate the request, resolve it to a
//! query run (by saved path, saved id, or ad-hoc text), fetch the referenced
//! work items in batches, and assemble a hierarchy when the run is
//! relational.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use wi_client::{QueryRun, QueryType, RemoteClient};
use wi_core::{LinkRecord, WiError, WiResult, WorkItemRecord};

use crate::fetch::BatchFetcher;
use crate::hierarchy::{Hierarchy, HierarchyBuilder};
use crate::request::{QueryRequest, QuerySelector};

/// The materialized result of an executed query
pub enum QueryOutcome {
    /// A flat work item list
    Flat {
        columns: Vec<String>,
        items: Vec<WorkItemRecord>,
    },
    /// A parent/child forest from a tree or link query
    Relational {
        columns: Vec<String>,
        hierarchy: Hierarchy,
    },
}

impl QueryOutcome {
    /// Reference names of the returned columns, in order
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Flat { columns, .. } | Self::Relational { columns, .. } => columns,
        }
    }
}

/// Orchestrates query resolution, batched retrieval, and hierarchy assembly.
pub struct QueryExecutor<C> {
    client: Arc<C>,
    fetcher: BatchFetcher<C>,
}

impl<C: RemoteClient> QueryExecutor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            fetcher: BatchFetcher::new(Arc::clone(&client)),
            client,
        }
    }

    /// Execute a validated request end to end.
    #[instrument(skip_all)]
    pub async fn execute(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> WiResult<QueryOutcome> {
        request.validate()?;
        let project = request.project()?;
        let team = request.team.as_deref();

        if cancel.is_cancelled() {
            return Err(WiError::Cancelled);
        }
        let run = match request.query_selector()? {
            QuerySelector::Path(path) => {
                let saved = self.client.get_query(&project, path).await?;
                if saved.is_folder {
                    return Err(WiError::Config(format!(
                        "query path {path:?} names a folder, not a runnable query"
                    )));
                }
                debug!(path, id = %saved.id, "saved query resolved");
                if cancel.is_cancelled() {
                    return Err(WiError::Cancelled);
                }
                self.client
                    .run_query_by_id(&project, team, saved.id, request.max_items)
                    .await?
            }
            QuerySelector::Id(id) => {
                self.client
                    .run_query_by_id(&project, team, id, request.max_items)
                    .await?
            }
            QuerySelector::Text(text) => {
                self.client
                    .run_query_by_wiql(&project, team, text, request.max_items)
                    .await?
            }
        };

        // The service's evaluation timestamp wins over the requested one so
        // the follow-up fetch sees the same revision of every item.
        let as_of = run.as_of.or(request.as_of);
        let columns = run.column_names();

        if run.is_relational() {
            let links: Vec<LinkRecord> = run
                .work_item_relations
                .iter()
                .map(|relation| relation.to_link())
                .collect();
            let records = self
                .fetcher
                .fetch(
                    &distinct_targets(&links),
                    &request.required_fields,
                    as_of,
                    request.expand,
                    request.max_items,
                    cancel,
                )
                .await?;
            let hierarchy =
                HierarchyBuilder::build(records, &links, run.query_type == QueryType::Tree)?;
            Ok(QueryOutcome::Relational { columns, hierarchy })
        } else {
            let ids = flat_ids(&run);
            let items = self
                .fetcher
                .fetch(
                    &ids,
                    &request.required_fields,
                    as_of,
                    request.expand,
                    request.max_items,
                    cancel,
                )
                .await?;
            Ok(QueryOutcome::Flat { columns, items })
        }
    }
}

fn flat_ids(run: &QueryRun) -> Vec<i32> {
    run.work_items.iter().map(|item| item.id).collect()
}

/// Target ids in encounter order, each once.
fn distinct_targets(links: &[LinkRecord]) -> Vec<i32> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|link| link.target)
        .filter(|id| seen.insert(*id))
        .collect()
}
