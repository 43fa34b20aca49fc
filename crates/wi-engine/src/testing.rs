//! In-memory fake of the remote boundary for engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use wi_client::{
    BatchResponse, BatchWireRequest, QueryRun, QueryType, RemoteClient, SavedQuery, WorkItemRef,
    WorkItemRelation,
};
use wi_core::{ExpandMode, WiError, WiResult, WorkItemRecord};

/// Arguments of one recorded `get_work_items` call
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub ids: Vec<i32>,
    pub fields: Vec<String>,
    pub as_of: Option<DateTime<Utc>>,
    pub expand: Option<ExpandMode>,
}

/// Records every call and replays canned responses. `get_work_items` answers
/// with one bare record per requested id unless a cancellation hook is set.
#[derive(Default)]
pub struct FakeRemoteClient {
    saved_query: Mutex<Option<SavedQuery>>,
    query_run: Mutex<Option<QueryRun>>,
    batch_responses: Mutex<Vec<BatchResponse>>,
    cancel_after_fetch: Mutex<Option<CancellationToken>>,
    pub get_query_calls: Mutex<Vec<(String, String)>>,
    pub run_by_id_calls: Mutex<Vec<Uuid>>,
    pub run_by_wiql_calls: Mutex<Vec<String>>,
    pub fetch_calls: Mutex<Vec<FetchCall>>,
    pub batch_calls: Mutex<Vec<Vec<BatchWireRequest>>>,
}

impl FakeRemoteClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_saved_query(self, query: SavedQuery) -> Self {
        *self.saved_query.lock().unwrap() = Some(query);
        self
    }

    pub fn with_query_run(self, run: QueryRun) -> Self {
        *self.query_run.lock().unwrap() = Some(run);
        self
    }

    pub fn with_batch_responses(self, responses: Vec<BatchResponse>) -> Self {
        *self.batch_responses.lock().unwrap() = responses;
        self
    }

    /// Cancel `token` from inside the next `get_work_items` call.
    pub fn cancel_after_next_fetch(&self, token: CancellationToken) {
        *self.cancel_after_fetch.lock().unwrap() = Some(token);
    }

    pub fn fetched_id_batches(&self) -> Vec<Vec<i32>> {
        self.fetch_calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.ids.clone())
            .collect()
    }
}

#[async_trait]
impl RemoteClient for FakeRemoteClient {
    async fn get_query(&self, project: &str, path: &str) -> WiResult<SavedQuery> {
        self.get_query_calls
            .lock()
            .unwrap()
            .push((project.to_string(), path.to_string()));
        self.saved_query
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WiError::Config("fake: no saved query configured".into()))
    }

    async fn run_query_by_id(
        &self,
        _project: &str,
        _team: Option<&str>,
        id: Uuid,
        _max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        self.run_by_id_calls.lock().unwrap().push(id);
        self.query_run
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WiError::Config("fake: no query run configured".into()))
    }

    async fn run_query_by_wiql(
        &self,
        _project: &str,
        _team: Option<&str>,
        wiql: &str,
        _max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        self.run_by_wiql_calls.lock().unwrap().push(wiql.to_string());
        self.query_run
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WiError::Config("fake: no query run configured".into()))
    }

    async fn get_work_items(
        &self,
        ids: &[i32],
        fields: &[String],
        as_of: Option<DateTime<Utc>>,
        expand: Option<ExpandMode>,
    ) -> WiResult<Vec<WorkItemRecord>> {
        self.fetch_calls.lock().unwrap().push(FetchCall {
            ids: ids.to_vec(),
            fields: fields.to_vec(),
            as_of,
            expand,
        });
        if let Some(token) = self.cancel_after_fetch.lock().unwrap().take() {
            token.cancel();
        }
        Ok(ids.iter().copied().map(WorkItemRecord::new).collect())
    }

    async fn execute_batch(&self, requests: &[BatchWireRequest]) -> WiResult<Vec<BatchResponse>> {
        self.batch_calls.lock().unwrap().push(requests.to_vec());
        Ok(self.batch_responses.lock().unwrap().clone())
    }
}

/// A flat query run listing the given ids
pub fn flat_run(ids: &[i32]) -> QueryRun {
    QueryRun {
        query_type: QueryType::Flat,
        as_of: None,
        columns: Vec::new(),
        work_items: ids.iter().map(|&id| WorkItemRef { id, url: None }).collect(),
        work_item_relations: Vec::new(),
    }
}

/// A relational query run over the given `(source, target)` edges
pub fn relational_run(query_type: QueryType, edges: &[(Option<i32>, i32)]) -> QueryRun {
    QueryRun {
        query_type,
        as_of: None,
        columns: Vec::new(),
        work_items: Vec::new(),
        work_item_relations: edges
            .iter()
            .map(|&(source, target)| WorkItemRelation {
                rel: source.map(|_| "System.LinkTypes.Hierarchy-Forward".to_string()),
                source: source.map(|id| WorkItemRef { id, url: None }),
                target: WorkItemRef {
                    id: target,
                    url: None,
                },
            })
            .collect(),
    }
}
