//! REST implementation of the remote boundary
//!
//! Thin JSON-over-HTTP mapping: routes follow the service's REST conventions
//! (`wiql` for query runs, `workitems` for bulk reads, `$batch` for
//! multi-operation writes). Timeouts are the transport's concern and belong
//! on the underlying `reqwest` client, not here.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use wi_core::{ExpandMode, WiError, WiResult, WorkItemRecord};

use crate::remote::RemoteClient;
use crate::wire::{
    BatchResponse, BatchResponseList, BatchWireRequest, QueryRun, SavedQuery, WorkItemList,
};

const API_VERSION: &str = "1.0";

/// HTTP client for the work item tracking REST API.
///
/// The bearer token sits behind a lock so a credential refresh hook can
/// rotate it while calls are in flight.
pub struct HttpRemoteClient {
    base: Url,
    http: ReqwestClient,
    token: RwLock<Option<String>>,
}

impl HttpRemoteClient {
    /// Create a client for the given collection URL.
    pub fn new(base_url: &str) -> WiResult<Self> {
        Self::with_http(base_url, ReqwestClient::new())
    }

    /// Create a client with a preconfigured transport (timeouts, proxies).
    pub fn with_http(base_url: &str, http: ReqwestClient) -> WiResult<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| WiError::Config(format!("invalid base url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(WiError::Config(format!(
                "base url {base_url:?} cannot carry a path"
            )));
        }
        Ok(Self {
            base,
            http,
            token: RwLock::new(None),
        })
    }

    /// Install or rotate the bearer token.
    pub fn set_bearer_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    fn url(&self, segments: &[&str]) -> WiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| WiError::Config("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, url)
            .query(&[("api-version", API_VERSION)]);
        if let Some(token) = self.token.read().as_deref() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn decode<T: DeserializeOwned>(&self, request: RequestBuilder) -> WiResult<T> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(WiError::from_status(
                status.as_u16(),
                error_message(response).await,
            ));
        }
        response.json().await.map_err(transport)
    }

    /// Team-scoped wiql segments: `{project}[/{team}]/_apis/wit/wiql[...]`.
    fn wiql_segments<'a>(
        project: &'a str,
        team: Option<&'a str>,
        tail: Option<&'a str>,
    ) -> Vec<&'a str> {
        let mut segments = vec![project];
        if let Some(team) = team {
            segments.push(team);
        }
        segments.extend(["_apis", "wit", "wiql"]);
        if let Some(tail) = tail {
            segments.push(tail);
        }
        segments
    }
}

fn transport(error: reqwest::Error) -> WiError {
    WiError::Transport {
        message: error.to_string(),
    }
}

/// Pull the service's error message out of a failed response body.
async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(text),
        Err(_) => text,
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn get_query(&self, project: &str, path: &str) -> WiResult<SavedQuery> {
        let url = self.url(&[project, "_apis", "wit", "queries", path])?;
        debug!(project, path, "resolving saved query");
        self.decode(self.request(Method::GET, url)).await
    }

    async fn run_query_by_id(
        &self,
        project: &str,
        team: Option<&str>,
        id: Uuid,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        let id = id.to_string();
        let url = self.url(&Self::wiql_segments(project, team, Some(id.as_str())))?;
        let mut request = self.request(Method::GET, url);
        if let Some(top) = max_items {
            request = request.query(&[("$top", top.to_string())]);
        }
        debug!(project, query_id = %id, "running saved query");
        self.decode(request).await
    }

    async fn run_query_by_wiql(
        &self,
        project: &str,
        team: Option<&str>,
        wiql: &str,
        max_items: Option<usize>,
    ) -> WiResult<QueryRun> {
        let url = self.url(&Self::wiql_segments(project, team, None))?;
        let mut request = self
            .request(Method::POST, url)
            .json(&serde_json::json!({ "query": wiql }));
        if let Some(top) = max_items {
            request = request.query(&[("$top", top.to_string())]);
        }
        debug!(project, "running ad-hoc query");
        self.decode(request).await
    }

    async fn get_work_items(
        &self,
        ids: &[i32],
        fields: &[String],
        as_of: Option<DateTime<Utc>>,
        expand: Option<ExpandMode>,
    ) -> WiResult<Vec<WorkItemRecord>> {
        let url = self.url(&["_apis", "wit", "workitems"])?;
        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut request = self
            .request(Method::GET, url)
            .query(&[("ids", id_list.as_str())]);
        if !fields.is_empty() {
            request = request.query(&[("fields", fields.join(","))]);
        }
        if let Some(as_of) = as_of {
            request = request.query(&[(
                "asOf",
                as_of.to_rfc3339_opts(SecondsFormat::Millis, true),
            )]);
        }
        if let Some(expand) = expand {
            request = request.query(&[("$expand", expand.as_str())]);
        }
        debug!(count = ids.len(), "fetching work items");
        let list: WorkItemList = self.decode(request).await?;
        Ok(list.value)
    }

    async fn execute_batch(&self, requests: &[BatchWireRequest]) -> WiResult<Vec<BatchResponse>> {
        let url = self.url(&["_apis", "wit", "$batch"])?;
        debug!(count = requests.len(), "executing batch write");
        let list: BatchResponseList = self
            .decode(self.request(Method::POST, url).json(&requests))
            .await?;
        Ok(list.value)
    }
}
