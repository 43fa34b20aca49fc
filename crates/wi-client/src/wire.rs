//! Wire DTOs
//!
//! JSON shapes exchanged with the tracking service: saved queries, query run
//! results, bulk read envelopes, and the multi-operation batch write format.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wi_core::{BatchUpdateRequest, LinkRecord, WiError, WiResult, WorkItemRecord};

/// A saved query resolved by path or id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiql: Option<String>,
}

/// Result shape of a query run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryType {
    /// Flat work item list
    Flat,
    /// Parent/child edges, unbounded depth
    Tree,
    /// Link edges, one hop from the roots
    OneHop,
}

/// A returned column reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub reference_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A work item reference inside a query run (id only, no fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRef {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A link edge inside a relational query run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<WorkItemRef>,
    pub target: WorkItemRef,
}

impl WorkItemRelation {
    /// Flatten into the engine's link record
    pub fn to_link(&self) -> LinkRecord {
        LinkRecord {
            source: self.source.as_ref().map(|s| s.id),
            target: self.target.id,
            link_type: self.rel.clone(),
        }
    }
}

/// The result of running a query.
///
/// Flat runs carry `work_items`; relational runs carry `work_item_relations`.
/// `as_of` is the timestamp the service actually evaluated the query at,
/// which may differ from the one requested and must be used for the
/// follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRun {
    pub query_type: QueryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub columns: Vec<ColumnRef>,
    #[serde(default)]
    pub work_items: Vec<WorkItemRef>,
    #[serde(default)]
    pub work_item_relations: Vec<WorkItemRelation>,
}

impl QueryRun {
    pub fn is_relational(&self) -> bool {
        !matches!(self.query_type, QueryType::Flat)
    }

    /// Reference names of the returned columns, in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.reference_name.clone())
            .collect()
    }
}

/// Envelope of a bulk work item read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub value: Vec<WorkItemRecord>,
}

/// One operation inside a multi-operation batch write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWireRequest {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    pub body: serde_json::Value,
}

impl BatchWireRequest {
    /// Wrap a work item update into its wire operation.
    pub fn work_item_patch(request: &BatchUpdateRequest) -> WiResult<Self> {
        let body = serde_json::to_value(&request.patch)
            .map_err(|e| WiError::Data(format!("unserializable patch document: {e}")))?;
        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json-patch+json".to_string(),
        );
        Ok(Self {
            method: "PATCH".to_string(),
            uri: format!("/workItems/{}?api-version=1.0", request.id),
            headers,
            body,
        })
    }
}

/// One response inside a batch write reply, parallel to the request list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub code: u16,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl BatchResponse {
    /// Status code the service uses for a successful batched operation
    pub const OK: u16 = 200;

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }
}

/// Envelope of a batch write reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponseList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub value: Vec<BatchResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wi_core::PatchDocument;

    #[test]
    fn test_query_run_flat_deserializes() {
        let json = r#"{
            "queryType": "flat",
            "asOf": "2024-03-01T12:00:00Z",
            "columns": [ { "referenceName": "System.Id", "name": "ID" } ],
            "workItems": [ { "id": 1 }, { "id": 2 } ]
        }"#;
        let run: QueryRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.query_type, QueryType::Flat);
        assert!(!run.is_relational());
        assert_eq!(run.column_names(), vec!["System.Id"]);
        assert_eq!(run.work_items.len(), 2);
        assert!(run.work_item_relations.is_empty());
    }

    #[test]
    fn test_query_run_tree_deserializes() {
        let json = r#"{
            "queryType": "tree",
            "workItemRelations": [
                { "target": { "id": 1 } },
                { "rel": "System.LinkTypes.Hierarchy-Forward",
                  "source": { "id": 1 }, "target": { "id": 2 } }
            ]
        }"#;
        let run: QueryRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.query_type, QueryType::Tree);
        assert!(run.is_relational());

        let links: Vec<_> = run.work_item_relations.iter().map(|r| r.to_link()).collect();
        assert!(links[0].is_root());
        assert_eq!(links[1].source, Some(1));
        assert_eq!(links[1].target, 2);
        assert_eq!(
            links[1].link_type.as_deref(),
            Some("System.LinkTypes.Hierarchy-Forward")
        );
    }

    #[test]
    fn test_one_hop_query_type_spelling() {
        let run: QueryRun = serde_json::from_str(r#"{ "queryType": "oneHop" }"#).unwrap();
        assert_eq!(run.query_type, QueryType::OneHop);
    }

    #[test]
    fn test_batch_wire_request_shape() {
        let update = BatchUpdateRequest::new(
            42,
            PatchDocument::new().set_field("System.State", "Closed"),
        );
        let wire = BatchWireRequest::work_item_patch(&update).unwrap();

        assert_eq!(wire.method, "PATCH");
        assert_eq!(wire.uri, "/workItems/42?api-version=1.0");
        assert_eq!(
            wire.headers.get("Content-Type").map(String::as_str),
            Some("application/json-patch+json")
        );
        assert_eq!(
            wire.body,
            serde_json::json!([
                { "op": "add", "path": "/fields/System.State", "value": "Closed" }
            ])
        );
    }

    #[test]
    fn test_batch_response_ok() {
        let ok = BatchResponse {
            code: 200,
            body: serde_json::json!({ "id": 1 }),
        };
        let rejected = BatchResponse {
            code: 400,
            body: serde_json::json!({ "message": "field is read-only" }),
        };
        assert!(ok.is_ok());
        assert!(!rejected.is_ok());
    }
}
