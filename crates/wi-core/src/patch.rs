//! JSON patch documents for work item updates
//!
//! Work item writes go over the wire as `application/json-patch+json`
//! documents; field edits live under the `/fields/` prefix.

use serde::{Deserialize, Serialize};

/// JSON patch operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
    Test,
}

/// A single JSON patch operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
}

impl PatchOperation {
    /// Field-edit operation under the `/fields/` prefix
    pub fn field(op: PatchOp, field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            op,
            path: format!("/fields/{field}"),
            from: None,
            value: value.into(),
        }
    }
}

/// An ordered JSON patch document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(Vec<PatchOperation>);

impl PatchDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a work item field (builder pattern)
    pub fn set_field(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.0.push(PatchOperation::field(PatchOp::Add, field, value));
        self
    }

    /// Remove a work item field (builder pattern)
    pub fn remove_field(mut self, field: &str) -> Self {
        self.0
            .push(PatchOperation::field(PatchOp::Remove, field, serde_json::Value::Null));
        self
    }

    pub fn push(&mut self, operation: PatchOperation) {
        self.0.push(operation);
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One work item update within a batch write
#[derive(Debug, Clone)]
pub struct BatchUpdateRequest {
    pub id: i32,
    pub patch: PatchDocument,
}

impl BatchUpdateRequest {
    pub fn new(id: i32, patch: PatchDocument) -> Self {
        Self { id, patch }
    }
}
