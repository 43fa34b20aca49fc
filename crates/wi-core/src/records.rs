//! Work item and link records
//!
//! The flat data shapes returned by the tracking service. Record identity is
//! the numeric work item id; field content never participates in equality,
//! matching the service's own identity semantics.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A work item as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemRecord {
    pub id: i32,
    /// Revision number, present on reads, absent on some batch responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<i32>,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WorkItemRecord {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            rev: None,
            fields: BTreeMap::new(),
            url: None,
        }
    }

    /// Set a field value (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field as a string, if present and textual
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }
}

impl PartialEq for WorkItemRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WorkItemRecord {}

impl Hash for WorkItemRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A parent/child link edge from a relational query result.
///
/// A `source` of `None` marks a hierarchy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub source: Option<i32>,
    pub target: i32,
    pub link_type: Option<String>,
}

impl LinkRecord {
    /// Create a root link (no source)
    pub fn root(target: i32) -> Self {
        Self {
            source: None,
            target,
            link_type: None,
        }
    }

    /// Create a child link
    pub fn child(source: i32, target: i32) -> Self {
        Self {
            source: Some(source),
            target,
            link_type: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.source.is_none()
    }
}

/// How much of each work item the service should materialize on a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpandMode {
    None,
    Relations,
    Fields,
    Links,
    All,
}

impl ExpandMode {
    /// Value used in the `$expand` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Relations => "relations",
            Self::Fields => "fields",
            Self::Links => "links",
            Self::All => "all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_record_identity_by_id() {
        let a = WorkItemRecord::new(7).with_field("System.Title", "one");
        let b = WorkItemRecord::new(7).with_field("System.Title", "another");
        let c = WorkItemRecord::new(8).with_field("System.Title", "one");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_record_deserializes_service_shape() {
        let json = r#"{
            "id": 42,
            "rev": 3,
            "fields": { "System.Title": "Fix login", "System.Id": 42 },
            "url": "https://svc/_apis/wit/workItems/42"
        }"#;
        let record: WorkItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.rev, Some(3));
        assert_eq!(record.field_str("System.Title"), Some("Fix login"));
    }

    #[test]
    fn test_link_root_marker() {
        assert!(LinkRecord::root(1).is_root());
        assert!(!LinkRecord::child(1, 2).is_root());
    }

    #[test]
    fn test_expand_mode_query_values() {
        assert_eq!(ExpandMode::Relations.as_str(), "relations");
        assert_eq!(ExpandMode::All.as_str(), "all");
    }
}
