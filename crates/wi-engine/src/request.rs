//! Query request description and validation
//!
//! A [`QueryRequest`] names exactly one project selector and exactly one
//! query selector. Violations are configuration errors raised before any
//! network call.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use wi_core::{ExpandMode, WiError, WiResult};
use wi_wiql::WiqlStatement;

/// Validated description of a query to execute
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// Project selector: exactly one of `project_id` / `project_name`
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub team: Option<String>,
    /// Query selector: exactly one of `query_path` / `query_id` / `query_text`
    pub query_path: Option<String>,
    pub query_id: Option<Uuid>,
    pub query_text: Option<String>,
    /// Fields to materialize on the follow-up fetch (treated as a set)
    pub required_fields: Vec<String>,
    pub expand: Option<ExpandMode>,
    pub as_of: Option<DateTime<Utc>>,
    /// Upper bound on fetched items; the id set is truncated before batching
    pub max_items: Option<usize>,
}

/// The resolved query selector of a valid request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySelector<'a> {
    Path(&'a str),
    Id(Uuid),
    Text(&'a str),
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the project by id (builder pattern)
    pub fn in_project_id(mut self, id: Uuid) -> Self {
        self.project_id = Some(id);
        self
    }

    /// Select the project by name (builder pattern)
    pub fn in_project(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn for_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Run the saved query at this folder path
    pub fn by_path(mut self, path: impl Into<String>) -> Self {
        self.query_path = Some(path.into());
        self
    }

    /// Run the saved query with this id
    pub fn by_id(mut self, id: Uuid) -> Self {
        self.query_id = Some(id);
        self
    }

    /// Run ad-hoc query text
    pub fn by_text(mut self, text: impl Into<String>) -> Self {
        self.query_text = Some(text.into());
        self
    }

    /// Compile a structured statement and run it as ad-hoc text
    pub fn by_statement(self, statement: &WiqlStatement) -> Self {
        self.by_text(statement.to_wiql())
    }

    /// Set the fields to materialize. Duplicates are dropped, first
    /// occurrence wins.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        self.required_fields = unique;
        self
    }

    pub fn with_expand(mut self, expand: ExpandMode) -> Self {
        self.expand = Some(expand);
        self
    }

    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Enforce the exactly-one constraints on both selectors.
    pub fn validate(&self) -> WiResult<()> {
        let projects = self.project_id.is_some() as usize + self.project_name.is_some() as usize;
        if projects != 1 {
            return Err(WiError::Config(
                "exactly one of project_id or project_name must be set".into(),
            ));
        }
        let queries = self.query_path.is_some() as usize
            + self.query_id.is_some() as usize
            + self.query_text.is_some() as usize;
        if queries != 1 {
            return Err(WiError::Config(
                "exactly one of query_path, query_id, or query_text must be set".into(),
            ));
        }
        Ok(())
    }

    /// The project selector as the path segment sent to the service.
    pub fn project(&self) -> WiResult<String> {
        match (&self.project_id, &self.project_name) {
            (Some(id), None) => Ok(id.to_string()),
            (None, Some(name)) => Ok(name.clone()),
            _ => Err(WiError::Config(
                "exactly one of project_id or project_name must be set".into(),
            )),
        }
    }

    /// The query selector of a valid request.
    pub fn query_selector(&self) -> WiResult<QuerySelector<'_>> {
        match (&self.query_path, &self.query_id, &self.query_text) {
            (Some(path), None, None) => Ok(QuerySelector::Path(path)),
            (None, Some(id), None) => Ok(QuerySelector::Id(*id)),
            (None, None, Some(text)) => Ok(QuerySelector::Text(text)),
            _ => Err(WiError::Config(
                "exactly one of query_path, query_id, or query_text must be set".into(),
            )),
        }
    }
}
