//! Core error types for Workitems RS
//!
//! One shared taxonomy for the whole engine. Configuration errors are raised
//! locally before any network call; auth errors are the only class the client
//! layer recovers from (once, via credential refresh); transport errors are
//! propagated unchanged.

use thiserror::Error;

use crate::records::WorkItemRecord;

/// Core error type for all work item operations
#[derive(Error, Debug)]
pub enum WiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication expired: {message}")]
    AuthExpired { message: String },

    #[error("Not authorized: {message}")]
    NotAuthorized { message: String },

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Batch update partially failed: {0}")]
    BatchUpdate(#[from] BatchUpdateError),

    #[error("Malformed service data: {0}")]
    Data(String),

    #[error("Operation cancelled")]
    Cancelled,
}

pub type WiResult<T> = Result<T, WiError>;

impl WiError {
    /// Classify an HTTP response status into the error taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::AuthExpired { message },
            403 => Self::NotAuthorized { message },
            _ => Self::Service { status, message },
        }
    }

    /// Whether this failure is recoverable through a credential refresh.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthExpired { .. } | Self::NotAuthorized { .. }
        )
    }
}

/// A single failed operation within a batch write
#[derive(Debug, Clone)]
pub struct BatchUpdateFailure {
    /// Id of the work item whose update was rejected
    pub id: i32,
    /// Error message extracted from the response body
    pub message: String,
}

/// Aggregate outcome of a partially failed batch write.
///
/// Carries both the failures and the records that did update, so callers can
/// keep partial progress and retry only the failed subset.
#[derive(Error, Debug)]
pub struct BatchUpdateError {
    pub successes: Vec<WorkItemRecord>,
    pub failures: Vec<BatchUpdateFailure>,
}

impl std::fmt::Display for BatchUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} operations failed",
            self.failures.len(),
            self.failures.len() + self.successes.len()
        )
    }
}
