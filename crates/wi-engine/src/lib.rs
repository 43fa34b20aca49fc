//! # wi-engine
//!
//! The work item query engine.
//!
//! [`QueryExecutor`] is the single entry point: it validates a
//! [`QueryRequest`], resolves it to a query run against the remote service,
//! pages the result set through [`BatchFetcher`], and assembles a
//! [`Hierarchy`] when the run is relational. [`BatchUpdateExecutor`] is its
//! peer for multi-operation writes.

pub mod executor;
pub mod fetch;
pub mod hierarchy;
pub mod request;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::{QueryExecutor, QueryOutcome};
pub use fetch::{BatchFetcher, MAX_BATCH_SIZE};
pub use hierarchy::{Hierarchy, HierarchyBuilder, HierarchyNode};
pub use request::{QueryRequest, QuerySelector};
pub use update::BatchUpdateExecutor;
