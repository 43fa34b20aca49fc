//! # wi-core
//!
//! Core types for Workitems RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and result alias
//! - Work item and link records
//! - JSON patch document types for work item updates
//! - Well-known field reference names

pub mod error;
pub mod fields;
pub mod patch;
pub mod records;

pub use error::*;
pub use patch::*;
pub use records::*;
