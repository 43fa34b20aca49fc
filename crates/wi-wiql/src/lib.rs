//! # wi-wiql
//!
//! Condition trees and query text generation.
//!
//! Queries against the tracking service are expressed in a restricted SQL
//! dialect. This crate builds boolean condition trees and serializes them,
//! together with column selection, ordering, and an as-of timestamp, into the
//! exact text the service accepts.

pub mod condition;
pub mod operators;
pub mod sorts;
pub mod statement;

pub use condition::*;
pub use operators::*;
pub use sorts::*;
pub use statement::*;
