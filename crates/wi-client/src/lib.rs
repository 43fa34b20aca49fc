//! # wi-client
//!
//! The remote collaborator boundary.
//!
//! Everything the engine knows about the tracking service lives behind the
//! [`RemoteClient`] trait: saved query lookup, query runs, bulk reads, and
//! batch writes. [`RetryingClient`] wraps any implementation in the
//! single-flight authentication-retry policy, and [`HttpRemoteClient`] is the
//! production REST implementation.

pub mod http;
pub mod remote;
pub mod retry;
pub mod wire;

pub use http::HttpRemoteClient;
pub use remote::{CredentialsProvider, RemoteClient};
pub use retry::{AuthRefreshGate, RetryingClient};
pub use wire::*;
