//! Todo Client - HTTP client and list synchronisation for the todo server
//!
//! [`HttpClient`] talks to the REST API. [`SyncController`] keeps a local,
//! optimistically updated copy of the pending and completed lists in step
//! with any [`OrderStore`].

pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod sync;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use store::OrderStore;
pub use sync::{RefreshOutcome, SyncController, SyncError, SyncPhase};

// Re-export shared types for convenience
pub use shared::models::{BatchOrderEntry, BatchOrderResponse, Todo, TodoMutation, TodoState};
