//! Shared types for the todo workspace
//!
//! Models and wire DTOs, the unified error/response types, and the pure
//! list reordering engine used by the sync controller.

pub mod error;
pub mod models;
pub mod reorder;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Todo, TodoMutation, TodoState};
