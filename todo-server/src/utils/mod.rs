//! Utilities: error re-exports, logging, request middleware

pub mod logger;
pub mod middleware;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
