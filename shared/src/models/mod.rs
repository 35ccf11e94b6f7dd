//! Data models
//!
//! Shared between todo-server and todo-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod label;
pub mod todo;

// Re-exports
pub use label::*;
pub use todo::*;
