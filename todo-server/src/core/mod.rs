//! Core module: configuration, shared state, server lifecycle
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - state handed to every handler
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup and runtime failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
