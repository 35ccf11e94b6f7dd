//! List synchronisation
//!
//! Local edits are applied to the view first and persisted afterwards.
//! Refreshes replace the view wholesale unless a newer fetch was issued or a
//! drag happened while they were in flight.

mod controller;
mod view;

pub use controller::SyncController;
pub use view::{RefreshOutcome, SyncPhase, ViewState};

use shared::error::ErrorCode;
use thiserror::Error;

use crate::ClientError;

/// A failed sync operation, kept as a user-visible notification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct SyncError {
    pub operation: &'static str,
    pub message: String,
    pub code: Option<ErrorCode>,
    /// Network or store unavailable, as opposed to a rejected request
    pub transport: bool,
}

impl SyncError {
    pub fn new(operation: &'static str, err: &ClientError) -> Self {
        Self {
            operation,
            message: err.to_string(),
            code: err.code(),
            transport: err.is_transport(),
        }
    }
}
