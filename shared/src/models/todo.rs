//! Todo Model

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ErrorCode};

/// Maximum title length accepted on create/update
pub const MAX_TITLE_LEN: usize = 255;

/// Status partition of a todo
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TodoState {
    #[default]
    Pending,
    Completed,
}

impl TodoState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// The other partition
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for TodoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(AppError::with_message(
                ErrorCode::TodoInvalidState,
                format!("Unknown todo state: {}", other),
            )),
        }
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Todo entity
///
/// Dates are UTC milliseconds. `order` is the manual sort key inside the
/// todo's partition; it need not be dense, ties fall back to `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: TodoState,
    pub priority: TodoPriority,
    #[cfg_attr(feature = "db", sqlx(rename = "sort_order"))]
    pub order: i64,
    pub active: bool,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    pub has_due_date: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    /// Label names (junction table, populated by application code)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Create todo payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoCreate {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TodoPriority>,
    pub state: Option<TodoState>,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    pub has_due_date: Option<bool>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_by: Option<String>,
}

impl TodoCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_title(&self.title)?;
        validate_date_range(self.start_date, self.due_date)
    }
}

/// Update todo payload
///
/// Order and state are changed through their own operations only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TodoPriority>,
    pub start_date: Option<i64>,
    pub due_date: Option<i64>,
    pub has_due_date: Option<bool>,
    pub labels: Option<Vec<String>>,
    pub updated_by: Option<String>,
}

impl TodoUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_date_range(self.start_date, self.due_date)
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::new(ErrorCode::TodoTitleRequired).with_detail("field", "title"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Title must be at most {} characters", MAX_TITLE_LEN),
        )
        .with_detail("field", "title"));
    }
    Ok(())
}

/// `due_date` must not precede `start_date` when both are present
pub fn validate_date_range(start: Option<i64>, due: Option<i64>) -> AppResult<()> {
    match (start, due) {
        (Some(s), Some(d)) if d < s => Err(AppError::new(ErrorCode::TodoInvalidDateRange)
            .with_detail("start_date", s)
            .with_detail("due_date", d)),
        _ => Ok(()),
    }
}

/// Single order update payload (`PATCH /api/todos/{id}/order`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderUpdate {
    pub order: i64,
}

/// One entry of a batch order update
///
/// `state` is set only for the item that crossed partitions; it is applied
/// after the order write inside the same transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchOrderEntry {
    pub id: i64,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TodoState>,
}

impl BatchOrderEntry {
    pub fn new(id: i64, order: i64) -> Self {
        Self {
            id,
            order,
            state: None,
        }
    }
}

/// Batch order update payload (`POST /api/todos/batch-order`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchOrderRequest {
    pub updates: Vec<BatchOrderEntry>,
}

impl BatchOrderRequest {
    /// Rejects batches naming the same id twice
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(self.updates.len());
        for entry in &self.updates {
            if !seen.insert(entry.id) {
                return Err(AppError::validation("Duplicate id in batch order update")
                    .with_detail("id", entry.id));
            }
        }
        Ok(())
    }
}

/// Batch order update result
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchOrderResponse {
    /// Entries that matched an active todo
    pub updated: usize,
    /// Entries skipped because the id is missing or inactive
    pub skipped: usize,
}

/// Every persistence operation the sync controller dispatches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TodoMutation {
    SetOrder { id: i64, order: i64 },
    BatchOrder { updates: Vec<BatchOrderEntry> },
    Toggle { id: i64 },
    Delete { id: i64 },
}

impl TodoMutation {
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::BatchOrder { updates } => BatchOrderRequest {
                updates: updates.clone(),
            }
            .validate(),
            _ => Ok(()),
        }
    }

    /// Operation name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetOrder { .. } => "set_order",
            Self::BatchOrder { .. } => "batch_order",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
        }
    }
}
