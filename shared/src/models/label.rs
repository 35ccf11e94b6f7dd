//! Label Model

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Maximum label name length
pub const MAX_LABEL_NAME_LEN: usize = 50;

/// Label entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Label {
    pub id: i64,
    pub name: String,
}

/// Create/rename label payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelInput {
    pub name: String,
}

/// Trim and check a label name
pub fn normalize_label_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Label name is required").with_detail("field", "name"));
    }
    if name.chars().count() > MAX_LABEL_NAME_LEN {
        return Err(AppError::validation(format!(
            "Label name must be at most {} characters",
            MAX_LABEL_NAME_LEN
        ))
        .with_detail("field", "name"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_name() {
        assert_eq!(normalize_label_name("  work ").unwrap(), "work");
        assert!(normalize_label_name("").is_err());
        assert!(normalize_label_name(&"l".repeat(MAX_LABEL_NAME_LEN + 1)).is_err());
        assert!(normalize_label_name(&"l".repeat(MAX_LABEL_NAME_LEN)).is_ok());
    }
}
