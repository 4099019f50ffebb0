//! Store error types
//!
//! Error codes:
//! - POCKET_TYPE_ERROR (ERROR severity)
//! - POCKET_CATEGORY_NOT_FOUND (ERROR severity)
//! - POCKET_CONFIG_INVALID (ERROR severity)
//! - POCKET_INTERNAL (FATAL severity)
//!
//! Missing data is never an error. Unknown ids and unknown categories on
//! read/remove/clean paths are reported through `Option`/`bool` returns.

use thiserror::Error;

use crate::observability::Severity;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An argument or record field had the wrong JSON type
    #[error("Type error: {0}")]
    Type(String),

    /// Operation requires a category that does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Settings could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Shared state is unusable (poisoned lock)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a type error for a record that is not a JSON object
    pub fn not_an_object(found: &serde_json::Value) -> Self {
        StoreError::Type(format!("record must be an object, got {}", json_type_name(found)))
    }

    /// Create a type error for a field that must hold a string
    pub fn not_a_string(field: &str, found: &serde_json::Value) -> Self {
        StoreError::Type(format!(
            "`{}` must be a string, got {}",
            field,
            json_type_name(found)
        ))
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Type(_) => "POCKET_TYPE_ERROR",
            StoreError::CategoryNotFound(_) => "POCKET_CATEGORY_NOT_FOUND",
            StoreError::Config(_) => "POCKET_CONFIG_INVALID",
            StoreError::Internal(_) => "POCKET_INTERNAL",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreError::Type(_) => Severity::Error,
            StoreError::CategoryNotFound(_) => Severity::Error,
            StoreError::Config(_) => Severity::Error,
            StoreError::Internal(_) => Severity::Fatal,
        }
    }

    /// Returns whether the store behind this error can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Human-readable JSON type name used in error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreError::Type("x".into()).code(), "POCKET_TYPE_ERROR");
        assert_eq!(
            StoreError::CategoryNotFound("users".into()).code(),
            "POCKET_CATEGORY_NOT_FOUND"
        );
        assert_eq!(StoreError::Internal("x".into()).code(), "POCKET_INTERNAL");
    }

    #[test]
    fn test_only_internal_is_fatal() {
        assert!(!StoreError::Type("x".into()).is_fatal());
        assert!(!StoreError::CategoryNotFound("x".into()).is_fatal());
        assert!(StoreError::Internal("lock poisoned".into()).is_fatal());
    }

    #[test]
    fn test_type_error_messages_name_the_type() {
        let err = StoreError::not_a_string("id", &json!(42));
        assert_eq!(err.to_string(), "Type error: `id` must be a string, got number");

        let err = StoreError::not_an_object(&json!([1, 2]));
        assert!(err.to_string().contains("got array"));
    }

    #[test]
    fn test_category_not_found_display() {
        let err = StoreError::CategoryNotFound("ghosts".into());
        assert_eq!(err.to_string(), "Category not found: ghosts");
    }
}
