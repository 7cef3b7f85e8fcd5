//! Error types for DDL synthesis.

/// Errors that can occur while turning a change command into DDL.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The target object is missing a field required by the change.
    #[error("Invalid {object}: {message}")]
    Validation {
        /// Kind of object that failed validation (e.g. "column", "view").
        object: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The dialect has no statement form for the requested change.
    #[error("Operation '{operation}' is not supported by the {dialect} dialect")]
    UnsupportedOperation {
        /// Dialect name.
        dialect: &'static str,
        /// The operation that was requested.
        operation: String,
    },

    /// No dialect is registered under the given name.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// IO error (reading command files, writing scripts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DdlError {
    /// Creates a validation error.
    pub fn validation(object: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            object,
            message: message.into(),
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(dialect: &'static str, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            dialect,
            operation: operation.into(),
        }
    }
}

/// Result type for DDL synthesis.
pub type Result<T> = std::result::Result<T, DdlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DdlError::validation("view", "View definition cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid view: View definition cannot be empty"
        );

        let err = DdlError::unsupported("mysql", "create materialized view");
        assert_eq!(
            err.to_string(),
            "Operation 'create materialized view' is not supported by the mysql dialect"
        );
    }
}
