//! Error types for sqlres

use thiserror::Error;

use crate::request::Operator;

/// Result type alias for statement generation operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement generation and sequence execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// User-correctable request error
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequest),

    /// Execution failure; carries the exact statement that was attempted
    #[error("Statement failed: {source} (sql: {sql})")]
    Resource {
        sql: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Unknown dialect name in configuration
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),
}

/// Request errors the caller can correct and resubmit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRequest {
    /// A read-only column was named as a request parameter
    #[error("Parameter names read-only column '{0}'")]
    ReadOnlyParam(String),

    /// A filter clause was emitted but no parameter matched a queryable column
    #[error("Request parameters matched no queryable column")]
    NoValidParams,

    /// An operator with no SQL rendering reached value rendering
    #[error("Operator {0:?} has no SQL rendering")]
    UnmappedOperator(Operator),

    /// A value could not be coerced to its column's type
    #[error("Value '{value}' is not valid for column '{column}'")]
    BadValue { column: String, value: String },
}

impl SqlError {
    /// Create a resource error for a failed statement
    pub fn resource(
        sql: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Resource {
            sql: sql.into(),
            source: source.into(),
        }
    }

    /// Check if this is a user-correctable request error
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// The exact SQL text of a failed execution, if any
    pub fn attempted_sql(&self) -> Option<&str> {
        match self {
            Self::Resource { sql, .. } => Some(sql),
            _ => None,
        }
    }
}
