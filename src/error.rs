//! Error types for boiling.

use thiserror::Error;

/// The main error type for boiling operations.
#[derive(Debug, Error)]
pub enum BoilingError {
    /// Failed to parse a filter expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A query was requested without a boolean expression.
    #[error("Missing filter expression: a query needs at least one comparison")]
    MissingExpression,

    /// Column name not present in the registry.
    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    /// Invalid value.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoilingError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for boiling operations.
pub type BoilingResult<T> = Result<T, BoilingError>;
