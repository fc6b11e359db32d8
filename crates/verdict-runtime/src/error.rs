//! Runtime error types

use thiserror::Error;
use verdict_core::types::ValidationError;

/// Evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Field referenced by a comparison is absent from the context
    #[error("Field not found: {field}")]
    MissingField { field: String },

    /// Context value and rule literal cannot be compared with the operator
    #[error("Type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    /// Tree nested deeper than the evaluator's limit
    #[error("Rule nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Input could not be turned into a context
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    /// Context rejected by the configured schema
    #[error("Context validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, EvalError>;
