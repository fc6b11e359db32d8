//! Error types for Verdict Core

use crate::ast::LogicalOp;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{operator} node requires {expected}, got {got}")]
    InvalidArity {
        operator: LogicalOp,
        expected: String,
        got: usize,
    },

    #[error("Tree depth {depth} exceeds the limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("Comparison on '{field}' has a non-finite number literal")]
    NonFiniteLiteral { field: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
