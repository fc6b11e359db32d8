//! Verdict Core - AST model and rule combination for the Verdict rule engine
//!
//! This crate provides the fundamental types shared by the parser, the
//! evaluator and the SDK:
//! - AST (Abstract Syntax Tree) definitions
//! - Value types for data contexts
//! - Combining several rules under one logical operator
//! - Optional attribute schemas
//! - Error types

pub mod ast;
pub mod combine;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{Ast, ComparisonOp, Literal, LogicalOp, Node};
pub use combine::{combine, combine_with_limit, combine_with_mode, CombineError, CombineMode};
pub use error::CoreError;
pub use types::{Schema, Value};

/// Default limit on rule nesting, shared by the parser and the evaluator
pub const DEFAULT_MAX_DEPTH: usize = 48;

/// Deepest tree an [`Ast`] may hold
///
/// Every tree level costs two levels of JSON nesting, and `serde_json`
/// refuses to read documents nested 128 levels deep. Trees up to this depth
/// still round-trip when embedded in a few levels of surrounding document.
pub const MAX_DEPTH: usize = 60;
