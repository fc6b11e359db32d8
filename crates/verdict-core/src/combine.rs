//! Rule combination
//!
//! Combining wraps the roots of existing rules under one new logical node.
//! Input roots are never flattened or copied: every input becomes exactly
//! one child of the new root, shared by reference count, in the order the
//! caller supplied them.

use crate::ast::{Ast, LogicalOp, Node};
use crate::error::CoreError;
use crate::MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Combine error
#[derive(Error, Debug)]
pub enum CombineError {
    #[error("At least two rules are required to combine, got {got}")]
    TooFew { got: usize },

    #[error("Rules can only be combined with AND or OR, not {0}")]
    UnsupportedOperator(LogicalOp),

    /// Every requested id the caller's store could not resolve, in request order
    #[error("Rules not found: {}", .ids.join(", "))]
    UnknownRule { ids: Vec<String> },

    #[error("Combined rule would have depth {depth}, over the limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// How the operator of a combined rule is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// Use the operator given by the caller
    Explicit(LogicalOp),
    /// Use the most frequent AND/OR among the inputs' root nodes; ties and
    /// inputs without a logical root resolve to OR
    Infer,
}

impl Default for CombineMode {
    fn default() -> Self {
        CombineMode::Explicit(LogicalOp::Or)
    }
}

impl CombineMode {
    /// Resolve the operator this mode selects for the given inputs
    pub fn resolve(&self, asts: &[Ast]) -> LogicalOp {
        match self {
            CombineMode::Explicit(op) => *op,
            CombineMode::Infer => infer_operator(asts),
        }
    }
}

/// Combine rules under an explicit AND/OR operator
pub fn combine(asts: &[Ast], operator: LogicalOp) -> Result<Ast, CombineError> {
    combine_with_limit(asts, operator, MAX_DEPTH)
}

/// Combine rules, failing if the result would be deeper than `max_depth`
///
/// `max_depth` is capped at [`MAX_DEPTH`].
pub fn combine_with_limit(asts: &[Ast], operator: LogicalOp, max_depth: usize) -> Result<Ast, CombineError> {
    if !operator.is_connective() {
        return Err(CombineError::UnsupportedOperator(operator));
    }
    if asts.len() < 2 {
        return Err(CombineError::TooFew { got: asts.len() });
    }

    let limit = max_depth.min(MAX_DEPTH);
    let depth = 1 + asts.iter().map(Ast::depth).max().unwrap_or(0);
    if depth > limit {
        return Err(CombineError::DepthExceeded { depth, limit });
    }

    let children: Vec<Arc<Node>> = asts.iter().map(|ast| Arc::clone(ast.shared_root())).collect();
    let root = Node::logical(operator, children)?;

    log::debug!("Combined {} rules with {}", asts.len(), operator);
    Ok(Ast::new(root)?)
}

/// Combine rules, choosing the operator according to `mode`
pub fn combine_with_mode(asts: &[Ast], mode: CombineMode) -> Result<Ast, CombineError> {
    let operator = mode.resolve(asts);
    combine(asts, operator)
}

fn infer_operator(asts: &[Ast]) -> LogicalOp {
    let (mut and, mut or) = (0usize, 0usize);
    for ast in asts {
        match ast.root().logical_operator() {
            Some(LogicalOp::And) => and += 1,
            Some(LogicalOp::Or) => or += 1,
            _ => {}
        }
    }

    let op = if and > or { LogicalOp::And } else { LogicalOp::Or };
    log::debug!("Inferred combine operator {} (AND: {}, OR: {})", op, and, or);
    op
}
