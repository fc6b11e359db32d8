//! Abstract Syntax Tree (AST) definitions for Verdict rules
//!
//! - Comparison leaves (`field OP literal`)
//! - Logical nodes (AND / OR / NOT)
//! - Constant rules

pub mod node;
pub mod operator;

pub use node::{Ast, Literal, Node};
pub use operator::{ComparisonOp, LogicalOp};
