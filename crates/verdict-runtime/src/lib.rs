//! Verdict Runtime - Rule evaluation for the Verdict rule engine
//!
//! Evaluates parsed or deserialized rule ASTs against caller-supplied
//! attribute contexts.

mod comparison;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod trace;

// Re-export main types
pub use context::{context_from_json, context_from_json_str, validate_context, Context};
pub use error::{EvalError, Result};
pub use evaluator::Evaluator;
pub use trace::{ConditionTrace, EvaluationTrace};
