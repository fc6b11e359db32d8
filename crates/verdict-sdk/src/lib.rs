//! Verdict Rule Engine SDK
//!
//! High-level API for creating, combining and evaluating boolean rules
//! over attribute contexts.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod rule;

// Re-export main types
pub use builder::RuleEngineBuilder;
pub use config::EngineConfig;
pub use engine::RuleEngine;
pub use error::{ErrorKind, Result, SdkError};
pub use rule::{Rule, RuleId, RuleResolver};

// Re-export commonly used types from dependencies
pub use verdict_core::{Ast, CombineMode, LogicalOp, Schema, Value};
pub use verdict_runtime::{context_from_json, Context, EvaluationTrace};
