//! Evaluation tracing types
//!
//! A trace records the comparisons that were actually evaluated, in
//! evaluation order. Comparisons skipped by short-circuiting do not appear.

use serde::{Deserialize, Serialize};
use verdict_core::Value;

/// Trace of a single comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTrace {
    /// The comparison as written, e.g. "age > 30"
    pub expression: String,

    /// Field read from the context
    pub field: String,

    /// Operator symbol
    pub operator: String,

    /// Value the context held for the field
    pub left_value: Value,

    /// Literal from the rule
    pub right_value: Value,

    pub result: bool,
}

/// Outcome of a traced evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    /// The rule's verdict
    pub result: bool,

    /// Evaluated comparisons in order
    pub conditions: Vec<ConditionTrace>,

    /// Execution time in microseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_us: Option<u64>,
}

impl EvaluationTrace {
    pub fn new(result: bool, conditions: Vec<ConditionTrace>) -> Self {
        Self {
            result,
            conditions,
            execution_time_us: None,
        }
    }

    /// Set execution time
    pub fn with_execution_time(mut self, micros: u64) -> Self {
        self.execution_time_us = Some(micros);
        self
    }

    /// Comparisons that held
    pub fn matched(&self) -> impl Iterator<Item = &ConditionTrace> {
        self.conditions.iter().filter(|c| c.result)
    }

    /// Comparisons that did not hold
    pub fn unmatched(&self) -> impl Iterator<Item = &ConditionTrace> {
        self.conditions.iter().filter(|c| !c.result)
    }
}
