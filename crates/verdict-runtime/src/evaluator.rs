//! Rule evaluator
//!
//! Walks an AST against a context and produces a boolean verdict. AND stops
//! at the first false child and OR at the first true one; errors in the
//! children that were skipped are never raised.

use crate::comparison::compare;
use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::trace::{ConditionTrace, EvaluationTrace};
use std::time::Instant;
use verdict_core::{Ast, LogicalOp, Node, Value, DEFAULT_MAX_DEPTH};

/// Rule evaluator
///
/// Stateless apart from its depth limit; one evaluator can be shared by any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail evaluation of trees deeper than `max_depth`
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate a rule against a context
    pub fn evaluate(&self, ast: &Ast, context: &Context) -> Result<bool> {
        let result = self.eval_node(ast.root(), context, 1, &mut None)?;
        tracing::trace!("Rule {} evaluated to {}", ast, result);
        Ok(result)
    }

    /// Evaluate a rule and record every comparison that was evaluated
    pub fn evaluate_with_trace(&self, ast: &Ast, context: &Context) -> Result<EvaluationTrace> {
        let start = Instant::now();
        let mut conditions = Vec::new();
        let result = self.eval_node(ast.root(), context, 1, &mut Some(&mut conditions))?;

        tracing::debug!(
            "Rule {} evaluated to {} ({} comparisons)",
            ast,
            result,
            conditions.len()
        );
        let micros = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        Ok(EvaluationTrace::new(result, conditions).with_execution_time(micros))
    }

    fn eval_node(
        &self,
        node: &Node,
        context: &Context,
        depth: usize,
        trace: &mut Option<&mut Vec<ConditionTrace>>,
    ) -> Result<bool> {
        if depth > self.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        match node {
            Node::Literal { value } => Ok(*value),

            Node::Comparison { field, operator, value } => {
                let actual = context.get(field).ok_or_else(|| EvalError::MissingField {
                    field: field.clone(),
                })?;
                let result = compare(field, actual, *operator, value)?;

                if let Some(conditions) = trace.as_deref_mut() {
                    conditions.push(ConditionTrace {
                        expression: node.to_string(),
                        field: field.clone(),
                        operator: operator.symbol().to_string(),
                        left_value: actual.clone(),
                        right_value: Value::from(value.clone()),
                        result,
                    });
                }
                Ok(result)
            }

            Node::Logical {
                operator: LogicalOp::And,
                children,
            } => {
                for child in children {
                    if !self.eval_node(child, context, depth + 1, trace)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            Node::Logical {
                operator: LogicalOp::Or,
                children,
            } => {
                for child in children {
                    if self.eval_node(child, context, depth + 1, trace)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            Node::Logical {
                operator: LogicalOp::Not,
                children,
            } => {
                // Ast construction guarantees exactly one child
                let child = &children[0];
                Ok(!self.eval_node(child, context, depth + 1, trace)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use verdict_core::ComparisonOp;

    fn ctx(pairs: &[(&str, Value)]) -> Context {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn cmp(field: &str, op: ComparisonOp, value: f64) -> Arc<Node> {
        Arc::new(Node::comparison(field, op, value))
    }

    fn ast(op: LogicalOp, children: Vec<Arc<Node>>) -> Ast {
        Ast::new(Node::logical(op, children).unwrap()).unwrap()
    }

    #[test]
    fn test_single_comparison() {
        let rule = Ast::new(Node::comparison("age", ComparisonOp::Gt, 30.0)).unwrap();
        let evaluator = Evaluator::new();
        assert!(evaluator.evaluate(&rule, &ctx(&[("age", Value::from(35.0))])).unwrap());
        assert!(!evaluator.evaluate(&rule, &ctx(&[("age", Value::from(25.0))])).unwrap());
    }

    #[test]
    fn test_literal() {
        let evaluator = Evaluator::new();
        let empty = Context::new();
        assert!(evaluator.evaluate(&Ast::new(Node::literal(true)).unwrap(), &empty).unwrap());
        assert!(!evaluator.evaluate(&Ast::new(Node::literal(false)).unwrap(), &empty).unwrap());
    }

    #[test]
    fn test_not() {
        let rule = Ast::new(Node::not(cmp("age", ComparisonOp::Gt, 30.0))).unwrap();
        assert!(!Evaluator::new()
            .evaluate(&rule, &ctx(&[("age", Value::from(35.0))]))
            .unwrap());
    }

    #[test]
    fn test_and_short_circuits_past_errors() {
        // `missing` would fail, but the first child already decides
        let rule = ast(
            LogicalOp::And,
            vec![cmp("age", ComparisonOp::Gt, 30.0), cmp("missing", ComparisonOp::Eq, 1.0)],
        );
        let context = ctx(&[("age", Value::from(20.0))]);
        assert!(!Evaluator::new().evaluate(&rule, &context).unwrap());
    }

    #[test]
    fn test_or_short_circuits_past_errors() {
        let rule = ast(
            LogicalOp::Or,
            vec![cmp("age", ComparisonOp::Gt, 30.0), cmp("missing", ComparisonOp::Eq, 1.0)],
        );
        let context = ctx(&[("age", Value::from(40.0))]);
        assert!(Evaluator::new().evaluate(&rule, &context).unwrap());
    }

    #[test]
    fn test_error_in_evaluated_child_surfaces() {
        let rule = ast(
            LogicalOp::Or,
            vec![cmp("age", ComparisonOp::Gt, 30.0), cmp("missing", ComparisonOp::Eq, 1.0)],
        );
        let context = ctx(&[("age", Value::from(20.0))]);
        assert_eq!(
            Evaluator::new().evaluate(&rule, &context),
            Err(EvalError::MissingField {
                field: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut node = cmp("x", ComparisonOp::Eq, 1.0);
        for _ in 0..4 {
            node = Arc::new(Node::not(node));
        }
        let rule = Ast::from_shared(node).unwrap();
        let context = ctx(&[("x", Value::from(1.0))]);

        assert!(Evaluator::new().with_max_depth(5).evaluate(&rule, &context).unwrap());
        assert_eq!(
            Evaluator::new().with_max_depth(4).evaluate(&rule, &context),
            Err(EvalError::DepthExceeded { limit: 4 })
        );
    }

    #[test]
    fn test_trace_records_only_evaluated_comparisons() {
        let rule = ast(
            LogicalOp::And,
            vec![
                cmp("age", ComparisonOp::Gt, 30.0),
                cmp("salary", ComparisonOp::Ge, 50000.0),
                cmp("experience", ComparisonOp::Gt, 5.0),
            ],
        );
        let context = ctx(&[
            ("age", Value::from(35.0)),
            ("salary", Value::from(40000.0)),
            ("experience", Value::from(10.0)),
        ]);

        let trace = Evaluator::new().evaluate_with_trace(&rule, &context).unwrap();
        assert!(!trace.result);
        assert_eq!(trace.conditions.len(), 2);
        assert_eq!(trace.conditions[0].expression, "age > 30");
        assert!(trace.conditions[0].result);
        assert_eq!(trace.conditions[1].field, "salary");
        assert_eq!(trace.conditions[1].operator, ">=");
        assert_eq!(trace.conditions[1].left_value, Value::Number(40000.0));
        assert!(!trace.conditions[1].result);
        assert!(trace.execution_time_us.is_some());
    }

    #[test]
    fn test_trace_agrees_with_evaluate() {
        let rule = ast(
            LogicalOp::Or,
            vec![cmp("a", ComparisonOp::Lt, 0.0), cmp("b", ComparisonOp::Eq, 2.0)],
        );
        let context = ctx(&[("a", Value::from(1.0)), ("b", Value::from(2.0))]);
        let evaluator = Evaluator::new();
        assert_eq!(
            evaluator.evaluate(&rule, &context).unwrap(),
            evaluator.evaluate_with_trace(&rule, &context).unwrap().result
        );
    }
}
