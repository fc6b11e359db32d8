//! Comparison operator execution

use crate::error::{EvalError, Result};
use verdict_core::{ComparisonOp, Literal, Value};

/// Compare a context value against a rule literal
///
/// Numbers support every operator. Strings and booleans only support `=`
/// and `!=`. Anything else, including null and container values, is a
/// type mismatch.
pub(crate) fn compare(field: &str, actual: &Value, op: ComparisonOp, expected: &Literal) -> Result<bool> {
    match (actual, op, expected) {
        (Value::Number(l), ComparisonOp::Eq, Literal::Number(r)) => Ok(l == r),
        (Value::Number(l), ComparisonOp::Ne, Literal::Number(r)) => Ok(l != r),
        (Value::Number(l), ComparisonOp::Gt, Literal::Number(r)) => Ok(l > r),
        (Value::Number(l), ComparisonOp::Ge, Literal::Number(r)) => Ok(l >= r),
        (Value::Number(l), ComparisonOp::Lt, Literal::Number(r)) => Ok(l < r),
        (Value::Number(l), ComparisonOp::Le, Literal::Number(r)) => Ok(l <= r),

        (Value::String(l), ComparisonOp::Eq, Literal::String(r)) => Ok(l == r),
        (Value::String(l), ComparisonOp::Ne, Literal::String(r)) => Ok(l != r),

        (Value::Bool(l), ComparisonOp::Eq, Literal::Bool(r)) => Ok(l == r),
        (Value::Bool(l), ComparisonOp::Ne, Literal::Bool(r)) => Ok(l != r),

        _ => {
            tracing::debug!(
                "Cannot compare {} value of '{}' with {} {}",
                actual.type_name(),
                field,
                op,
                expected
            );
            // Ordering needs numbers on both sides, even when the types agree
            let expected_type = if op.is_ordering() {
                "number"
            } else {
                expected.type_name()
            };
            Err(EvalError::TypeMismatch {
                field: field.to_string(),
                expected: expected_type.to_string(),
                got: actual.type_name().to_string(),
            })
        }
    }
}
