//! Evaluation context
//!
//! A context maps attribute names to the values a rule is evaluated
//! against. Contexts are plain maps owned by the caller; the evaluator only
//! reads them.

use crate::error::{EvalError, Result};
use std::collections::HashMap;
use verdict_core::types::Validator;
use verdict_core::{Schema, Value};

/// Attribute values for one evaluation
pub type Context = HashMap<String, Value>;

/// Build a context from a JSON object
///
/// Any other JSON value (array, string, null, ...) is rejected with
/// [`EvalError::InvalidContext`].
pub fn context_from_json(json: serde_json::Value) -> Result<Context> {
    match json {
        serde_json::Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        other => Err(EvalError::InvalidContext(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Build a context from JSON text
pub fn context_from_json_str(json: &str) -> Result<Context> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| EvalError::InvalidContext(e.to_string()))?;
    context_from_json(value)
}

/// Check a context against a schema, rejecting attributes the schema does
/// not declare
pub fn validate_context(context: &Context, schema: &Schema) -> Result<()> {
    Validator::new()
        .validate(context, schema)
        .map_err(EvalError::Validation)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verdict_core::types::{FieldType, SchemaField, ValidationError};

    #[test]
    fn test_context_from_object() {
        let ctx = context_from_json(json!({"age": 35, "department": "Sales", "active": true})).unwrap();
        assert_eq!(ctx.get("age"), Some(&Value::Number(35.0)));
        assert_eq!(ctx.get("department"), Some(&Value::String("Sales".to_string())));
        assert_eq!(ctx.get("active"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_context_from_non_object() {
        let err = context_from_json(json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            EvalError::InvalidContext("expected a JSON object, got array".to_string())
        );
        assert!(context_from_json(json!(null)).is_err());
    }

    #[test]
    fn test_context_from_str() {
        let ctx = context_from_json_str(r#"{"salary": 52000.5}"#).unwrap();
        assert_eq!(ctx.get("salary"), Some(&Value::Number(52000.5)));

        assert!(matches!(
            context_from_json_str("{not json"),
            Err(EvalError::InvalidContext(_))
        ));
    }

    #[test]
    fn test_validate_context() {
        let schema = Schema::new("employee").add_field(SchemaField::new("age", FieldType::Number));

        let mut ctx = Context::new();
        ctx.insert("age".to_string(), Value::Number(30.0));
        assert!(validate_context(&ctx, &schema).is_ok());

        ctx.insert("hobby".to_string(), Value::from("chess"));
        assert_eq!(
            validate_context(&ctx, &schema),
            Err(EvalError::Validation(vec![ValidationError::UnknownField {
                field: "hobby".to_string()
            }]))
        );
    }
}
