//! Data context validation against schemas

use super::schema::{FieldType, Schema};
use super::value::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Type mismatch
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Required field missing
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    /// Unknown field
    #[error("Unknown field: {field}")]
    UnknownField { field: String },
}

/// Validator for data contexts against schemas
#[derive(Debug, Clone, Default)]
pub struct Validator {
    /// Whether to allow unknown fields
    allow_unknown_fields: bool,
}

impl Validator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow unknown fields in validation
    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_fields = allow;
        self
    }

    /// Validate a data context against a schema, collecting every error
    pub fn validate(
        &self,
        context: &HashMap<String, Value>,
        schema: &Schema,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for name in schema.field_names() {
            if schema.is_required(name) && !context.contains_key(name) {
                errors.push(ValidationError::RequiredFieldMissing {
                    field: name.to_string(),
                });
            }
        }

        // Sorted so the error list is stable across runs
        let mut keys: Vec<&String> = context.keys().collect();
        keys.sort_unstable();

        for field_name in keys {
            let value = &context[field_name];
            match schema.get_field(field_name) {
                Some(field) => {
                    if let Err(err) = self.validate_field(field_name, value, field.field_type) {
                        errors.push(err);
                    }
                }
                None => {
                    if !self.allow_unknown_fields {
                        errors.push(ValidationError::UnknownField {
                            field: field_name.clone(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_field(
        &self,
        field_name: &str,
        value: &Value,
        field_type: FieldType,
    ) -> Result<(), ValidationError> {
        let ok = match field_type {
            FieldType::Boolean => matches!(value, Value::Bool(_)),
            FieldType::Number => matches!(value, Value::Number(_)),
            FieldType::String => matches!(value, Value::String(_)),
            FieldType::Any => true,
        };

        if ok {
            Ok(())
        } else {
            Err(ValidationError::TypeMismatch {
                field: field_name.to_string(),
                expected: field_type.type_name().to_string(),
                actual: value.type_name().to_string(),
            })
        }
    }
}
