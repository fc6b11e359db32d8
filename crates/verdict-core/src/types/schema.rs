//! Attribute schemas
//!
//! A schema lists the attributes a rule may reference and the type each one
//! holds. Schemas are opt-in: without one, any identifier is a valid field
//! and any context key is accepted.

use crate::ast::Literal;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A schema defines the attributes available to rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name
    pub name: String,

    /// Schema description
    #[serde(default)]
    pub description: Option<String>,

    /// Attributes keyed by name
    #[serde(default)]
    pub fields: HashMap<String, SchemaField>,
}

/// An attribute in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Attribute name; filled from the map key when loaded from YAML
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default = "FieldType::any")]
    pub field_type: FieldType,

    /// Whether a data context must supply this attribute
    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: Option<String>,
}

/// Attribute type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Number,
    String,
    /// Any scalar; only the name is checked
    Any,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: HashMap::new(),
        }
    }

    /// Schema accepting the given attribute names with any type
    pub fn with_attributes<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        attributes.into_iter().fold(Self::new(name), |schema, attr| {
            schema.add_field(SchemaField::new(attr, FieldType::Any))
        })
    }

    /// Load a schema from a YAML document
    ///
    /// ```yaml
    /// name: employee
    /// fields:
    ///   age: { type: number, required: true }
    ///   department: { type: string }
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut schema: Schema = serde_yaml::from_str(yaml)?;
        schema.resolve_field_names()?;
        log::debug!("Loaded schema '{}' with {} fields", schema.name, schema.fields.len());
        Ok(schema)
    }

    /// Fill empty field names from their map keys
    ///
    /// Needed after deserializing a schema embedded in a larger document,
    /// where the map key is the only place the name is written.
    pub fn resolve_field_names(&mut self) -> Result<()> {
        for (key, field) in self.fields.iter_mut() {
            if field.name.is_empty() {
                field.name = key.clone();
            } else if &field.name != key {
                return Err(CoreError::InvalidSchema(format!(
                    "field '{}' declared under key '{}'",
                    field.name, key
                )));
            }
        }
        Ok(())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field
    pub fn add_field(mut self, field: SchemaField) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Get a field by name
    pub fn get_field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Check if a field is required
    pub fn is_required(&self, name: &str) -> bool {
        self.fields.get(name).map(|f| f.required).unwrap_or(false)
    }

    /// Attribute names in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl SchemaField {
    /// Create a new field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            description: None,
        }
    }

    /// Mark field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl FieldType {
    fn any() -> Self {
        FieldType::Any
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Any => "any",
        }
    }

    /// Whether a rule literal of this shape may be compared with the field
    pub fn accepts_literal(&self, literal: &Literal) -> bool {
        matches!(
            (self, literal),
            (FieldType::Any, _)
                | (FieldType::Boolean, Literal::Bool(_))
                | (FieldType::Number, Literal::Number(_))
                | (FieldType::String, Literal::String(_))
        )
    }
}
