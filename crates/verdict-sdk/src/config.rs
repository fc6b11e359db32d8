//! Configuration types for RuleEngine

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use verdict_core::{CombineMode, Schema, DEFAULT_MAX_DEPTH, MAX_DEPTH};

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nesting limit applied by the parser, the combiner and the evaluator;
    /// between 1 and [`MAX_DEPTH`]
    pub max_depth: usize,

    /// Attribute schema; when set, rules may only reference declared
    /// attributes and contexts are validated before evaluation
    pub schema: Option<Schema>,

    /// Mode used when a combine call does not name one
    pub default_combine_mode: CombineMode,

    /// Log every evaluated comparison at debug level
    pub trace_evaluations: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            schema: None,
            default_combine_mode: CombineMode::default(),
            trace_evaluations: false,
        }
    }

    /// Load configuration from a YAML document
    ///
    /// ```yaml
    /// max_depth: 32
    /// default_combine_mode: infer
    /// schema:
    ///   name: employee
    ///   fields:
    ///     age: { type: number }
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| SdkError::Config(e.to_string()))?;
        if let Some(schema) = config.schema.as_mut() {
            schema.resolve_field_names()?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the nesting limit; [`validate`](Self::validate) rejects values
    /// above [`MAX_DEPTH`]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the attribute schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the default combine mode
    pub fn with_default_combine_mode(mut self, mode: CombineMode) -> Self {
        self.default_combine_mode = mode;
        self
    }

    /// Enable evaluation tracing
    pub fn trace_evaluations(mut self, enable: bool) -> Self {
        self.trace_evaluations = enable;
        self
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(SdkError::Config("max_depth must be at least 1".to_string()));
        }
        if self.max_depth > MAX_DEPTH {
            return Err(SdkError::Config(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH, self.max_depth
            )));
        }
        if let CombineMode::Explicit(op) = self.default_combine_mode {
            if !op.is_connective() {
                return Err(SdkError::Config(format!(
                    "default_combine_mode must use AND or OR, not {}",
                    op
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::types::FieldType;
    use verdict_core::LogicalOp;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.schema.is_none());
        assert_eq!(config.default_combine_mode, CombineMode::Explicit(LogicalOp::Or));
        assert!(!config.trace_evaluations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::new()
            .with_max_depth(8)
            .with_schema(Schema::with_attributes("attrs", ["age"]))
            .with_default_combine_mode(CombineMode::Infer)
            .trace_evaluations(true);

        assert_eq!(config.max_depth, 8);
        assert!(config.schema.as_ref().unwrap().contains("age"));
        assert_eq!(config.default_combine_mode, CombineMode::Infer);
        assert!(config.trace_evaluations);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
max_depth: 32
default_combine_mode: infer
trace_evaluations: true
schema:
  name: employee
  fields:
    age: { type: number, required: true }
    department: { type: string }
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.default_combine_mode, CombineMode::Infer);
        assert!(config.trace_evaluations);

        let schema = config.schema.unwrap();
        let age = schema.get_field("age").unwrap();
        assert_eq!(age.name, "age");
        assert_eq!(age.field_type, FieldType::Number);
        assert!(age.required);
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let config = EngineConfig::from_yaml_str("max_depth: 10").unwrap();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.default_combine_mode, CombineMode::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            EngineConfig::from_yaml_str("max_depth: 0"),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml_str("max_depth: [1]"),
            Err(SdkError::Config(_))
        ));

        let config = EngineConfig::new().with_default_combine_mode(CombineMode::Explicit(LogicalOp::Not));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_depth_upper_bound() {
        assert!(EngineConfig::new().with_max_depth(MAX_DEPTH).validate().is_ok());
        assert!(matches!(
            EngineConfig::new().with_max_depth(MAX_DEPTH + 1).validate(),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::new().with_max_depth(1_000_000).validate(),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml_str("max_depth: 1000000"),
            Err(SdkError::Config(_))
        ));
    }
}
