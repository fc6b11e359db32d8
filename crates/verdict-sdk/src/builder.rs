//! Builder pattern for RuleEngine

use crate::config::EngineConfig;
use crate::engine::RuleEngine;
use crate::error::Result;
use verdict_core::{CombineMode, Schema};

/// Builder for RuleEngine
///
/// # Example
///
/// ```rust,ignore
/// use verdict_sdk::RuleEngineBuilder;
///
/// // Restrict rules to a fixed set of attributes
/// let engine = RuleEngineBuilder::new()
///     .with_attributes(["age", "department", "salary"])
///     .with_max_depth(32)
///     .build()?;
///
/// // From a configuration document
/// let engine = RuleEngineBuilder::new()
///     .with_config(EngineConfig::from_yaml_str(yaml)?)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleEngineBuilder {
    config: EngineConfig,
}

impl RuleEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the nesting limit for parsing and evaluation
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the attribute schema
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.config.schema = Some(schema);
        self
    }

    /// Allow exactly these attributes, with any scalar type
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.schema = Some(Schema::with_attributes("attributes", attributes));
        self
    }

    /// Set the mode used when a combine call does not name one
    pub fn with_default_combine_mode(mut self, mode: CombineMode) -> Self {
        self.config.default_combine_mode = mode;
        self
    }

    /// Enable evaluation tracing
    pub fn trace_evaluations(mut self, enable: bool) -> Self {
        self.config.trace_evaluations = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<RuleEngine> {
        RuleEngine::new(self.config)
    }
}
