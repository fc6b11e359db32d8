//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use verdict_sdk::{EngineConfig, Rule, RuleEngine, RuleId};

/// Test helper holding an engine and the rules created through it
pub struct TestEngine {
    pub engine: RuleEngine,
    pub rules: HashMap<RuleId, Rule>,
}

impl TestEngine {
    /// Create a test engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: RuleEngine::new(config).expect("test config should be valid"),
            rules: HashMap::new(),
        }
    }

    /// Parse and store a rule
    pub fn with_rule(mut self, id: RuleId, rule_string: &str) -> Self {
        let rule = self
            .engine
            .create_rule(id, format!("rule_{}", id), rule_string)
            .expect("test rule should parse");
        self.rules.insert(id, rule);
        self
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[&id]
    }

    /// Evaluate a stored rule against JSON data, panicking on error
    pub fn check(&self, id: RuleId, data: JsonValue) -> bool {
        self.engine
            .evaluate_json(&self.rule(id).ast, &data)
            .expect("evaluation should succeed")
    }
}
