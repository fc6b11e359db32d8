//! RuleEngine - Main API for creating, combining and evaluating rules

use crate::config::EngineConfig;
use crate::error::Result;
use crate::rule::{Rule, RuleId, RuleResolver};
use verdict_core::{combine_with_limit, Ast, CombineError, CombineMode};
use verdict_parser::RuleParser;
use verdict_runtime::{context_from_json, validate_context, Context, EvaluationTrace, Evaluator};

/// Main rule engine
///
/// Holds configuration only. Rules are returned to the caller and passed
/// back in for evaluation, so one engine can serve any number of threads.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    parser: RuleParser,
    evaluator: Evaluator,
    config: EngineConfig,
}

impl RuleEngine {
    /// Create a new rule engine from configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let mut parser = RuleParser::new().with_max_depth(config.max_depth);
        if let Some(schema) = &config.schema {
            parser = parser.with_schema(schema.clone());
        }
        let evaluator = Evaluator::new().with_max_depth(config.max_depth);

        tracing::debug!(
            "Rule engine ready (max_depth: {}, schema: {})",
            config.max_depth,
            config.schema.as_ref().map(|s| s.name.as_str()).unwrap_or("none")
        );

        Ok(Self {
            parser,
            evaluator,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Rule creation ==========

    /// Parse a rule string
    pub fn create(&self, rule_string: &str) -> Result<Ast> {
        match self.parser.parse(rule_string) {
            Ok(ast) => {
                tracing::debug!("Created rule: {}", ast);
                Ok(ast)
            }
            Err(e) => {
                tracing::warn!("Rejected rule {:?}: {}", rule_string, e);
                Err(e.into())
            }
        }
    }

    /// Parse a rule string into a named rule
    pub fn create_rule(&self, id: RuleId, name: impl Into<String>, rule_string: &str) -> Result<Rule> {
        let ast = self.create(rule_string)?;
        Ok(Rule::new(id, name, rule_string, ast))
    }

    /// Build a new version of `rule` with a new name and/or rule string
    ///
    /// `rule` itself is left untouched; trees shared with combined rules
    /// keep their old shape.
    pub fn update_rule(&self, rule: &Rule, name: Option<&str>, rule_string: Option<&str>) -> Result<Rule> {
        let (rule_string, ast) = match rule_string {
            Some(text) => (text.to_string(), self.create(text)?),
            None => (rule.rule_string.clone(), rule.ast.clone()),
        };
        let name = name.map(str::to_string).unwrap_or_else(|| rule.name.clone());

        tracing::info!("Updated rule {} ({})", rule.id, name);
        Ok(Rule::new(rule.id, name, rule_string, ast))
    }

    // ========== Combination ==========

    /// Combine trees under one logical operator
    ///
    /// `None` uses the configured default mode. A result deeper than the
    /// configured `max_depth` is refused.
    pub fn combine(&self, asts: &[Ast], mode: Option<CombineMode>) -> Result<Ast> {
        let mode = mode.unwrap_or(self.config.default_combine_mode);
        Ok(combine_with_limit(asts, mode.resolve(asts), self.config.max_depth)?)
    }

    /// Combine stored rules by id into a new named rule
    ///
    /// Ids are resolved in the order given; every id the resolver does not
    /// know is reported together. The combined rule string wraps each input
    /// in parentheses: `(r1) AND (r2)`.
    pub fn combine_rules<R>(
        &self,
        ids: &[RuleId],
        mode: Option<CombineMode>,
        id: RuleId,
        name: impl Into<String>,
        resolver: &R,
    ) -> Result<Rule>
    where
        R: RuleResolver + ?Sized,
    {
        let mut asts = Vec::with_capacity(ids.len());
        let mut texts = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for rule_id in ids {
            match resolver.resolve(*rule_id) {
                Some(ast) => {
                    texts.push(resolver.rule_string(*rule_id).unwrap_or_else(|| ast.to_string()));
                    asts.push(ast);
                }
                None => missing.push(rule_id.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(CombineError::UnknownRule { ids: missing }.into());
        }

        let mode = mode.unwrap_or(self.config.default_combine_mode);
        let operator = mode.resolve(&asts);
        let combined = combine_with_limit(&asts, operator, self.config.max_depth)?;

        let separator = format!(" {} ", operator);
        let rule_string = texts
            .iter()
            .map(|text| format!("({})", text))
            .collect::<Vec<_>>()
            .join(separator.as_str());

        let name = name.into();
        tracing::info!("Combined rules {:?} with {} into rule {} ({})", ids, operator, id, name);
        Ok(Rule::new(id, name, rule_string, combined))
    }

    // ========== Evaluation ==========

    /// Evaluate a rule against a context
    pub fn evaluate(&self, ast: &Ast, context: &Context) -> Result<bool> {
        self.check_context(context)?;

        if self.config.trace_evaluations {
            return Ok(self.traced(ast, context)?.result);
        }
        Ok(self.evaluator.evaluate(ast, context)?)
    }

    /// Evaluate a rule against a JSON object
    pub fn evaluate_json(&self, ast: &Ast, data: &serde_json::Value) -> Result<bool> {
        let context = context_from_json(data.clone())?;
        self.evaluate(ast, &context)
    }

    /// Evaluate a rule and report every comparison that was evaluated
    pub fn evaluate_with_trace(&self, ast: &Ast, context: &Context) -> Result<EvaluationTrace> {
        self.check_context(context)?;
        self.traced(ast, context)
    }

    fn traced(&self, ast: &Ast, context: &Context) -> Result<EvaluationTrace> {
        let trace = self.evaluator.evaluate_with_trace(ast, context)?;
        for condition in &trace.conditions {
            tracing::debug!(
                "  {} [{} = {:?}] -> {}",
                condition.expression,
                condition.field,
                condition.left_value,
                condition.result
            );
        }
        Ok(trace)
    }

    fn check_context(&self, context: &Context) -> Result<()> {
        if let Some(schema) = &self.config.schema {
            validate_context(context, schema)?;
        }
        Ok(())
    }
}
