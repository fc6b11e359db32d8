//! Integration tests for the rule engine
//!
//! Tests the create / combine / evaluate flow end to end through the SDK.

mod common;

use common::TestEngine;
use serde_json::json;
use std::collections::BTreeMap;
use verdict_sdk::*;

// ============================================================================
// Create and evaluate
// ============================================================================

#[test]
fn test_create_and_evaluate_rules() {
    let engine = TestEngine::new()
        .with_rule(1, "age > 30")
        .with_rule(2, "department = 'Sales'")
        .with_rule(3, "NOT (age > 30)");

    assert!(engine.check(1, json!({"age": 35})));
    assert!(!engine.check(1, json!({"age": 30})));
    assert!(engine.check(2, json!({"department": "Sales"})));
    assert!(!engine.check(3, json!({"age": 35})));
}

#[test]
fn test_nested_rule() {
    let engine = TestEngine::new().with_rule(
        1,
        "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) \
         AND (salary > 50000 OR experience > 5)",
    );

    assert!(engine.check(
        1,
        json!({"age": 35, "department": "Sales", "salary": 60000, "experience": 1})
    ));
    assert!(!engine.check(
        1,
        json!({"age": 35, "department": "Sales", "salary": 40000, "experience": 1})
    ));
}

#[test]
fn test_evaluation_errors() {
    let engine = TestEngine::new().with_rule(1, "age > 30");
    let ast = &engine.rule(1).ast;

    let err = engine.engine.evaluate_json(ast, &json!({"age": "thirty"})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Eval);
    assert!(matches!(
        err,
        SdkError::Eval(verdict_runtime::EvalError::TypeMismatch { .. })
    ));

    let err = engine.engine.evaluate_json(ast, &json!({})).unwrap_err();
    assert_eq!(err.to_string(), "Evaluation error: Field not found: age");

    let err = engine.engine.evaluate_json(ast, &json!([35])).unwrap_err();
    assert!(matches!(
        err,
        SdkError::Eval(verdict_runtime::EvalError::InvalidContext(_))
    ));
}

#[test]
fn test_trace_lists_evaluated_conditions() -> anyhow::Result<()> {
    let engine = TestEngine::new().with_rule(1, "age > 30 AND salary > 50000");
    let context: Context = context_from_json(json!({"age": 35, "salary": 45000}))?;

    let trace = engine.engine.evaluate_with_trace(&engine.rule(1).ast, &context)?;
    assert!(!trace.result);
    let expressions: Vec<&str> = trace.conditions.iter().map(|c| c.expression.as_str()).collect();
    assert_eq!(expressions, vec!["age > 30", "salary > 50000"]);
    assert_eq!(trace.unmatched().count(), 1);
    Ok(())
}

// ============================================================================
// Combine
// ============================================================================

#[test]
fn test_combine_rules_and() -> anyhow::Result<()> {
    let engine = TestEngine::new()
        .with_rule(1, "age > 30")
        .with_rule(2, "department = 'Sales'");

    let combined = engine.engine.combine_rules(
        &[1, 2],
        Some(CombineMode::Explicit(LogicalOp::And)),
        10,
        "senior sales",
        &engine.rules,
    )?;

    assert_eq!(combined.rule_string, "(age > 30) AND (department = 'Sales')");
    assert!(engine.engine.evaluate_json(&combined.ast, &json!({"age": 35, "department": "Sales"}))?);
    assert!(!engine.engine.evaluate_json(&combined.ast, &json!({"age": 20, "department": "Sales"}))?);
    Ok(())
}

#[test]
fn test_combine_shares_inputs() -> anyhow::Result<()> {
    let engine = TestEngine::new()
        .with_rule(1, "age > 30")
        .with_rule(2, "age < 18");

    let combined = engine.engine.combine_rules(&[1, 2], None, 3, "either", &engine.rules)?;
    let children = combined.ast.root().children();
    assert!(std::sync::Arc::ptr_eq(&children[0], engine.rule(1).ast.shared_root()));
    assert!(std::sync::Arc::ptr_eq(&children[1], engine.rule(2).ast.shared_root()));
    Ok(())
}

#[test]
fn test_combine_of_combined_rules() -> anyhow::Result<()> {
    let mut engine = TestEngine::new()
        .with_rule(1, "age > 30")
        .with_rule(2, "department = 'Sales'")
        .with_rule(3, "salary > 50000");

    let both = engine.engine.combine_rules(
        &[1, 2],
        Some(CombineMode::Explicit(LogicalOp::And)),
        4,
        "senior sales",
        &engine.rules,
    )?;
    engine.rules.insert(4, both);

    let any = engine.engine.combine_rules(&[4, 3], None, 5, "senior sales or rich", &engine.rules)?;
    assert_eq!(
        any.rule_string,
        "((age > 30) AND (department = 'Sales')) OR (salary > 50000)"
    );
    assert_eq!(any.ast.depth(), 3);
    assert!(engine
        .engine
        .evaluate_json(&any.ast, &json!({"age": 20, "department": "HR", "salary": 90000}))?);
    Ok(())
}

#[test]
fn test_combine_with_infer_mode() -> anyhow::Result<()> {
    let engine = TestEngine::new()
        .with_rule(1, "a = 1 AND b = 2")
        .with_rule(2, "c = 3 AND d = 4")
        .with_rule(3, "e = 5");

    let combined = engine
        .engine
        .combine_rules(&[1, 2, 3], Some(CombineMode::Infer), 4, "inferred", &engine.rules)?;
    assert_eq!(combined.ast.root().logical_operator(), Some(LogicalOp::And));
    Ok(())
}

#[test]
fn test_combine_errors() {
    let engine = TestEngine::new()
        .with_rule(1, "age > 30")
        .with_rule(2, "age < 18");

    let err = engine
        .engine
        .combine_rules(&[1], None, 2, "lonely", &engine.rules)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Combine);

    let err = engine
        .engine
        .combine_rules(&[1, 2], Some(CombineMode::Explicit(LogicalOp::Not)), 3, "not", &engine.rules)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Combine);

    let err = engine
        .engine
        .combine_rules(&[5, 1], None, 3, "missing", &engine.rules)
        .unwrap_err();
    assert_eq!(err.to_string(), "Combine error: Rules not found: 5");
}

#[test]
fn test_combine_with_other_resolvers() -> anyhow::Result<()> {
    let engine = TestEngine::new()
        .with_rule(1, "age>30")
        .with_rule(2, "age<18");

    let ordered: BTreeMap<RuleId, Rule> = engine.rules.clone().into_iter().collect();
    let combined = engine.engine.combine_rules(&[2, 1], None, 3, "btree", &ordered)?;
    assert_eq!(combined.rule_string, "(age<18) OR (age>30)");

    let lookup = |id: RuleId| engine.rules.get(&id).map(|rule| rule.ast.clone());
    let combined = engine.engine.combine_rules(&[1, 2], None, 4, "closure", &lookup)?;
    assert_eq!(combined.rule_string, "(age > 30) OR (age < 18)");
    Ok(())
}

// ============================================================================
// Schema
// ============================================================================

#[test]
fn test_schema_from_yaml_config() -> anyhow::Result<()> {
    let config = EngineConfig::from_yaml_str(
        r#"
schema:
  name: employee
  fields:
    age: { type: number, required: true }
    department: { type: string }
"#,
    )?;
    let engine = RuleEngine::new(config)?;

    let err = engine.create("age > 'old'").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(engine.create("height > 180").is_err());

    let ast = engine.create("age > 30 AND department = 'Sales'")?;
    assert!(engine.evaluate_json(&ast, &json!({"age": 40, "department": "Sales"}))?);

    // Required attribute missing
    assert!(engine.evaluate_json(&ast, &json!({"department": "Sales"})).is_err());
    // Wrong type for a declared attribute
    assert!(engine.evaluate_json(&ast, &json!({"age": "40", "department": "Sales"})).is_err());
    Ok(())
}

#[test]
fn test_builder_attribute_list() -> anyhow::Result<()> {
    let engine = RuleEngineBuilder::new()
        .with_attributes(["age", "department", "salary", "experience"])
        .build()?;

    assert!(engine.create("age > 30 OR experience > 5").is_ok());
    assert!(engine.create("shoe_size > 9").is_err());
    Ok(())
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_rules_round_trip_through_json() -> anyhow::Result<()> {
    let engine = TestEngine::new().with_rule(1, "NOT (age > 30) OR department != 'HR'");

    let json = serde_json::to_string(engine.rule(1))?;
    let restored: Rule = serde_json::from_str(&json)?;
    assert_eq!(&restored, engine.rule(1));

    let data = json!({"age": 50, "department": "Sales"});
    assert_eq!(
        engine.engine.evaluate_json(&restored.ast, &data)?,
        engine.check(1, data)
    );
    Ok(())
}
