//! Quickstart example
//!
//! This example demonstrates:
//! - Creating rules from rule strings
//! - Combining stored rules by id
//! - Evaluating rules against JSON data, with and without a trace
//!
//! Run with `RUST_LOG=debug` to see the engine's log output.

use serde_json::json;
use std::collections::HashMap;
use verdict_sdk::{CombineMode, LogicalOp, RuleEngineBuilder};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Verdict Quickstart ===\n");

    let engine = RuleEngineBuilder::new()
        .with_attributes(["age", "department", "salary", "experience"])
        .trace_evaluations(true)
        .build()?;

    let mut rules = HashMap::new();
    for (id, name, text) in [
        (1, "senior", "age > 30"),
        (2, "sales", "department = 'Sales'"),
        (3, "well paid", "salary > 50000 OR experience > 5"),
    ] {
        let rule = engine.create_rule(id, name, text)?;
        println!("Rule {} ({}): {}", rule.id, rule.name, rule.ast);
        rules.insert(id, rule);
    }

    let senior_sales = engine.combine_rules(
        &[1, 2, 3],
        Some(CombineMode::Explicit(LogicalOp::And)),
        4,
        "senior sales",
        &rules,
    )?;
    println!("\nCombined rule {}: {}", senior_sales.id, senior_sales.rule_string);
    println!("AST:\n{}\n", serde_json::to_string_pretty(&senior_sales.ast)?);

    let people = [
        json!({"age": 35, "department": "Sales", "salary": 60000, "experience": 2}),
        json!({"age": 20, "department": "Sales", "salary": 60000, "experience": 2}),
        json!({"age": 45, "department": "Sales", "salary": 30000, "experience": 12}),
    ];
    for person in &people {
        let verdict = engine.evaluate_json(&senior_sales.ast, person)?;
        println!("{} -> {}", person, verdict);
    }

    let context = verdict_sdk::context_from_json(people[1].clone())?;
    let trace = engine.evaluate_with_trace(&senior_sales.ast, &context)?;
    println!("\nTrace for {}:", people[1]);
    for condition in &trace.conditions {
        println!("  {} -> {}", condition.expression, condition.result);
    }

    match engine.create("age >> 30") {
        Ok(_) => println!("\nUnexpectedly parsed"),
        Err(e) => println!("\nRejected 'age >> 30': {}", e),
    }

    Ok(())
}
