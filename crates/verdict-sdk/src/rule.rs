//! Stored rules and rule lookup
//!
//! The engine never owns a rule store. Callers keep rules wherever they
//! like and hand the engine a [`RuleResolver`] when combining by id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use verdict_core::Ast;

/// Caller-assigned rule identifier
pub type RuleId = u64;

/// A named rule with its source text and parsed tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    /// Source text; for combined rules, the inputs' text joined by the operator
    pub rule_string: String,
    pub ast: Ast,
}

impl Rule {
    pub fn new(id: RuleId, name: impl Into<String>, rule_string: impl Into<String>, ast: Ast) -> Self {
        Self {
            id,
            name: name.into(),
            rule_string: rule_string.into(),
            ast,
        }
    }
}

/// Lookup of rules by id
pub trait RuleResolver {
    /// Tree of the rule with the given id
    fn resolve(&self, id: RuleId) -> Option<Ast>;

    /// Source text of the rule; defaults to the rendered tree
    fn rule_string(&self, id: RuleId) -> Option<String> {
        self.resolve(id).map(|ast| ast.to_string())
    }
}

impl RuleResolver for HashMap<RuleId, Rule> {
    fn resolve(&self, id: RuleId) -> Option<Ast> {
        self.get(&id).map(|rule| rule.ast.clone())
    }

    fn rule_string(&self, id: RuleId) -> Option<String> {
        self.get(&id).map(|rule| rule.rule_string.clone())
    }
}

impl RuleResolver for BTreeMap<RuleId, Rule> {
    fn resolve(&self, id: RuleId) -> Option<Ast> {
        self.get(&id).map(|rule| rule.ast.clone())
    }

    fn rule_string(&self, id: RuleId) -> Option<String> {
        self.get(&id).map(|rule| rule.rule_string.clone())
    }
}

impl<F> RuleResolver for F
where
    F: Fn(RuleId) -> Option<Ast>,
{
    fn resolve(&self, id: RuleId) -> Option<Ast> {
        self(id)
    }
}
