//! Operators for Verdict rule expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational operators allowed in a comparison leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Equal (=, also written ==)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    Ne,
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    Ge,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    Le,
}

impl ComparisonOp {
    /// Parse the textual form of a comparison operator
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(ComparisonOp::Eq),
            "!=" => Some(ComparisonOp::Ne),
            ">" => Some(ComparisonOp::Gt),
            ">=" => Some(ComparisonOp::Ge),
            "<" => Some(ComparisonOp::Lt),
            "<=" => Some(ComparisonOp::Le),
            _ => None,
        }
    }

    /// Canonical symbol used for display and serialization
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
        }
    }

    /// Returns true for the ordering operators (<, <=, >, >=)
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le
        )
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical operators joining child nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    /// Parse a logical keyword, case-insensitively
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("AND") {
            Some(LogicalOp::And)
        } else if keyword.eq_ignore_ascii_case("OR") {
            Some(LogicalOp::Or)
        } else if keyword.eq_ignore_ascii_case("NOT") {
            Some(LogicalOp::Not)
        } else {
            None
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }

    /// Minimum number of children a node with this operator must have
    pub fn min_arity(&self) -> usize {
        match self {
            LogicalOp::Not => 1,
            LogicalOp::And | LogicalOp::Or => 2,
        }
    }

    /// Maximum number of children, `None` when unbounded
    pub fn max_arity(&self) -> Option<usize> {
        match self {
            LogicalOp::Not => Some(1),
            LogicalOp::And | LogicalOp::Or => None,
        }
    }

    /// Returns true for the binary, N-ary connectives (AND, OR)
    pub fn is_connective(&self) -> bool {
        matches!(self, LogicalOp::And | LogicalOp::Or)
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
