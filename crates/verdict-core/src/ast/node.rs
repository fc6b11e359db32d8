//! Rule AST nodes
//!
//! A rule is a tree of [`Node`]s held behind an [`Ast`] handle. Nodes are
//! never mutated after construction: combining rules wraps existing roots
//! under a new node and shares them through `Arc`, so one subtree can sit
//! inside any number of combined rules.

use super::operator::{ComparisonOp, LogicalOp};
use crate::error::{CoreError, Result};
use crate::MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Literal operand on the right-hand side of a comparison
///
/// The variant is fixed by how the literal was written: quoted text is a
/// `String`, a bare number is a `Number`, `true`/`false` is a `Bool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Name of the literal's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

/// AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Leaf testing one field against one literal (e.g., `age > 30`)
    Comparison {
        field: String,
        operator: ComparisonOp,
        value: Literal,
    },

    /// AND / OR over two or more children, or NOT over exactly one
    Logical {
        operator: LogicalOp,
        children: Vec<Arc<Node>>,
    },

    /// Constant rule (`true` / `false`)
    Literal { value: bool },
}

impl Node {
    /// Create a comparison leaf
    pub fn comparison(field: impl Into<String>, operator: ComparisonOp, value: impl Into<Literal>) -> Self {
        Node::Comparison {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create a logical node, checking the operator's arity
    pub fn logical(operator: LogicalOp, children: Vec<Arc<Node>>) -> Result<Self> {
        check_arity(operator, children.len())?;
        Ok(Node::Logical { operator, children })
    }

    /// Create a NOT node over a single child
    pub fn not(child: Arc<Node>) -> Self {
        Node::Logical {
            operator: LogicalOp::Not,
            children: vec![child],
        }
    }

    /// Create a constant node
    pub fn literal(value: bool) -> Self {
        Node::Literal { value }
    }

    /// Logical operator of this node, if it is a logical node
    pub fn logical_operator(&self) -> Option<LogicalOp> {
        match self {
            Node::Logical { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    /// Children of this node (empty for leaves)
    pub fn children(&self) -> &[Arc<Node>] {
        match self {
            Node::Logical { children, .. } => children,
            _ => &[],
        }
    }

    /// Returns true for comparison and literal nodes
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Node::Logical { .. })
    }

    /// Check every node in the tree: logical arity, finite number
    /// literals and a depth of at most [`MAX_DEPTH`]
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            if depth > MAX_DEPTH {
                return Err(CoreError::DepthExceeded {
                    depth: self.depth(),
                    limit: MAX_DEPTH,
                });
            }
            match node {
                Node::Logical { operator, children } => {
                    check_arity(*operator, children.len())?;
                    stack.extend(children.iter().map(|c| (c.as_ref(), depth + 1)));
                }
                Node::Comparison {
                    field,
                    value: Literal::Number(n),
                    ..
                } if !n.is_finite() => {
                    return Err(CoreError::NonFiniteLiteral { field: field.clone() });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Height of the tree; a single leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            for child in node.children() {
                stack.push((child.as_ref(), depth + 1));
            }
        }
        max
    }

    /// Number of nodes in the tree, counting shared subtrees once per use
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children().iter().map(|c| c.as_ref()));
        }
        count
    }

    /// Field names referenced anywhere in the tree
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Comparison { field, .. } => {
                    fields.insert(field.as_str());
                }
                Node::Logical { children, .. } => {
                    stack.extend(children.iter().map(|c| c.as_ref()));
                }
                Node::Literal { .. } => {}
            }
        }
        fields
    }

    /// Binding strength used when rendering; higher binds tighter
    fn precedence(&self) -> u8 {
        match self {
            Node::Logical { operator: LogicalOp::Or, .. } => 1,
            Node::Logical { operator: LogicalOp::And, .. } => 2,
            Node::Logical { operator: LogicalOp::Not, .. } => 3,
            Node::Comparison { .. } | Node::Literal { .. } => 4,
        }
    }

    fn fmt_child(child: &Node, parent: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nested connectives of equal strength keep their parentheses so the
        // rendered text parses back into the same shape.
        let wrap = match child {
            Node::Logical { operator, .. } if operator.is_connective() => {
                child.precedence() <= parent.precedence()
            }
            _ => false,
        };
        if wrap {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison { field, operator, value } => write!(f, "{} {} {}", field, operator, value),
            Node::Literal { value } => write!(f, "{}", value),
            Node::Logical { operator: LogicalOp::Not, children } => {
                f.write_str("NOT ")?;
                for child in children {
                    Node::fmt_child(child, self, f)?;
                }
                Ok(())
            }
            Node::Logical { operator, children } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", operator)?;
                    }
                    Node::fmt_child(child, self, f)?;
                }
                Ok(())
            }
        }
    }
}

fn check_arity(operator: LogicalOp, got: usize) -> Result<()> {
    let too_few = got < operator.min_arity();
    let too_many = operator.max_arity().is_some_and(|max| got > max);
    if too_few || too_many {
        let expected = match operator.max_arity() {
            Some(1) => "exactly 1 child".to_string(),
            Some(max) => format!("exactly {} children", max),
            None => format!("at least {} children", operator.min_arity()),
        };
        return Err(CoreError::InvalidArity {
            operator,
            expected,
            got,
        });
    }
    Ok(())
}

/// Handle to the root of an immutable rule tree
///
/// Cloning an `Ast` is a reference-count increment. Deserialization checks
/// the arity of every logical node, so an `Ast` read back from storage
/// upholds the same invariants as one produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Arc<Node>", into = "Arc<Node>")]
pub struct Ast {
    root: Arc<Node>,
}

impl Ast {
    /// Wrap a freshly built node
    pub fn new(root: Node) -> Result<Self> {
        Self::from_shared(Arc::new(root))
    }

    /// Wrap an existing shared node
    pub fn from_shared(root: Arc<Node>) -> Result<Self> {
        root.validate()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Shared handle to the root, for embedding this tree in another one
    pub fn shared_root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Returns true if both handles point at the same root allocation
    pub fn ptr_eq(&self, other: &Ast) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn fields(&self) -> BTreeSet<&str> {
        self.root.fields()
    }

    /// Serialize to a JSON value
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from a JSON value, checking arity
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Deserialize from a JSON string, checking arity
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<Arc<Node>> for Ast {
    type Error = CoreError;

    fn try_from(root: Arc<Node>) -> Result<Self> {
        Ast::from_shared(root)
    }
}

impl From<Ast> for Arc<Node> {
    fn from(ast: Ast) -> Self {
        ast.root
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
