//! Verdict Parser - rule string to AST parser for the Verdict rule engine
//!
//! Turns a rule string such as `age > 30 AND department = 'Sales'` into a
//! [`verdict_core::Ast`] in two stages: [`tokenize`] produces a flat token
//! sequence and [`RuleParser`] builds the tree from it.

pub mod error;
pub mod rule_parser;
pub mod token;
pub mod tokenizer;

// Re-export main parser types
pub use error::{LexError, ParseError, Result};
pub use rule_parser::{parse_rule, RuleParser};
pub use token::{Token, TokenKind};
pub use tokenizer::tokenize;
