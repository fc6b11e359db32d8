//! Lexical tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use verdict_core::{ComparisonOp, LogicalOp};

/// A classified lexical unit with its byte offset in the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text the token was read from
    pub text: String,
    /// Byte offset of the first character
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn eof(position: usize) -> Self {
        Self::new(TokenKind::Eof, "", position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier(String),
    Number(f64),
    String(String),
    Comparison(ComparisonOp),
    Logical(LogicalOp),
    LParen,
    RParen,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string '{}'", s),
            TokenKind::Comparison(op) => write!(f, "operator '{}'", op),
            TokenKind::Logical(op) => write!(f, "{}", op),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
