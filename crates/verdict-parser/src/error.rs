//! Parser error types

use thiserror::Error;
use verdict_core::CoreError;

/// Tokenizer error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedChar { position: usize, ch: char },

    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Number out of range at position {position}")]
    NumberOutOfRange { position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::NumberOutOfRange { position } => *position,
        }
    }
}

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// Invalid character or unterminated literal
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Structurally invalid token sequence
    #[error("Syntax error at position {position}: expected {expected}, found {found}")]
    Syntax {
        position: usize,
        expected: String,
        found: String,
    },

    /// Parentheses or NOT nested deeper than the configured limit
    #[error("Rule nesting exceeds the limit of {limit} at position {position}")]
    DepthExceeded { position: usize, limit: usize },

    /// Field not declared in the configured schema
    #[error("Unknown field '{field}' at position {position}")]
    UnknownField { field: String, position: usize },

    /// Literal type disagrees with the schema's declared field type
    #[error("Field '{field}' expects a {expected} literal, found {found} at position {position}")]
    LiteralType {
        field: String,
        expected: String,
        found: String,
        position: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ParseError {
    /// Byte offset in the rule string the error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Lex(err) => Some(err.position()),
            ParseError::Syntax { position, .. }
            | ParseError::DepthExceeded { position, .. }
            | ParseError::UnknownField { position, .. }
            | ParseError::LiteralType { position, .. } => Some(*position),
            ParseError::Core(_) => None,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
