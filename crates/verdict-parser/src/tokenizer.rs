//! Rule string tokenizer
//!
//! Splits a rule string into tokens in a single left-to-right pass:
//! - identifiers `[A-Za-z_][A-Za-z0-9_]*`; `AND`, `OR`, `NOT` in any case
//!   are logical keywords
//! - numbers with an optional sign: `30`, `-4`, `2.5`; values too large
//!   for an f64 are rejected
//! - strings in single or double quotes, without escapes
//! - `>=`, `<=`, `!=`, `==` before `>`, `<`, `=`
//! - `(` and `)`
//!
//! Whitespace between tokens is discarded. The returned sequence always ends
//! with an `Eof` token.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use verdict_core::{ComparisonOp, LogicalOp};

/// Tokenize a rule string
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = input[pos..].chars().next() {
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        let token = match c {
            '(' => Token::new(TokenKind::LParen, "(", pos),
            ')' => Token::new(TokenKind::RParen, ")", pos),
            '\'' | '"' => read_string(input, pos, c)?,
            '>' | '<' | '=' | '!' => read_operator(input, pos, c)?,
            c if c.is_ascii_digit() => read_number(input, pos)?,
            '+' | '-' if starts_with_digit(&input[pos + 1..]) => read_number(input, pos)?,
            c if c.is_ascii_alphabetic() || c == '_' => read_word(input, pos),
            ch => return Err(LexError::UnexpectedChar { position: pos, ch }),
        };

        pos += token.text.len();
        tokens.push(token);
    }

    tokens.push(Token::eof(input.len()));
    log::trace!("Tokenized {} tokens from {:?}", tokens.len(), input);
    Ok(tokens)
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn read_string(input: &str, start: usize, quote: char) -> Result<Token, LexError> {
    let body = &input[start + 1..];
    match body.find(quote) {
        Some(end) => {
            let text = &input[start..start + end + 2];
            Ok(Token::new(TokenKind::String(body[..end].to_string()), text, start))
        }
        None => Err(LexError::UnterminatedString { position: start }),
    }
}

fn read_operator(input: &str, start: usize, first: char) -> Result<Token, LexError> {
    let two = input.get(start..start + 2);
    if let Some(op) = two.and_then(ComparisonOp::from_symbol) {
        let text = &input[start..start + 2];
        return Ok(Token::new(TokenKind::Comparison(op), text, start));
    }

    match ComparisonOp::from_symbol(&input[start..start + 1]) {
        Some(op) => Ok(Token::new(TokenKind::Comparison(op), &input[start..start + 1], start)),
        None => Err(LexError::UnexpectedChar {
            position: start,
            ch: first,
        }),
    }
}

fn read_number(input: &str, start: usize) -> Result<Token, LexError> {
    let bytes = input.as_bytes();
    let mut end = start;
    if matches!(bytes[end], b'+' | b'-') {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    let text = &input[start..end];
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Token::new(TokenKind::Number(value), text, start)),
        _ => Err(LexError::NumberOutOfRange { position: start }),
    }
}

fn read_word(input: &str, start: usize) -> Token {
    let len = input[start..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(input.len() - start);
    let text = &input[start..start + len];

    let kind = match LogicalOp::from_keyword(text) {
        Some(op) => TokenKind::Logical(op),
        None => TokenKind::Identifier(text.to_string()),
    };
    Token::new(kind, text, start)
}
