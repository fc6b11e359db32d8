//! Rule parser
//!
//! Recursive descent over the token stream. Binding strength, tightest
//! first:
//!
//! ```text
//! rule       := or_expr EOF
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := unary (AND unary)*
//! unary      := NOT unary | primary
//! primary    := '(' or_expr ')' | comparison | true | false
//! comparison := IDENT ('>' | '<' | '=' | '!=' | '>=' | '<=') literal
//! literal    := NUMBER | STRING | true | false
//! ```
//!
//! A run of one operator (`a AND b AND c`) produces a single N-ary node.
//! Parenthesized groups are never merged into the surrounding run, so
//! `(a AND b) AND c` keeps its nested shape.

use crate::error::{ParseError, Result};
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;
use std::sync::Arc;
use verdict_core::{Ast, Literal, LogicalOp, Node, Schema, DEFAULT_MAX_DEPTH, MAX_DEPTH};

/// Rule parser
///
/// Holds only configuration; every call to [`RuleParser::parse`] starts
/// from scratch, so one parser can be shared across threads.
#[derive(Debug, Clone)]
pub struct RuleParser {
    max_depth: usize,
    schema: Option<Schema>,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            schema: None,
        }
    }
}

impl RuleParser {
    /// Create a parser with the default depth limit and no schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the depth of the produced tree and of parenthesis/NOT nesting
    ///
    /// Values above [`MAX_DEPTH`] are capped to it.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH);
        self
    }

    /// Only accept fields declared in `schema`, with matching literal types
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Parse a rule string into an AST
    pub fn parse(&self, input: &str) -> Result<Ast> {
        let tokens = tokenize(input)?;
        let ast = self.parse_tokens(&tokens)?;
        log::debug!("Parsed rule {:?} into {} nodes", input, ast.root().node_count());
        Ok(ast)
    }

    /// Parse an already tokenized rule
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<Ast> {
        let mut stream = TokenStream {
            tokens,
            pos: 0,
            nesting: 0,
            parser: self,
        };

        if stream.at_end() {
            return Err(stream.unexpected("a rule expression"));
        }

        let parsed = stream.or_expr()?;
        if !stream.at_end() {
            return Err(stream.unexpected("AND, OR or end of input"));
        }

        Ok(Ast::from_shared(parsed.node)?)
    }
}

/// Parse a rule string with the default parser settings
pub fn parse_rule(input: &str) -> Result<Ast> {
    RuleParser::new().parse(input)
}

static EOF: TokenKind = TokenKind::Eof;

/// A subtree together with its height
struct Parsed {
    node: Arc<Node>,
    height: usize,
}

impl Parsed {
    fn leaf(node: Node) -> Self {
        Self {
            node: Arc::new(node),
            height: 1,
        }
    }
}

struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Open parentheses and NOT prefixes on the current path
    nesting: usize,
    parser: &'a RuleParser,
}

impl<'a> TokenStream<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> &'a TokenKind {
        self.peek().map(|t| &t.kind).unwrap_or(&EOF)
    }

    fn peek_nth_kind(&self, n: usize) -> &'a TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&EOF)
    }

    fn position(&self) -> usize {
        match self.peek() {
            Some(token) => token.position,
            None => self
                .tokens
                .last()
                .map(|t| t.position + t.text.len())
                .unwrap_or(0),
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::Syntax {
            position: self.position(),
            expected: expected.to_string(),
            found: self.peek_kind().to_string(),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > self.parser.max_depth {
            return Err(self.depth_exceeded());
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn depth_exceeded(&self) -> ParseError {
        ParseError::DepthExceeded {
            position: self.position(),
            limit: self.parser.max_depth,
        }
    }

    fn or_expr(&mut self) -> Result<Parsed> {
        self.connective(LogicalOp::Or)
    }

    fn and_expr(&mut self) -> Result<Parsed> {
        self.connective(LogicalOp::And)
    }

    /// Parse a run of operands joined by `op` into one N-ary node
    fn connective(&mut self, op: LogicalOp) -> Result<Parsed> {
        let start = self.position();
        let first = self.operand_of(op)?;

        let mut operands = vec![first];
        while matches!(self.peek_kind(), TokenKind::Logical(found) if *found == op) {
            self.advance();
            operands.push(self.operand_of(op)?);
        }

        if operands.len() == 1 {
            return Ok(operands.remove(0));
        }

        let height = 1 + operands.iter().map(|p| p.height).max().unwrap_or(0);
        if height > self.parser.max_depth {
            return Err(ParseError::DepthExceeded {
                position: start,
                limit: self.parser.max_depth,
            });
        }

        let children = operands.into_iter().map(|p| p.node).collect();
        Ok(Parsed {
            node: Arc::new(Node::logical(op, children)?),
            height,
        })
    }

    fn operand_of(&mut self, op: LogicalOp) -> Result<Parsed> {
        match op {
            LogicalOp::Or => self.and_expr(),
            _ => self.unary(),
        }
    }

    fn unary(&mut self) -> Result<Parsed> {
        if !matches!(self.peek_kind(), TokenKind::Logical(LogicalOp::Not)) {
            return self.primary();
        }

        let start = self.position();
        self.advance();
        self.enter()?;
        let operand = self.unary()?;
        self.leave();

        let height = operand.height + 1;
        if height > self.parser.max_depth {
            return Err(ParseError::DepthExceeded {
                position: start,
                limit: self.parser.max_depth,
            });
        }

        Ok(Parsed {
            node: Arc::new(Node::not(operand.node)),
            height,
        })
    }

    fn primary(&mut self) -> Result<Parsed> {
        match self.peek_kind() {
            TokenKind::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.or_expr()?;
                self.leave();
                if !matches!(self.peek_kind(), TokenKind::RParen) {
                    return Err(self.unexpected("')'"));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::Identifier(name) => {
                if let TokenKind::Comparison(_) = self.peek_nth_kind(1) {
                    return self.comparison();
                }
                match parse_bool(name) {
                    Some(value) => {
                        self.advance();
                        Ok(Parsed::leaf(Node::literal(value)))
                    }
                    None => {
                        self.advance();
                        Err(self.unexpected("comparison operator"))
                    }
                }
            }
            _ => Err(self.unexpected("field name, '(' or NOT")),
        }
    }

    fn comparison(&mut self) -> Result<Parsed> {
        let (field, field_pos) = match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                position,
                ..
            }) => (name.clone(), *position),
            _ => return Err(self.unexpected("field name")),
        };

        let operator = match self.peek_kind() {
            TokenKind::Comparison(op) => *op,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.advance();

        let literal_pos = self.position();
        let value = match self.peek_kind() {
            TokenKind::Number(n) => Literal::Number(*n),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Identifier(name) => match parse_bool(name) {
                Some(b) => Literal::Bool(b),
                None => return Err(self.unexpected("number, string or boolean literal")),
            },
            _ => return Err(self.unexpected("number, string or boolean literal")),
        };
        self.advance();

        if let Some(schema) = &self.parser.schema {
            check_against_schema(schema, &field, field_pos, &value, literal_pos)?;
        }

        Ok(Parsed::leaf(Node::comparison(field, operator, value)))
    }
}

fn parse_bool(word: &str) -> Option<bool> {
    if word.eq_ignore_ascii_case("true") {
        Some(true)
    } else if word.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn check_against_schema(
    schema: &Schema,
    field: &str,
    field_pos: usize,
    value: &Literal,
    literal_pos: usize,
) -> Result<()> {
    let declared = schema.get_field(field).ok_or_else(|| ParseError::UnknownField {
        field: field.to_string(),
        position: field_pos,
    })?;

    if !declared.field_type.accepts_literal(value) {
        return Err(ParseError::LiteralType {
            field: field.to_string(),
            expected: declared.field_type.type_name().to_string(),
            found: value.type_name().to_string(),
            position: literal_pos,
        });
    }
    Ok(())
}
