//! Recursive-descent parser producing an expression AST.
//!
//! The parser mirrors the classic chibicc structure: one procedure per
//! precedence level, with the repetition in `expr` and `mul` written as
//! loops so repeated operators fold strictly left-associative. Unary
//! minus never gets its own node kind; `-x` is desugared to `0 - x`
//! during parsing.

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

/// Expression tree produced by the parser. Each binary node exclusively
/// owns its two children; literals are the only leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Parse a complete expression from the token stream.
///
/// The grammar, lowest to highest precedence:
///
/// ```text
/// expr    = mul ("+" mul | "-" mul)*
/// mul     = unary ("*" unary | "/" unary)*
/// unary   = ("+" | "-")? unary | primary
/// primary = "(" expr ")" | num
/// ```
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);
  let node = parse_expr(&mut stream)?;

  // Anything left over after a complete expression is trailing garbage.
  if !stream.is_eof()
    && let Some(token) = stream.peek()
  {
    let got = describe_token(Some(token), source);
    return Err(CompileError::unexpected_token(source, token.loc, got));
  }

  Ok(node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_mul(stream)?;

  loop {
    if stream.equal('+') {
      let rhs = parse_mul(stream)?;
      node = AstNode::binary(BinaryOp::Add, node, rhs);
      continue;
    }
    if stream.equal('-') {
      let rhs = parse_mul(stream)?;
      node = AstNode::binary(BinaryOp::Sub, node, rhs);
      continue;
    }
    return Ok(node);
  }
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_unary(stream)?;

  loop {
    if stream.equal('*') {
      let rhs = parse_unary(stream)?;
      node = AstNode::binary(BinaryOp::Mul, node, rhs);
      continue;
    }
    if stream.equal('/') {
      let rhs = parse_unary(stream)?;
      node = AstNode::binary(BinaryOp::Div, node, rhs);
      continue;
    }
    return Ok(node);
  }
}

fn parse_unary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.equal('+') {
    return parse_unary(stream);
  }

  if stream.equal('-') {
    let operand = parse_unary(stream)?;
    return Ok(AstNode::binary(BinaryOp::Sub, AstNode::number(0), operand));
  }

  parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.equal('(') {
    let node = parse_expr(stream)?;
    stream.skip(')')?;
    return Ok(node);
  }

  let (value, _) = stream.get_number()?;
  Ok(AstNode::number(value))
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: char) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Punctuator
      && token.len == op.len_utf8()
      && token_text(token, self.source).starts_with(op)
    {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume the current token if it matches, otherwise fail the parse.
  fn skip(&mut self, op: char) -> CompileResult<()> {
    if self.equal(op) {
      Ok(())
    } else {
      let loc = match self.peek() {
        Some(token) => token.loc,
        None => self.source.len(),
      };
      Err(CompileError::expected_symbol(self.source, loc, op))
    }
  }

  /// Parse the current token as an integer literal returning its value and location.
  fn get_number(&mut self) -> CompileResult<(i64, usize)> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Num
      && let Some(value) = token.value
    {
      let loc = token.loc;
      self.pos += 1;
      return Ok((value, loc));
    }

    let loc = match self.peek() {
      Some(token) => token.loc,
      None => self.source.len(),
    };
    Err(CompileError::expected_number(self.source, loc))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}
