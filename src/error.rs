//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – these routines format
//! messages in a style reminiscent of chibicc, echoing the offending line
//! and pointing at the failing byte with a caret.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  #[snafu(display("{input}\n{marker}^ invalid token"))]
  InvalidToken {
    input: String,
    marker: String,
    loc: usize,
  },
  #[snafu(display("{input}\n{marker}^ invalid number: {reason}"))]
  InvalidNumber {
    input: String,
    marker: String,
    loc: usize,
    reason: String,
  },
  #[snafu(display("{input}\n{marker}^ expected '{symbol}'"))]
  ExpectedSymbol {
    input: String,
    marker: String,
    loc: usize,
    symbol: char,
  },
  #[snafu(display("{input}\n{marker}^ expected a number"))]
  ExpectedNumber {
    input: String,
    marker: String,
    loc: usize,
  },
  #[snafu(display("{input}\n{marker}^ unexpected token \"{got}\""))]
  UnexpectedToken {
    input: String,
    marker: String,
    loc: usize,
    got: String,
  },
}

impl CompileError {
  /// A run of spaces wide enough to place the caret under the byte at
  /// `loc`. Offsets are byte positions; the width counts characters so
  /// multi-byte input still lines up.
  fn marker(input: &str, loc: usize) -> String {
    let safe_loc = loc.min(input.len());
    " ".repeat(input[..safe_loc].chars().count())
  }

  pub fn invalid_token(input: &str, loc: usize) -> Self {
    Self::InvalidToken {
      input: input.to_string(),
      marker: Self::marker(input, loc),
      loc,
    }
  }

  pub fn invalid_number(input: &str, loc: usize, reason: impl Into<String>) -> Self {
    Self::InvalidNumber {
      input: input.to_string(),
      marker: Self::marker(input, loc),
      loc,
      reason: reason.into(),
    }
  }

  pub fn expected_symbol(input: &str, loc: usize, symbol: char) -> Self {
    Self::ExpectedSymbol {
      input: input.to_string(),
      marker: Self::marker(input, loc),
      loc,
      symbol,
    }
  }

  pub fn expected_number(input: &str, loc: usize) -> Self {
    Self::ExpectedNumber {
      input: input.to_string(),
      marker: Self::marker(input, loc),
      loc,
    }
  }

  pub fn unexpected_token(input: &str, loc: usize, got: impl Into<String>) -> Self {
    Self::UnexpectedToken {
      input: input.to_string(),
      marker: Self::marker(input, loc),
      loc,
      got: got.into(),
    }
  }

  /// Byte offset the diagnostic is anchored to.
  pub fn loc(&self) -> usize {
    match self {
      Self::InvalidToken { loc, .. }
      | Self::InvalidNumber { loc, .. }
      | Self::ExpectedSymbol { loc, .. }
      | Self::ExpectedNumber { loc, .. }
      | Self::UnexpectedToken { loc, .. } => *loc,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn caret_points_at_offset() {
    let err = CompileError::invalid_token("1+%2", 2);
    assert_eq!(err.to_string(), "1+%2\n  ^ invalid token");
  }

  #[test]
  fn expected_symbol_names_the_symbol() {
    let err = CompileError::expected_symbol("(1+2", 4, ')');
    assert_eq!(err.to_string(), "(1+2\n    ^ expected ')'");
  }

  #[test]
  fn marker_is_clamped_to_input_length() {
    let err = CompileError::expected_number("1+", 7);
    assert_eq!(err.to_string(), "1+\n  ^ expected a number");
  }
}
