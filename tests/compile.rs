//! End-to-end tests: compile an expression, then execute the emitted
//! assembly on a tiny interpreter for the stack-machine subset the code
//! generator produces. This checks both the computed value and the
//! stack-balance invariant (exactly one value remains for the epilogue
//! to pop) without needing an assembler.

use rexcc::generate_assembly;

/// Execute the emitted program and return the value left in `rax` at `ret`.
///
/// Arithmetic is wrapping 64-bit two's complement; `idiv` truncates
/// toward zero, matching the hardware behaviour after `cqo`.
fn run_asm(asm: &str) -> i64 {
  let mut stack: Vec<i64> = Vec::new();
  let mut rax: i64 = 0;
  let mut rdi: i64 = 0;

  for line in asm.lines() {
    let line = line.trim();
    match line {
      ".intel_syntax noprefix" | ".globl main" | "main:" => {}
      "push rax" => stack.push(rax),
      "pop rax" => rax = stack.pop().expect("pop rax from an empty stack"),
      "pop rdi" => rdi = stack.pop().expect("pop rdi from an empty stack"),
      "add rax, rdi" => rax = rax.wrapping_add(rdi),
      "sub rax, rdi" => rax = rax.wrapping_sub(rdi),
      "imul rax, rdi" => rax = rax.wrapping_mul(rdi),
      "cqo" => {}
      "idiv rdi" => rax = rax.wrapping_div(rdi),
      "ret" => {
        assert!(stack.is_empty(), "stack not drained at ret: {stack:?}");
        return rax;
      }
      _ => {
        let imm = line
          .strip_prefix("push ")
          .and_then(|imm| imm.parse::<i64>().ok())
          .unwrap_or_else(|| panic!("unrecognised instruction: {line:?}"));
        stack.push(imm);
      }
    }
  }

  panic!("emitted program has no ret");
}

fn run_expr(expr: &str) -> i64 {
  let asm = generate_assembly(expr).unwrap_or_else(|err| panic!("{expr:?} failed:\n{err}"));
  run_asm(&asm)
}

// Each case generates a test asserting the compiled program computes the
// same value as evaluating the expression directly.
macro_rules! eval_tests {
  ($( ($name:ident, $expr:literal, $expected:expr) ),+ $(,)?) => {
    $(
      #[test]
      fn $name() {
        assert_eq!(run_expr($expr), $expected, "expression {:?}", $expr);
      }
    )+
  };
}

eval_tests!(
  (single_literal, "0", 0),
  (literal_with_whitespace, " 42 ", 42),
  (simple_addition, "1+2", 3),
  (add_and_subtract, "5+20-4", 21),
  (subtraction_groups_left, "10-2-3", 5),
  (division_groups_left, "8/2/2", 2),
  (multiplication_binds_tighter, "1+2*3", 7),
  (division_binds_tighter, "10-4/2", 8),
  (parentheses_override, "(1+2)*3", 9),
  (nested_parentheses, "((2))*((1+2)+(3*4))", 30),
  (unary_minus, "-3+5", 2),
  (unary_minus_on_parentheses, "-(3+5)", -8),
  (unary_plus_is_noop, "+5-2", 3),
  (double_negation, "--7", 7),
  (negative_division_truncates_toward_zero, "(0-7)/2", -3),
  (negative_remainder_discarded, "0-9/2", -4),
  (mixed_precedence, "2*3+4*5", 26),
  (deeply_left_leaning, "1-2-3-4-5", -13),
);

#[test]
fn emits_the_expected_program_shape() {
  let asm = generate_assembly("1+2*3").unwrap();
  let lines: Vec<&str> = asm.lines().collect();
  assert_eq!(lines[0], ".intel_syntax noprefix");
  assert_eq!(lines[1], ".globl main");
  assert_eq!(lines[2], "main:");
  assert_eq!(lines.last(), Some(&"  ret"));
  assert_eq!(lines[lines.len() - 2], "  pop rax");
}

#[test]
fn compilation_is_deterministic() {
  let first = generate_assembly("(4+5)*(6-7)/3").unwrap();
  let second = generate_assembly("(4+5)*(6-7)/3").unwrap();
  assert_eq!(first, second);
}

#[test]
fn missing_operand_diagnostic_points_past_the_operator() {
  let err = generate_assembly("1+").unwrap_err();
  assert_eq!(err.to_string(), "1+\n  ^ expected a number");
}

#[test]
fn invalid_token_diagnostic_points_at_the_character() {
  let err = generate_assembly("1+%2").unwrap_err();
  assert_eq!(err.to_string(), "1+%2\n  ^ invalid token");
}

#[test]
fn unmatched_parenthesis_diagnostic_names_the_symbol() {
  let err = generate_assembly("(1+2").unwrap_err();
  assert_eq!(err.to_string(), "(1+2\n    ^ expected ')'");
}
