//! Code generation: lower the parsed AST into Intel-syntax x86-64 assembly.
//!
//! The emitter uses a simple stack machine: the code for every subtree
//! leaves exactly one value on the hardware stack, so a binary node can
//! pop its right operand into `rdi`, its left operand into `rax`, combine
//! them, and push the result back. The final value is popped into `rax`
//! as the program's exit status.

use crate::parser::{AstNode, BinaryOp};

/// Emit a complete assembly program computing `node` in `main`.
pub fn generate(node: &AstNode) -> String {
  let mut asm = String::new();
  asm.push_str(".intel_syntax noprefix\n");
  asm.push_str(".globl main\n");
  asm.push_str("main:\n");

  emit_expr(node, &mut asm);

  asm.push_str("  pop rax\n");
  asm.push_str("  ret\n");

  asm
}

/// Emit stack-based code for a single expression node.
fn emit_expr(node: &AstNode, asm: &mut String) {
  match node {
    AstNode::Num { value } => {
      asm.push_str(&format!("  push {value}\n"));
    }
    AstNode::Binary { op, lhs, rhs } => {
      emit_expr(lhs, asm);
      emit_expr(rhs, asm);
      asm.push_str("  pop rdi\n");
      asm.push_str("  pop rax\n");
      match op {
        BinaryOp::Add => asm.push_str("  add rax, rdi\n"),
        BinaryOp::Sub => asm.push_str("  sub rax, rdi\n"),
        BinaryOp::Mul => asm.push_str("  imul rax, rdi\n"),
        BinaryOp::Div => {
          // idiv divides the 128-bit value rdx:rax; cqo sign-extends
          // rax into rdx first so negative dividends divide correctly.
          asm.push_str("  cqo\n");
          asm.push_str("  idiv rdi\n");
        }
      }
      asm.push_str("  push rax\n");
    }
  }
}
