//! Lexer and binary code generator for lume choreography scripts.
//!
//! A script compiles to a flat opcode/operand byte stream:
//! - The [`lexer`] turns script text into an ordered token sequence using a
//!   first-match-wins pattern table
//! - The [`codegen`] maps tokens to bytes through a versioned opcode table,
//!   tolerating malformed input (offending tokens contribute no bytes and
//!   surface as structured diagnostics)
//!
//! Compilation is best-effort by design: it never fails, and the caller
//! inspects [`CompiledScript::diagnostics`] for anything that was dropped.

pub mod codegen;
pub mod diagnostics;
pub mod lexer;
pub mod opcode;
pub mod token;

pub use codegen::{compile, fill_percentage, generate, CompiledScript};
pub use diagnostics::Diagnostic;
pub use lexer::{tokenize, PatternTable};
pub use opcode::opcode;
pub use token::{Token, TokenKind};
