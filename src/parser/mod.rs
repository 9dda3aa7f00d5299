//! Brainfuck source parser
//!
//! This module turns source text into a bracket-checked [`Program`](program::Program):
//! - [`lexer`]: scanning (source text → instructions, comments dropped)
//! - [`jumps`]: bracket matching into a bidirectional jump table
//! - [`program`]: the immutable program handed to the interpreter
//! - [`ast`]: instruction and source location definitions
//! - [`errors`]: structural errors and caret diagnostics
//!
//! Only `> < + - . , [ ]` are instructions. Every other character, including
//! whitespace and any Unicode text, is a comment.

pub mod ast;
pub mod errors;
pub mod jumps;
pub mod lexer;
pub mod program;
