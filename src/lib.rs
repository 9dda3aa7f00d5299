//! # Introduction
//!
//! brainterm parses and executes Brainfuck programs, streaming every emitted
//! byte to a caller-supplied sink. A terminal front end built with
//! [ratatui](https://docs.rs/ratatui) hosts the engine on a worker thread.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Jump table → Program → Interpreter → Sink → Output
//! ```
//!
//! 1. [`parser`]: scans instructions and matches brackets into an
//!    immutable [`parser::program::Program`]. Bracket errors surface here,
//!    before anything runs.
//! 2. [`interpreter`]: executes a program against a fresh tape under a
//!    [`interpreter::config::RunConfig`] (tape policy, EOF behaviour, step
//!    limit, deadline, cancellation).
//! 3. [`memory`]: the byte tape, with wrapping `u8` cells, left-bounded at the
//!    origin, growable to the right.
//! 4. [`output`]: buffering and display decoding of emitted bytes.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Quick start
//!
//! ```
//! use brainterm::interpreter::engine::run_collect;
//!
//! let collected = run_collect("+++.", None);
//! assert_eq!(collected.output, vec![3]);
//! assert!(collected.result.is_ok());
//! ```

pub mod interpreter;
pub mod memory;
pub mod output;
pub mod parser;
pub mod ui;
