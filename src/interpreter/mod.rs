//! Brainfuck execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: [`Interpreter`](engine::Interpreter) and the execution loop
//! - [`config`]: tape policy, EOF behaviour and resource bounds
//! - [`io`]: output sinks and input sources
//! - [`errors`]: the classified [`ExecutionError`](errors::ExecutionError)
//!
//! # Execution Model
//!
//! A run parses the source, resolves every bracket pair, then executes one
//! instruction at a time against a fresh tape. Each `.` is delivered to the
//! sink synchronously before the next instruction runs. A run never yields;
//! hosts that must stay responsive bound it with resource limits or
//! a cancellation flag checked between instructions.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod io;
