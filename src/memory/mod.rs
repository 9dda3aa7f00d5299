//! Memory model for the interpreter
//!
//! - [`tape`]: the byte tape and its data pointer
//!
//! # Tape Policy
//!
//! Cell 0 is the origin; moving left of it is always an error. To the right
//! the tape grows on demand, zero-filled, until the bound configured by
//! [`TapePolicy`](crate::interpreter::config::TapePolicy).

pub mod tape;
