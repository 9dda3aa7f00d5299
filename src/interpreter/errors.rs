//! Error types returned by a run
//!
//! This module defines [`ExecutionError`], the classified failure returned by
//! [`super::engine::Interpreter::run`]. Errors are values: the engine never
//! prints or logs them, and output already delivered to the sink stands.

use super::io::SinkError;
use crate::parser::ast::SourceLocation;
use crate::parser::errors::{render_diagnostic, ParseError};
use std::fmt;
use std::time::Duration;

/// Which resource bound stopped a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Steps(u64),
    Deadline(Duration),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Steps(n) => write!(f, "step limit of {} instructions", n),
            Limit::Deadline(d) => write!(f, "time limit of {} ms", d.as_millis()),
        }
    }
}

/// Coarse error taxonomy used by hosts to decide presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bracket mismatch, detected before any output
    Structural,
    /// Tape underflow or overflow
    Bounds,
    /// Step limit, deadline, or cancellation
    Resource,
    /// The output consumer failed
    Sink,
}

/// Classified failure of a run
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// A `[` with no matching `]`
    UnmatchedOpenBracket {
        index: usize,
        location: SourceLocation,
    },

    /// A `]` with no matching `[`
    UnmatchedCloseBracket {
        index: usize,
        location: SourceLocation,
    },

    /// `<` executed while the data pointer was at cell 0
    TapeUnderflow {
        index: usize,
        location: SourceLocation,
    },

    /// `>` executed at the last cell the tape policy allows
    TapeOverflow {
        index: usize,
        location: SourceLocation,
        limit: usize,
    },

    /// The output sink rejected a byte
    Sink {
        index: usize,
        location: SourceLocation,
        source: SinkError,
    },

    /// A step or time budget ran out
    ExecutionLimitExceeded(Limit),

    /// The host raised the cancellation flag
    Cancelled { steps: u64 },
}

impl ExecutionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ExecutionError::UnmatchedOpenBracket { .. }
            | ExecutionError::UnmatchedCloseBracket { .. } => ErrorClass::Structural,
            ExecutionError::TapeUnderflow { .. } | ExecutionError::TapeOverflow { .. } => {
                ErrorClass::Bounds
            }
            ExecutionError::ExecutionLimitExceeded(_) | ExecutionError::Cancelled { .. } => {
                ErrorClass::Resource
            }
            ExecutionError::Sink { .. } => ErrorClass::Sink,
        }
    }

    /// Source location of the offending instruction, when there is one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ExecutionError::UnmatchedOpenBracket { location, .. }
            | ExecutionError::UnmatchedCloseBracket { location, .. }
            | ExecutionError::TapeUnderflow { location, .. }
            | ExecutionError::TapeOverflow { location, .. }
            | ExecutionError::Sink { location, .. } => Some(*location),
            ExecutionError::ExecutionLimitExceeded(_) | ExecutionError::Cancelled { .. } => None,
        }
    }

    /// Character index of the offending instruction, when there is one
    pub fn index(&self) -> Option<usize> {
        match self {
            ExecutionError::UnmatchedOpenBracket { index, .. }
            | ExecutionError::UnmatchedCloseBracket { index, .. }
            | ExecutionError::TapeUnderflow { index, .. }
            | ExecutionError::TapeOverflow { index, .. }
            | ExecutionError::Sink { index, .. } => Some(*index),
            ExecutionError::ExecutionLimitExceeded(_) | ExecutionError::Cancelled { .. } => None,
        }
    }

    fn summary(&self) -> String {
        match self {
            ExecutionError::UnmatchedOpenBracket { .. } => {
                "Found an opening '[' without a closing ']'".to_string()
            }
            ExecutionError::UnmatchedCloseBracket { .. } => {
                "Found a closing ']' without an opening '['".to_string()
            }
            ExecutionError::TapeUnderflow { .. } => {
                "Tape underflow: moved left of cell 0".to_string()
            }
            ExecutionError::TapeOverflow { limit, .. } => {
                format!(
                    "Tape overflow: moved right past cell {}",
                    limit.saturating_sub(1)
                )
            }
            ExecutionError::Sink { source, .. } => format!("Output sink failed: {}", source),
            ExecutionError::ExecutionLimitExceeded(limit) => {
                format!("Execution stopped: exceeded the {}", limit)
            }
            ExecutionError::Cancelled { steps } => {
                format!("Execution cancelled after {} steps", steps)
            }
        }
    }

    /// Caret diagnostic against `source` for located errors, plain summary otherwise.
    pub fn render(&self, source: &str) -> String {
        match self.location() {
            Some(location) => render_diagnostic(source, location, &self.summary()),
            None => self.summary(),
        }
    }
}

impl From<ParseError> for ExecutionError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnmatchedOpenBracket { index, location } => {
                ExecutionError::UnmatchedOpenBracket { index, location }
            }
            ParseError::UnmatchedCloseBracket { index, location } => {
                ExecutionError::UnmatchedCloseBracket { index, location }
            }
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} at {}", self.summary(), location),
            None => write!(f, "{}", self.summary()),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutionError::Sink { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_convert() {
        let err: ExecutionError = ParseError::UnmatchedOpenBracket {
            index: 0,
            location: SourceLocation::new(1, 1),
        }
        .into();
        assert_eq!(
            err,
            ExecutionError::UnmatchedOpenBracket {
                index: 0,
                location: SourceLocation::new(1, 1)
            }
        );
        assert_eq!(err.class(), ErrorClass::Structural);
    }

    #[test]
    fn test_display_messages() {
        let err = ExecutionError::TapeUnderflow {
            index: 0,
            location: SourceLocation::new(1, 1),
        };
        assert_eq!(
            err.to_string(),
            "Tape underflow: moved left of cell 0 at line 1, column 1"
        );

        let err = ExecutionError::ExecutionLimitExceeded(Limit::Steps(10));
        assert_eq!(
            err.to_string(),
            "Execution stopped: exceeded the step limit of 10 instructions"
        );
        assert_eq!(err.location(), None);
        assert_eq!(err.class(), ErrorClass::Resource);
    }

    #[test]
    fn test_render_points_at_instruction() {
        let err = ExecutionError::TapeUnderflow {
            index: 1,
            location: SourceLocation::new(1, 2),
        };
        assert_eq!(
            err.render("+<"),
            "Line 1: +<\n---------^ Error here\n\nTape underflow: moved left of cell 0"
        );
    }

    #[test]
    fn test_overflow_message_with_zero_limit() {
        let err = ExecutionError::TapeOverflow {
            index: 0,
            location: SourceLocation::new(1, 1),
            limit: 0,
        };
        assert_eq!(
            err.to_string(),
            "Tape overflow: moved right past cell 0 at line 1, column 1"
        );

        let err = ExecutionError::TapeOverflow {
            index: 2,
            location: SourceLocation::new(1, 3),
            limit: 3,
        };
        assert!(err.to_string().starts_with("Tape overflow: moved right past cell 2"));
    }
}
