//! Structural (bracket) errors and source diagnostics

use super::ast::SourceLocation;
use std::fmt;

/// Structural errors detected before any instruction executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `[` that is never closed. `index` is its character index in the source.
    UnmatchedOpenBracket {
        index: usize,
        location: SourceLocation,
    },

    /// A `]` with no pending `[`.
    UnmatchedCloseBracket {
        index: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn index(&self) -> usize {
        match self {
            ParseError::UnmatchedOpenBracket { index, .. }
            | ParseError::UnmatchedCloseBracket { index, .. } => *index,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::UnmatchedOpenBracket { location, .. }
            | ParseError::UnmatchedCloseBracket { location, .. } => *location,
        }
    }

    /// Short description without position information
    pub fn message(&self) -> &'static str {
        match self {
            ParseError::UnmatchedOpenBracket { .. } => "Found an opening '[' without a closing ']'",
            ParseError::UnmatchedCloseBracket { .. } => {
                "Found a closing ']' without an opening '['"
            }
        }
    }

    /// Render this error against the source it came from.
    pub fn render(&self, source: &str) -> String {
        render_diagnostic(source, self.location(), self.message())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} (index {})",
            self.message(),
            self.location(),
            self.index()
        )
    }
}

impl std::error::Error for ParseError {}

/// Format a caret diagnostic pointing at `location` inside `source`:
///
/// ```text
/// Line 1: ++.,<<>>]
/// ----------------^ Error here
///
/// Found a closing ']' without an opening '['
/// ```
pub fn render_diagnostic(source: &str, location: SourceLocation, message: &str) -> String {
    let line = source
        .lines()
        .nth(location.line.saturating_sub(1))
        .unwrap_or("");
    let prefix = format!("Line {}: ", location.line);

    let mut out = format!("{}{}\n", prefix, line);
    let dashes = prefix.chars().count() + location.column.saturating_sub(1);
    out.extend(std::iter::repeat('-').take(dashes));
    out.push_str("^ Error here\n\n");
    out.push_str(message);
    out
}
