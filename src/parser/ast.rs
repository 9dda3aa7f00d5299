//! Instruction definitions for Brainfuck programs

use std::fmt;

/// Source location for error reporting (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The eight Brainfuck operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Inc,
    /// `-`
    Dec,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    JumpIfZero,
    /// `]`
    JumpUnlessZero,
}

impl Op {
    /// Map a source character to its operation. Every other character is a comment.
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '>' => Some(Op::Right),
            '<' => Some(Op::Left),
            '+' => Some(Op::Inc),
            '-' => Some(Op::Dec),
            '.' => Some(Op::Output),
            ',' => Some(Op::Input),
            '[' => Some(Op::JumpIfZero),
            ']' => Some(Op::JumpUnlessZero),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Op::Right => '>',
            Op::Left => '<',
            Op::Inc => '+',
            Op::Dec => '-',
            Op::Output => '.',
            Op::Input => ',',
            Op::JumpIfZero => '[',
            Op::JumpUnlessZero => ']',
        }
    }

    /// Human-readable mnemonic used by instruction listings
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Right => "right",
            Op::Left => "left",
            Op::Inc => "inc",
            Op::Dec => "dec",
            Op::Output => "output",
            Op::Input => "input",
            Op::JumpIfZero => "jz",
            Op::JumpUnlessZero => "jnz",
        }
    }
}

/// A single instruction together with where it came from.
///
/// `index` is the 0-based character index into the source string (not the
/// byte offset), so it stays meaningful for sources containing multi-byte
/// comment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub index: usize,
    pub location: SourceLocation,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at {}", self.op.as_char(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_mapping_round_trips() {
        for c in "><+-.,[]".chars() {
            let op = Op::from_char(c).unwrap();
            assert_eq!(op.as_char(), c);
        }
    }

    #[test]
    fn test_comment_characters_have_no_op() {
        for c in "abc 123\n\t#!é€".chars() {
            assert_eq!(Op::from_char(c), None);
        }
    }
}
