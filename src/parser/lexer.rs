//! Lexer for Brainfuck source code
//!
//! Converts raw source text into a flat [`Instruction`] stream. Only the eight
//! instruction characters produce output; everything else (whitespace, prose,
//! any Unicode content) is a comment and is skipped without occupying an
//! instruction slot.

use super::ast::{Instruction, Op, SourceLocation};

/// Lexer for Brainfuck source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. Scanning cannot fail; bracket structure is
    /// checked afterwards by [`super::jumps::JumpTable::build`].
    pub fn tokenize(&mut self) -> Vec<Instruction> {
        let mut instructions = Vec::new();

        while let Some(c) = self.peek() {
            let location = self.current_location();
            let index = self.position;
            self.advance();

            if let Some(op) = Op::from_char(c) {
                instructions.push(Instruction {
                    op,
                    index,
                    location,
                });
            }
        }

        instructions
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Locate a character index in `source`, returning its 1-based line and column.
///
/// Indices past the end resolve to the position just after the last character.
pub fn locate(source: &str, index: usize) -> SourceLocation {
    let mut line = 1;
    let mut column = 1;
    for c in source.chars().take(index) {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    SourceLocation::new(line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(source: &str) -> Vec<Op> {
        Lexer::new(source).tokenize().iter().map(|i| i.op).collect()
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(ops("+"), vec![Op::Inc]);
        assert_eq!(ops("-"), vec![Op::Dec]);
        assert_eq!(ops(">"), vec![Op::Right]);
        assert_eq!(ops("<"), vec![Op::Left]);
        assert_eq!(ops("."), vec![Op::Output]);
        assert_eq!(ops(","), vec![Op::Input]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert!(ops("hello world").is_empty());
        assert_eq!(ops("a+b-c"), vec![Op::Inc, Op::Dec]);
    }

    #[test]
    fn test_indices_count_characters_not_bytes() {
        let tokens = Lexer::new("é€+").tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].index, 2);
        assert_eq!(tokens[0].location, SourceLocation::new(1, 3));
    }

    #[test]
    fn test_locations_track_lines() {
        let tokens = Lexer::new("+\n  -\n\n.").tokenize();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[2].location, SourceLocation::new(4, 1));
        assert_eq!(tokens[2].index, 7);
    }

    #[test]
    fn test_locate_matches_lexer() {
        let source = "ab\n+c\n ]";
        for token in Lexer::new(source).tokenize() {
            assert_eq!(locate(source, token.index), token.location);
        }
    }
}
