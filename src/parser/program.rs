//! Parsed, bracket-checked Brainfuck programs

use super::ast::{Instruction, Op};
use super::errors::ParseError;
use super::jumps::{collect_errors, JumpTable};
use super::lexer::Lexer;
use std::fmt::Write as _;

/// An immutable instruction sequence with its jump table fully resolved.
///
/// A `Program` can only be obtained through [`Program::parse`], so holding one
/// guarantees every bracket has a partner.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<Instruction>,
    jumps: JumpTable,
}

impl Program {
    /// Scan `source` and resolve its brackets.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let instructions = Lexer::new(source).tokenize();
        let jumps = JumpTable::build(&instructions)?;
        Ok(Program {
            instructions,
            jumps,
        })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// One line per instruction: `ip: mnemonic` plus the jump target for brackets.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (ip, instr) in self.instructions.iter().enumerate() {
            let _ = write!(out, "{:5}: {:<6}", ip, instr.op.mnemonic());
            if matches!(instr.op, Op::JumpIfZero | Op::JumpUnlessZero) {
                if let Some(target) = self.jumps.target(ip) {
                    let _ = write!(out, " -> {}", target);
                }
            }
            let _ = writeln!(
                out,
                "  ; {}:{}",
                instr.location.line, instr.location.column
            );
        }
        out
    }
}

/// Report every structural error in `source`. Empty when the source parses.
pub fn diagnose(source: &str) -> Vec<ParseError> {
    collect_errors(&Lexer::new(source).tokenize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments() {
        let program = Program::parse("add two: ++ then print: .").unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.instructions()[2].op, Op::Output);
        assert_eq!(program.instructions()[2].index, 24);
    }

    #[test]
    fn test_empty_source_is_valid() {
        let program = Program::parse("").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn test_listing_shows_jump_targets() {
        let program = Program::parse("+[-]").unwrap();
        let listing = program.listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("jz") && lines[1].contains("-> 3"));
        assert!(lines[3].contains("jnz") && lines[3].contains("-> 1"));
    }

    #[test]
    fn test_diagnose_clean_source() {
        assert!(diagnose("+[>+<-]").is_empty());
        assert_eq!(diagnose("[[]").len(), 1);
    }
}
