//! Bracket matching
//!
//! A single pass over the instruction stream keeps a stack of pending `[`
//! positions. Each `]` pops its partner; the pair is recorded in both
//! directions so loop boundaries resolve in O(1) during execution.

use super::ast::{Instruction, Op};
use super::errors::ParseError;
use rustc_hash::FxHashMap;

/// Bidirectional mapping between matching `[` / `]` instruction indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    targets: FxHashMap<usize, usize>,
}

impl JumpTable {
    /// Match every bracket in `instructions`, failing on the first structural error.
    ///
    /// An unmatched `]` fails as soon as it is seen. If `[`s remain pending at
    /// the end, the error names the earliest of them.
    pub fn build(instructions: &[Instruction]) -> Result<Self, ParseError> {
        let mut targets = FxHashMap::default();
        let mut pending: Vec<usize> = Vec::new();

        for (ip, instr) in instructions.iter().enumerate() {
            match instr.op {
                Op::JumpIfZero => pending.push(ip),
                Op::JumpUnlessZero => {
                    let open = pending.pop().ok_or(ParseError::UnmatchedCloseBracket {
                        index: instr.index,
                        location: instr.location,
                    })?;
                    targets.insert(open, ip);
                    targets.insert(ip, open);
                }
                _ => {}
            }
        }

        if let Some(&first) = pending.first() {
            let instr = &instructions[first];
            return Err(ParseError::UnmatchedOpenBracket {
                index: instr.index,
                location: instr.location,
            });
        }

        Ok(JumpTable { targets })
    }

    /// Index of the partner bracket for the bracket at instruction `ip`
    pub fn target(&self, ip: usize) -> Option<usize> {
        self.targets.get(&ip).copied()
    }

    /// Number of matched bracket pairs
    pub fn pairs(&self) -> usize {
        self.targets.len() / 2
    }
}

/// Collect every bracket error instead of stopping at the first.
///
/// Unmatched `]`s are reported in scan order, followed by every `[` left
/// pending, in source order.
pub fn collect_errors(instructions: &[Instruction]) -> Vec<ParseError> {
    let mut errors = Vec::new();
    let mut pending: Vec<&Instruction> = Vec::new();

    for instr in instructions {
        match instr.op {
            Op::JumpIfZero => pending.push(instr),
            Op::JumpUnlessZero => {
                if pending.pop().is_none() {
                    errors.push(ParseError::UnmatchedCloseBracket {
                        index: instr.index,
                        location: instr.location,
                    });
                }
            }
            _ => {}
        }
    }

    errors.extend(
        pending
            .into_iter()
            .map(|instr| ParseError::UnmatchedOpenBracket {
                index: instr.index,
                location: instr.location,
            }),
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn table(source: &str) -> Result<JumpTable, ParseError> {
        JumpTable::build(&Lexer::new(source).tokenize())
    }

    #[test]
    fn test_paren_matching() {
        let jumps = table("[]").unwrap();
        assert_eq!(jumps.target(0), Some(1));
        assert_eq!(jumps.target(1), Some(0));
        assert_eq!(jumps.pairs(), 1);
    }

    #[test]
    fn test_nested_paren_matching() {
        let jumps = table("[+>[>]]").unwrap();
        assert_eq!(jumps.target(0), Some(6));
        assert_eq!(jumps.target(6), Some(0));
        assert_eq!(jumps.target(3), Some(5));
        assert_eq!(jumps.target(5), Some(3));
        assert_eq!(jumps.target(1), None);
    }

    #[test]
    fn test_comments_do_not_shift_targets() {
        let jumps = table("[ a loop > here ]").unwrap();
        assert_eq!(jumps.target(0), Some(2));
    }

    #[test]
    fn test_unmatched_close() {
        let err = table("++.,<<>>]").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnmatchedCloseBracket { index: 8, .. }
        ));
    }

    #[test]
    fn test_unmatched_open_reports_earliest() {
        let err = table("x[[[]").unwrap_err();
        assert!(matches!(err, ParseError::UnmatchedOpenBracket { index: 1, .. }));
    }

    #[test]
    fn test_close_before_open_fails_on_close() {
        let err = table("][").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnmatchedCloseBracket { index: 0, .. }
        ));
    }

    #[test]
    fn test_collect_errors_reports_everything() {
        let errors = collect_errors(&Lexer::new("]+[\n][[").tokenize());
        let indices: Vec<(bool, usize)> = errors
            .iter()
            .map(|e| (matches!(e, ParseError::UnmatchedOpenBracket { .. }), e.index()))
            .collect();
        assert_eq!(indices, vec![(false, 0), (true, 5), (true, 6)]);
    }
}
