// Execution engine for the Brainfuck interpreter

use crate::interpreter::config::{EofBehavior, RunConfig};
use crate::interpreter::constants::DEADLINE_CHECK_INTERVAL;
use crate::interpreter::errors::{ExecutionError, Limit};
use crate::interpreter::io::{InputSource, OutputSink, SinkError};
use crate::memory::tape::{Tape, TapeFault};
use crate::parser::ast::{Instruction, Op};
use crate::parser::program::Program;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Instructions executed
    pub steps: u64,
    /// Number of cells between the origin and the furthest cell reached
    pub cells_touched: usize,
}

/// Buffered result of [`run_collect`]: every emitted byte plus the outcome.
///
/// On failure `output` still holds whatever was emitted before the error.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    pub output: Vec<u8>,
    pub result: Result<RunStats, ExecutionError>,
}

/// Runs Brainfuck programs under a fixed [`RunConfig`].
///
/// The interpreter holds no per-run state: each call parses (or borrows) an
/// immutable [`Program`], allocates a fresh tape, and discards both when it
/// returns, so one `Interpreter` can serve concurrent runs on several threads.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: RunConfig,
}

impl Interpreter {
    pub fn new(config: RunConfig) -> Self {
        Interpreter { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Parse and run `source`, pushing every `.` into `sink`.
    ///
    /// Bracket errors are reported before the first instruction executes, so
    /// a structurally invalid program never reaches the sink.
    pub fn run<O: OutputSink + ?Sized>(
        &self,
        source: &str,
        sink: &mut O,
        input: Option<&mut dyn InputSource>,
    ) -> Result<RunStats, ExecutionError> {
        let program = Program::parse(source)?;
        self.run_program(&program, sink, input)
    }

    /// Run an already parsed program.
    pub fn run_program<O: OutputSink + ?Sized>(
        &self,
        program: &Program,
        sink: &mut O,
        input: Option<&mut dyn InputSource>,
    ) -> Result<RunStats, ExecutionError> {
        let mut machine = Machine::new(program, &self.config);
        machine.execute(sink, input)?;
        Ok(machine.stats())
    }

    /// Run `source` and buffer its output.
    pub fn run_collect(&self, source: &str, input: Option<&mut dyn InputSource>) -> Collected {
        let mut output = Vec::new();
        let mut sink = |byte: u8| -> Result<(), SinkError> {
            output.push(byte);
            Ok(())
        };
        let result = self.run(source, &mut sink, input);
        Collected { output, result }
    }
}

/// Run `source` with the default configuration.
pub fn run<O: OutputSink + ?Sized>(
    source: &str,
    sink: &mut O,
    input: Option<&mut dyn InputSource>,
) -> Result<(), ExecutionError> {
    Interpreter::default().run(source, sink, input).map(|_| ())
}

/// Run `source` with the default configuration and buffer its output.
pub fn run_collect(source: &str, input: Option<&mut dyn InputSource>) -> Collected {
    Interpreter::default().run_collect(source, input)
}

/// Mutable state of a single run
struct Machine<'a> {
    program: &'a Program,
    tape: Tape,
    ip: usize,
    steps: u64,
    eof: EofBehavior,
    max_steps: Option<u64>,
    deadline: Option<(Instant, std::time::Duration)>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Machine<'a> {
    fn new(program: &'a Program, config: &'a RunConfig) -> Self {
        Machine {
            program,
            tape: Tape::new(config.tape),
            ip: 0,
            steps: 0,
            eof: config.eof,
            max_steps: config.max_steps,
            deadline: config.deadline.map(|d| (Instant::now(), d)),
            cancel: config.cancel.as_deref(),
        }
    }

    fn stats(&self) -> RunStats {
        RunStats {
            steps: self.steps,
            cells_touched: self.tape.high_water() + 1,
        }
    }

    /// Execute until the instruction pointer passes the last instruction.
    fn execute<O: OutputSink + ?Sized>(
        &mut self,
        sink: &mut O,
        mut input: Option<&mut dyn InputSource>,
    ) -> Result<(), ExecutionError> {
        let program = self.program;
        let instructions = program.instructions();

        while let Some(instr) = instructions.get(self.ip) {
            self.check_budget()?;

            match instr.op {
                Op::Right => {
                    self.tape
                        .move_right()
                        .map_err(|fault| Self::tape_error(fault, instr))?;
                    self.ip += 1;
                }
                Op::Left => {
                    self.tape
                        .move_left()
                        .map_err(|fault| Self::tape_error(fault, instr))?;
                    self.ip += 1;
                }
                Op::Inc => {
                    self.tape.increment();
                    self.ip += 1;
                }
                Op::Dec => {
                    self.tape.decrement();
                    self.ip += 1;
                }
                Op::Output => {
                    sink.emit(self.tape.get())
                        .map_err(|source| ExecutionError::Sink {
                            index: instr.index,
                            location: instr.location,
                            source,
                        })?;
                    self.ip += 1;
                }
                Op::Input => {
                    let byte = input.as_mut().and_then(|source| source.next_byte());
                    match (byte, self.eof) {
                        (Some(b), _) => self.tape.set(b),
                        (None, EofBehavior::Zero) => self.tape.set(0),
                        (None, EofBehavior::AllOnes) => self.tape.set(255),
                        (None, EofBehavior::Unchanged) => {}
                    }
                    self.ip += 1;
                }
                Op::JumpIfZero => {
                    if self.tape.get() == 0 {
                        self.ip = self.jump_target() + 1;
                    } else {
                        self.ip += 1;
                    }
                }
                Op::JumpUnlessZero => {
                    if self.tape.get() != 0 {
                        // Resume at the first instruction of the loop body
                        self.ip = self.jump_target() + 1;
                    } else {
                        self.ip += 1;
                    }
                }
            }

            self.steps += 1;
        }

        Ok(())
    }

    fn jump_target(&self) -> usize {
        self.program
            .jumps()
            .target(self.ip)
            .expect("every bracket in a parsed Program has a partner")
    }

    /// Fail if the next instruction would exceed a configured bound.
    fn check_budget(&self) -> Result<(), ExecutionError> {
        if let Some(max) = self.max_steps {
            if self.steps >= max {
                return Err(ExecutionError::ExecutionLimitExceeded(Limit::Steps(max)));
            }
        }

        if let Some(cancel) = self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(ExecutionError::Cancelled { steps: self.steps });
            }
        }

        if let Some((started, budget)) = self.deadline {
            if self.steps % DEADLINE_CHECK_INTERVAL == 0 && started.elapsed() >= budget {
                return Err(ExecutionError::ExecutionLimitExceeded(Limit::Deadline(
                    budget,
                )));
            }
        }

        Ok(())
    }

    fn tape_error(fault: TapeFault, instr: &Instruction) -> ExecutionError {
        match fault {
            TapeFault::Underflow => ExecutionError::TapeUnderflow {
                index: instr.index,
                location: instr.location,
            },
            TapeFault::Overflow { limit } => ExecutionError::TapeOverflow {
                index: instr.index,
                location: instr.location,
                limit,
            },
        }
    }

    #[cfg(test)]
    fn tape(&self) -> &Tape {
        &self.tape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::config::TapePolicy;
    use crate::interpreter::io::ByteInput;

    fn execute(source: &str, config: &RunConfig) -> (Vec<u8>, Tape, Result<(), ExecutionError>) {
        let program = Program::parse(source).expect("Parsing failed");
        let mut output = Vec::new();
        let mut sink = |b: u8| -> Result<(), SinkError> {
            output.push(b);
            Ok(())
        };
        let mut machine = Machine::new(&program, config);
        let result = machine.execute(&mut sink, None);
        let tape = machine.tape().clone();
        (output, tape, result)
    }

    #[test]
    fn test_loop_moves_value() {
        let (output, tape, result) = execute("++[>++<-]", &RunConfig::default());
        assert!(result.is_ok());
        assert!(output.is_empty());
        assert_eq!(tape.touched_cells(), &[0, 4]);
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_skip_loop_when_zero() {
        let (output, tape, result) = execute("[+++.]+", &RunConfig::default());
        assert!(result.is_ok());
        assert!(output.is_empty());
        assert_eq!(tape.get(), 1);
    }

    #[test]
    fn test_nested_loops() {
        // 3 * 4 = 12 into cell 2
        let (_, tape, result) = execute("+++[>++++[>+<-]<-]", &RunConfig::default());
        assert!(result.is_ok());
        assert_eq!(tape.touched_cells(), &[0, 0, 12]);
    }

    #[test]
    fn test_step_count() {
        let program = Program::parse("+[-]").unwrap();
        let mut sink = |_: u8| -> Result<(), SinkError> { Ok(()) };
        let stats = Interpreter::default()
            .run_program(&program, &mut sink, None)
            .unwrap();
        // + [ - ] and nothing more: the closing bracket falls through
        assert_eq!(stats.steps, 4);
        assert_eq!(stats.cells_touched, 1);
    }

    #[test]
    fn test_exact_step_budget_is_allowed() {
        let config = RunConfig::default().with_max_steps(Some(3));
        let (output, _, result) = execute("++.", &config);
        assert!(result.is_ok());
        assert_eq!(output, vec![2]);

        let config = RunConfig::default().with_max_steps(Some(2));
        let (output, _, result) = execute("++.", &config);
        assert_eq!(
            result,
            Err(ExecutionError::ExecutionLimitExceeded(Limit::Steps(2)))
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_overflow_reports_instruction() {
        let config = RunConfig::default().with_tape(TapePolicy::Fixed { cells: 2 });
        let (_, tape, result) = execute("+>+>+", &config);
        assert!(matches!(
            result,
            Err(ExecutionError::TapeOverflow {
                index: 3,
                limit: 2,
                ..
            })
        ));
        assert_eq!(tape.touched_cells(), &[1, 1]);
    }

    #[test]
    fn test_input_overwrites_cell() {
        let program = Program::parse(",.,.").unwrap();
        let mut input = ByteInput::new(b"A".to_vec());
        let mut output = Vec::new();
        let mut sink = |b: u8| -> Result<(), SinkError> {
            output.push(b);
            Ok(())
        };
        Interpreter::default()
            .run_program(&program, &mut sink, Some(&mut input))
            .unwrap();
        assert_eq!(output, vec![b'A', 0]);
    }
}
