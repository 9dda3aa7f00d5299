// Constants for the Brainfuck interpreter

/// Cells allocated up front for a growable tape
pub const DEFAULT_INITIAL_CELLS: usize = 65_536;

/// Growable tapes stop at 16 Mi cells unless configured otherwise
pub const DEFAULT_MAX_CELLS: usize = 16 * 1024 * 1024;

/// Default instruction budget for a single run
pub const DEFAULT_MAX_STEPS: u64 = 100_000_000;

/// How many instructions run between wall-clock deadline checks
pub const DEADLINE_CHECK_INTERVAL: u64 = 4096;
