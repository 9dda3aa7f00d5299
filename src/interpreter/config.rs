//! Run configuration: tape policy, input EOF behaviour and resource bounds

use super::constants::{DEFAULT_INITIAL_CELLS, DEFAULT_MAX_CELLS, DEFAULT_MAX_STEPS};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// What happens when `>` reaches the end of the allocated tape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapePolicy {
    /// Grow to the right, zero-filled. `max_cells: None` means unbounded.
    Growable {
        initial_cells: usize,
        max_cells: Option<usize>,
    },
    /// Exactly `cells` cells; moving past the last one is a `TapeOverflow`
    Fixed { cells: usize },
}

impl Default for TapePolicy {
    fn default() -> Self {
        TapePolicy::Growable {
            initial_cells: DEFAULT_INITIAL_CELLS,
            max_cells: Some(DEFAULT_MAX_CELLS),
        }
    }
}

/// What `,` stores when no input byte is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofBehavior {
    /// Set the cell to 0
    #[default]
    Zero,
    /// Leave the cell as it was
    Unchanged,
    /// Set the cell to 255
    AllOnes,
}

impl EofBehavior {
    /// Parse a command-line spelling (`zero`, `unchanged`, `ones`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zero" | "0" => Some(EofBehavior::Zero),
            "unchanged" | "keep" => Some(EofBehavior::Unchanged),
            "ones" | "255" | "-1" => Some(EofBehavior::AllOnes),
            _ => None,
        }
    }
}

/// Per-run configuration for [`super::engine::Interpreter`]
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub tape: TapePolicy,
    pub eof: EofBehavior,
    /// Maximum number of instructions to execute. `None` disables the limit.
    pub max_steps: Option<u64>,
    /// Wall-clock budget for a run. `None` disables the limit.
    pub deadline: Option<Duration>,
    /// When set, the run stops with `Cancelled` as soon as the flag becomes true.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            tape: TapePolicy::default(),
            eof: EofBehavior::default(),
            max_steps: Some(DEFAULT_MAX_STEPS),
            deadline: None,
            cancel: None,
        }
    }
}

impl RunConfig {
    pub fn with_tape(mut self, tape: TapePolicy) -> Self {
        self.tape = tape;
        self
    }

    pub fn with_eof(mut self, eof: EofBehavior) -> Self {
        self.eof = eof;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
