//! Byte tape addressed by the data pointer
//!
//! Cells are `u8` and start at zero. The tape is bounded on the left at cell 0
//! and grows to the right on demand, zero-filling new cells, until the
//! configured policy bound is reached.

use crate::interpreter::config::TapePolicy;

/// Why a data-pointer move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeFault {
    /// Attempted to move left of cell 0
    Underflow,
    /// Attempted to move right past the last permitted cell
    Overflow { limit: usize },
}

/// The interpreter's addressable memory
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
    limit: Option<usize>,
    /// Highest cell index the pointer has reached
    high_water: usize,
}

impl Tape {
    /// Allocate a fresh zeroed tape for `policy`.
    pub fn new(policy: TapePolicy) -> Self {
        let (initial, limit) = match policy {
            TapePolicy::Growable {
                initial_cells,
                max_cells,
            } => {
                let initial = match max_cells {
                    Some(max) => initial_cells.min(max),
                    None => initial_cells,
                };
                (initial, max_cells)
            }
            TapePolicy::Fixed { cells } => (cells, Some(cells)),
        };

        Tape {
            cells: vec![0; initial.max(1)],
            pointer: 0,
            limit: limit.map(|l| l.max(1)),
            high_water: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Number of cells currently allocated
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    /// Move the pointer one cell right, growing the tape if allowed.
    pub fn move_right(&mut self) -> Result<(), TapeFault> {
        let next = self.pointer + 1;
        if let Some(limit) = self.limit {
            if next >= limit {
                return Err(TapeFault::Overflow { limit });
            }
        }

        if next >= self.cells.len() {
            self.grow(next);
        }

        self.pointer = next;
        self.high_water = self.high_water.max(next);
        Ok(())
    }

    /// Move the pointer one cell left. Cell 0 is the origin and cannot be passed.
    pub fn move_left(&mut self) -> Result<(), TapeFault> {
        if self.pointer == 0 {
            return Err(TapeFault::Underflow);
        }
        self.pointer -= 1;
        Ok(())
    }

    /// Double the allocation (bounded by the limit) so that `index` is addressable.
    fn grow(&mut self, index: usize) {
        let mut new_len = (self.cells.len() * 2).max(index + 1);
        if let Some(limit) = self.limit {
            new_len = new_len.min(limit);
        }
        self.cells.resize(new_len, 0);
    }

    /// Cells from 0 through the high-water mark
    pub fn touched_cells(&self) -> &[u8] {
        &self.cells[..=self.high_water]
    }
}
