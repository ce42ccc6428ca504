use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side length of the board
pub const GRID_SIZE: usize = 4;

/// One row or column of cell values, ordered in the direction tiles merge
pub type Line = [u32; GRID_SIZE];

/// A cell coordinate as (row, col)
pub type Cell = (usize, usize);

/// The 4x4 board. Zero marks an empty cell; every other value is a power
/// of two of at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u32; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// An empty board
    pub const EMPTY: Grid = Grid {
        cells: [[0; GRID_SIZE]; GRID_SIZE],
    };

    pub fn from_rows(cells: [[u32; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[u32; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    pub fn get(&self, (row, col): Cell) -> u32 {
        self.cells[row][col]
    }

    pub fn set(&mut self, (row, col): Cell, value: u32) {
        self.cells[row][col] = value;
    }

    pub fn row(&self, row: usize) -> Line {
        self.cells[row]
    }

    pub fn set_row(&mut self, row: usize, line: Line) {
        self.cells[row] = line;
    }

    pub fn column(&self, col: usize) -> Line {
        std::array::from_fn(|row| self.cells[row][col])
    }

    pub fn set_column(&mut self, col: usize, line: Line) {
        for (row, value) in line.into_iter().enumerate() {
            self.cells[row][col] = value;
        }
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.iter_cells()
            .filter(|&(_, value)| value == 0)
            .map(|(cell, _)| cell)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.iter_cells().all(|(_, value)| value != 0)
    }

    /// Largest tile on the board (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.iter_cells().map(|(_, value)| value).max().unwrap_or(0)
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.iter_cells().map(|(_, value)| u64::from(value)).sum()
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.iter_cells().filter(|&(_, value)| value != 0).count()
    }

    /// True if any two horizontally or vertically adjacent cells are equal
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let value = self.cells[row][col];
                if col + 1 < GRID_SIZE && self.cells[row][col + 1] == value {
                    return true;
                }
                if row + 1 < GRID_SIZE && self.cells[row + 1][col] == value {
                    return true;
                }
            }
        }
        false
    }

    /// True when no move can change the board: no empty cell and no
    /// adjacent equal pair in any row or column
    pub fn is_terminal(&self) -> bool {
        self.is_full() && !self.has_adjacent_pair()
    }

    /// Place a 2 (or a 4 with `four_probability`) on a uniformly chosen
    /// empty cell. Returns the cell and value, or `None` if the board is full.
    pub fn spawn_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        four_probability: f64,
    ) -> Option<(Cell, u32)> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[rng.gen_range(0..empty.len())];
        let value = if rng.gen_bool(four_probability) { 4 } else { 2 };
        self.set(cell, value);
        Some((cell, value))
    }

    fn iter_cells(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, &value)| ((row, col), value))
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "+------".repeat(GRID_SIZE) + "+";
        writeln!(f, "{}", separator)?;
        for row in &self.cells {
            for &value in row {
                if value == 0 {
                    write!(f, "|{:^6}", ".")?;
                } else {
                    write!(f, "|{:^6}", value)?;
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", separator)?;
        }
        Ok(())
    }
}
