// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! The shared n×m boolean cell grid.
//!
//! Grids are stored flat in row-major order. A grid is immutable once
//! produced; the only mutation path is the write-once capture buffer used
//! while shifting a game state out of the circuit ([`Grid::set`]).

use std::fmt;

/// An n×m matrix of cell states (`true` = alive).
///
/// Invariant: `rows >= 1`, `cols >= 1`, and every row has the same length.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid. Panics on zero dimensions.
    pub fn dead(rows: usize, cols: usize) -> Self {
        assert!(
            rows >= 1 && cols >= 1,
            "grid dimensions must be at least 1x1, got {}x{}",
            rows,
            cols
        );
        Grid {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut g = Grid::dead(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                g.cells[i * cols + j] = f(i, j);
            }
        }
        g
    }

    /// Build a grid from a list of live (row, col) coordinates.
    ///
    /// Coordinates outside the grid are silently skipped, so a fixed
    /// coordinate table can be reused across grid sizes.
    pub fn from_coords(rows: usize, cols: usize, coords: &[(usize, usize)]) -> Self {
        let mut g = Grid::dead(rows, cols);
        for &(i, j) in coords {
            if i < rows && j < cols {
                g.cells[i * cols + j] = true;
            }
        }
        g
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    /// Write one cell of an in-progress capture buffer.
    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, alive: bool) {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col] = alive;
    }

    /// Number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Number of cells that differ between two same-sized grids.
    pub fn diff_count(&self, other: &Grid) -> usize {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "cannot diff grids of different dimensions"
        );
        self.cells
            .iter()
            .zip(other.cells.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}, {} live)", self.rows, self.cols, self.live_count())
    }
}

/// ASCII rendering for logs: one row per line, `#` alive, `.` dead.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            for j in 0..self.cols {
                f.write_str(if self.get(i, j) { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
