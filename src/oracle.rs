// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Software Game of Life reference.
//!
//! This is the canonical reference implementation of the next-generation
//! rule, used for differential validation of the circuit's captured output.
//! The grid has hard edges: out-of-bounds neighbors count as dead (no
//! wraparound).

use crate::grid::Grid;

/// Count live neighbors among the 8 cells surrounding (row, col).
fn live_neighbors(grid: &Grid, row: usize, col: usize) -> u32 {
    let mut count = 0;
    for di in -1i64..=1 {
        for dj in -1i64..=1 {
            if di == 0 && dj == 0 {
                continue;
            }
            let ni = row as i64 + di;
            let nj = col as i64 + dj;
            if ni >= 0
                && ni < grid.rows() as i64
                && nj >= 0
                && nj < grid.cols() as i64
                && grid.get(ni as usize, nj as usize)
            {
                count += 1;
            }
        }
    }
    count
}

/// Compute the next generation of `grid`.
///
/// A live cell with exactly 2 or 3 live neighbors stays alive, otherwise it
/// dies; a dead cell with exactly 3 live neighbors becomes alive. Pure and
/// total over any non-empty grid; allocates only the output grid.
pub fn next(grid: &Grid) -> Grid {
    Grid::from_fn(grid.rows(), grid.cols(), |i, j| {
        let n = live_neighbors(grid, i, j);
        if grid.get(i, j) {
            n == 2 || n == 3
        } else {
            n == 3
        }
    })
}
