// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Stimulus generation: random game states and the canonical gun fixture.

use rand::Rng;

use crate::grid::Grid;

/// Gosper glider gun, live cells as absolute (row, col) coordinates.
///
/// The full pattern needs a 9x36 grid; on smaller grids the out-of-bounds
/// cells are clipped by [`Grid::from_coords`], which still yields a useful
/// deterministic fixture.
const GUN_CELLS: &[(usize, usize)] = &[
    (0, 24),
    (1, 22),
    (1, 24),
    (2, 12),
    (2, 13),
    (2, 20),
    (2, 21),
    (2, 34),
    (2, 35),
    (3, 11),
    (3, 15),
    (3, 20),
    (3, 21),
    (3, 34),
    (3, 35),
    (4, 0),
    (4, 1),
    (4, 10),
    (4, 16),
    (4, 20),
    (4, 21),
    (5, 0),
    (5, 1),
    (5, 10),
    (5, 14),
    (5, 16),
    (5, 17),
    (5, 22),
    (5, 24),
    (6, 10),
    (6, 16),
    (6, 24),
    (7, 11),
    (7, 15),
    (8, 12),
    (8, 13),
];

/// Generate a uniformly random rows×cols game state.
///
/// Each cell is independently alive with probability 0.5. No determinism is
/// guaranteed across calls.
pub fn random(rows: usize, cols: usize) -> Grid {
    let mut rng = rand::thread_rng();
    Grid::from_fn(rows, cols, |_, _| rng.gen_bool(0.5))
}

/// The canonical hand-authored stimulus: a Gosper glider gun at fixed
/// coordinates, clipped to the grid.
pub fn canonical(rows: usize, cols: usize) -> Grid {
    Grid::from_coords(rows, cols, GUN_CELLS)
}
