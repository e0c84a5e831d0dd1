// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Pin-level interface to the circuit under test.
//!
//! The harness only ever talks to the circuit through the [`Circuit`] trait:
//! drive the input pins, call [`Circuit::eval`] to re-evaluate combinational
//! logic, and read `DataOut`. A Verilated hardware model plugs in behind
//! this trait; [`SoftLifeCircuit`] is a software stand-in with the same
//! bit-serial shift interface, used as the default device and in tests.

use crate::grid::Grid;
use crate::oracle;

/// Pin interface of the bit-serial Game of Life circuit.
///
/// `eval` re-evaluates combinational outputs after input changes and applies
/// edge-triggered behavior; it never advances simulated time itself — the
/// serial driver owns the time counter.
pub trait Circuit {
    /// Drive the clock pin.
    fn set_clock(&mut self, level: bool);
    /// Drive the `Shift` mode pin (1 = serial load/unload mode).
    fn set_shift(&mut self, level: bool);
    /// Drive the serial `DataIn` pin.
    fn set_data_in(&mut self, bit: bool);
    /// Drive the `NextTimeTick` pin (pulse to advance one generation).
    fn set_next_tick(&mut self, level: bool);
    /// Read the combinational serial `DataOut` pin.
    fn data_out(&self) -> bool;
    /// Re-evaluate the circuit after any input change.
    fn eval(&mut self);
}

/// Software stand-in for the bit-serial Game of Life circuit.
///
/// Models the DUT's externally visible behavior: an n·m-bit shift register
/// holding the game state in row-major order, with `DataOut` wired to the
/// last cell. On a rising clock edge:
///
/// - `Shift=1`: the register shifts by one; `DataIn` enters at cell (0,0).
/// - `Shift=0`, `NextTimeTick=1`: the register is replaced by the next
///   generation.
///
/// With `break_cell` set, one cell of every computed generation is forced
/// wrong, which makes the harness's divergence path observable end to end.
pub struct SoftLifeCircuit {
    rows: usize,
    cols: usize,
    reg: Vec<bool>,
    clock: bool,
    prev_clock: bool,
    shift: bool,
    data_in: bool,
    next_tick: bool,
    break_cell: Option<(usize, usize)>,
}

impl SoftLifeCircuit {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1, "circuit grid must be at least 1x1");
        SoftLifeCircuit {
            rows,
            cols,
            reg: vec![false; rows * cols],
            clock: false,
            prev_clock: false,
            shift: false,
            data_in: false,
            next_tick: false,
            break_cell: None,
        }
    }

    /// Force cell (row, col) to the wrong value in every computed
    /// generation. Fault-injection knob for exercising divergence handling.
    pub fn break_cell(&mut self, row: usize, col: usize) {
        assert!(row < self.rows && col < self.cols);
        self.break_cell = Some((row, col));
    }

    fn rising_edge(&mut self) {
        if self.shift {
            // Serial mode: shift toward the DataOut end, DataIn fills (0,0).
            self.reg.rotate_right(1);
            self.reg[0] = self.data_in;
        } else if self.next_tick {
            let current = Grid::from_fn(self.rows, self.cols, |i, j| self.reg[i * self.cols + j]);
            let mut next = oracle::next(&current);
            if let Some((bi, bj)) = self.break_cell {
                let v = next.get(bi, bj);
                next.set(bi, bj, !v);
            }
            for i in 0..self.rows {
                for j in 0..self.cols {
                    self.reg[i * self.cols + j] = next.get(i, j);
                }
            }
        }
    }
}

impl Circuit for SoftLifeCircuit {
    fn set_clock(&mut self, level: bool) {
        self.clock = level;
    }

    fn set_shift(&mut self, level: bool) {
        self.shift = level;
    }

    fn set_data_in(&mut self, bit: bool) {
        self.data_in = bit;
    }

    fn set_next_tick(&mut self, level: bool) {
        self.next_tick = level;
    }

    fn data_out(&self) -> bool {
        self.reg[self.reg.len() - 1]
    }

    fn eval(&mut self) {
        if self.clock && !self.prev_clock {
            self.rising_edge();
        }
        self.prev_clock = self.clock;
        // DataOut reads straight from the register head; nothing further
        // to settle combinationally.
    }
}
