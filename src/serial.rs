// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Bit-serial shift driver for the circuit's clock/shift/data pins.
//!
//! The circuit accepts and produces its n×m game state as a single serial
//! bit stream, one bit per clock pulse, in *reverse* row-major order: the
//! last row's last column is transmitted first, so the stream head
//! corresponds to a shift register whose head is the last cell.
//!
//! [`SerialLink`] owns the circuit, the trace sink, and the simulated-time
//! counter. Every pin evaluation goes through [`SerialLink::step`], which
//! evaluates the circuit, emits one trace sample, and advances time by one
//! unit — so the waveform is a complete record of the run.

use crate::dut::Circuit;
use crate::grid::Grid;
use crate::trace::{PinSample, TraceSink};

/// Serial load/capture driver. Single owner of the circuit for the run;
/// operations are strictly sequential, never interleaved.
pub struct SerialLink<C: Circuit, T: TraceSink> {
    circuit: C,
    trace: T,
    time: u64,
    pins: PinSample,
}

impl<C: Circuit, T: TraceSink> SerialLink<C, T> {
    pub fn new(circuit: C, trace: T) -> Self {
        SerialLink {
            circuit,
            trace,
            time: 0,
            pins: PinSample::default(),
        }
    }

    /// Simulated time units elapsed so far (one per `eval`).
    pub fn elapsed(&self) -> u64 {
        self.time
    }

    /// Evaluate the circuit, dump one trace sample, advance time.
    fn step(&mut self) {
        self.circuit.eval();
        self.pins.data_out = self.circuit.data_out();
        self.trace.sample(self.time, self.pins);
        self.time += 1;
    }

    fn set_clock(&mut self, level: bool) {
        self.pins.clock = level;
        self.circuit.set_clock(level);
    }

    fn set_shift(&mut self, level: bool) {
        self.pins.shift = level;
        self.circuit.set_shift(level);
    }

    fn set_data_in(&mut self, bit: bool) {
        self.pins.data_in = bit;
        self.circuit.set_data_in(bit);
    }

    fn set_next_tick(&mut self, level: bool) {
        self.pins.next_tick = level;
        self.circuit.set_next_tick(level);
    }

    /// One full clock pulse: high, step, low, step.
    fn pulse_clock(&mut self) {
        self.set_clock(true);
        self.step();
        self.set_clock(false);
        self.step();
    }

    /// Drive all inputs low and run a few idle clock pulses before the
    /// first test case.
    pub fn settle(&mut self, cycles: usize) {
        self.set_shift(false);
        self.set_next_tick(false);
        self.set_data_in(false);
        for _ in 0..cycles {
            self.pulse_clock();
        }
    }

    /// Shift a full game state into the circuit.
    ///
    /// Write-only: `DataOut` is never referenced. Ends by dropping `Shift`
    /// and latching the mode change with one extra pulse.
    pub fn load(&mut self, grid: &Grid) {
        self.set_shift(true);
        for i in (0..grid.rows()).rev() {
            for j in (0..grid.cols()).rev() {
                self.set_data_in(grid.get(i, j));
                self.pulse_clock();
            }
        }
        self.set_shift(false);
        self.pulse_clock();
    }

    /// Shift the circuit's game state out into a fresh grid.
    ///
    /// Each bit read from `DataOut` is fed back into `DataIn`, so the
    /// circuit's shift register is read non-destructively: after the full
    /// pass it holds the same state it started with.
    pub fn capture(&mut self, rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::dead(rows, cols);
        self.set_shift(true);
        for i in (0..rows).rev() {
            for j in (0..cols).rev() {
                let bit = self.circuit.data_out();
                grid.set(i, j, bit);
                self.set_data_in(bit);
                self.pulse_clock();
            }
        }
        self.set_shift(false);
        self.pulse_clock();
        grid
    }

    /// Pulse `NextTimeTick` to advance the circuit by one generation:
    /// one full clock with the pin high, one with it low.
    pub fn tick_generation(&mut self) {
        self.set_next_tick(true);
        self.pulse_clock();
        self.set_next_tick(false);
        self.pulse_clock();
    }
}
