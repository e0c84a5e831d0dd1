// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Lifebench — differential testbench for a bit-serial Game of Life circuit.
//!
//! Lifebench drives a synchronous sequential circuit that computes Conway's
//! Game of Life through its bit-serial shift interface, recomputes every
//! generation with a software oracle, and scores the circuit's output
//! generation by generation. Recorded trajectories can be replayed
//! interactively with single-step and press-and-hold auto-play.
//!
//! # Pipeline
//!
//! ```text
//! stimulus (random | canonical gun)
//!   → SerialLink.load      (serial — reverse row-major bit stream in)
//!   → NextTimeTick pulse    (serial — circuit advances one generation)
//!   → SerialLink.capture   (serial — recirculating non-destructive read)
//!   → oracle comparison     (runner — divergence recorded, never fatal)
//!   → GenerationSequence    (runner — full observed trajectory)
//!   → ReplayController      (replay — step / hold-to-play / restart)
//! ```
//!
//! # Key modules
//!
//! - [`grid`] — the shared n×m boolean cell matrix
//! - [`stimulus`] — random stimulus and the canonical Gosper-gun fixture
//! - [`oracle`] — software next-generation reference (hard edges, no wrap)
//! - [`dut`] — pin-level [`dut::Circuit`] trait and the software stand-in DUT
//! - [`trace`] — per-eval waveform samples, VCD output ([`trace::VcdTrace`])
//! - [`serial`] — bit-serial load/capture driver with explicit simulated time
//! - [`runner`] — differential scoring and convergence detection
//! - [`replay`] — interactive replay state machine and layout math
//! - [`testbench`] — JSON testbench configuration

pub mod grid;

pub mod stimulus;

pub mod oracle;

pub mod dut;

pub mod trace;

pub mod serial;

pub mod runner;

pub mod replay;

pub mod testbench;
