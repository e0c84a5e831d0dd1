// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Differential test-case runner.
//!
//! Drives the circuit generation by generation, captures its output after
//! every `NextTimeTick`, and compares each captured game state against the
//! software oracle. A divergence is recorded and logged but never aborts
//! the run: the harness privileges observing the full faulty trajectory
//! over halting at first mismatch. The run ends when the circuit reaches a
//! fixed point (captured state equals the previous expected state) or when
//! the generation budget is exhausted.

use crate::dut::Circuit;
use crate::grid::Grid;
use crate::oracle;
use crate::serial::SerialLink;
use crate::trace::TraceSink;

/// Per-test-case state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loaded,
    Stepping,
    Converged,
    ExhaustedBudget,
}

/// Generation budget for one test case.
#[derive(Debug, Clone, Copy)]
pub struct RunProfile {
    pub max_generations: usize,
}

impl RunProfile {
    /// Long-running profile for slow-evolving stimuli such as the gun.
    pub fn long() -> Self {
        RunProfile { max_generations: 200 }
    }
}

impl Default for RunProfile {
    fn default() -> Self {
        RunProfile { max_generations: 50 }
    }
}

/// One generation where the captured circuit output disagreed with the
/// oracle's prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    /// 0-based generation index (position in the generation sequence).
    pub generation: usize,
    pub mismatched_cells: usize,
}

/// Everything observed during one test case.
pub struct TestCaseReport {
    /// Every captured generation, index 0 = first generation after load.
    pub generations: Vec<Grid>,
    pub divergences: Vec<Divergence>,
    pub state: RunState,
    /// Generation index at which the fixed point was detected, if any.
    pub converged_at: Option<usize>,
}

impl TestCaseReport {
    /// True when no generation diverged from the oracle.
    pub fn passed(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// Orchestrates one test case against a circuit behind a [`SerialLink`].
pub struct DifferentialRunner {
    profile: RunProfile,
}

impl DifferentialRunner {
    pub fn new(profile: RunProfile) -> Self {
        DifferentialRunner { profile }
    }

    /// Run one test case: load `stimulus`, then step, capture and compare
    /// until convergence or budget exhaustion.
    pub fn run<C: Circuit, T: TraceSink>(
        &self,
        link: &mut SerialLink<C, T>,
        stimulus: &Grid,
    ) -> TestCaseReport {
        let (rows, cols) = (stimulus.rows(), stimulus.cols());
        let mut report = TestCaseReport {
            generations: Vec::new(),
            divergences: Vec::new(),
            state: RunState::Idle,
            converged_at: None,
        };

        link.load(stimulus);
        report.state = RunState::Loaded;

        // Expected state: the stimulus on generation 0, the oracle's last
        // output thereafter.
        let mut expected = stimulus.clone();
        report.state = RunState::Stepping;

        for generation in 0..self.profile.max_generations {
            link.tick_generation();
            let captured = link.capture(rows, cols);
            report.generations.push(captured.clone());

            if captured == expected {
                // Fixed point: the circuit reproduced the previous state.
                clilog::info!(
                    "converged at generation {} ({} live cells)",
                    generation + 1,
                    captured.live_count()
                );
                report.state = RunState::Converged;
                report.converged_at = Some(generation);
                return report;
            }

            expected = oracle::next(&expected);
            if captured != expected {
                let mismatched_cells = expected.diff_count(&captured);
                clilog::error!(
                    "divergence at generation {}: {} cells differ from oracle",
                    generation + 1,
                    mismatched_cells
                );
                report.divergences.push(Divergence {
                    generation,
                    mismatched_cells,
                });
            }
        }

        clilog::info!(
            "budget of {} generations exhausted without convergence",
            self.profile.max_generations
        );
        report.state = RunState::ExhaustedBudget;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dut::SoftLifeCircuit;
    use crate::stimulus;
    use crate::trace::NullTrace;

    fn link(rows: usize, cols: usize) -> SerialLink<SoftLifeCircuit, NullTrace> {
        SerialLink::new(SoftLifeCircuit::new(rows, cols), NullTrace)
    }

    #[test]
    fn test_still_life_converges_at_generation_one() {
        let mut l = link(4, 4);
        let block = Grid::from_coords(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let report = DifferentialRunner::new(RunProfile::default()).run(&mut l, &block);
        assert_eq!(report.state, RunState::Converged);
        assert_eq!(report.converged_at, Some(0));
        assert_eq!(report.generations.len(), 1);
        assert_eq!(report.generations[0], block);
        assert!(report.passed());
    }

    #[test]
    fn test_blinker_never_converges_within_budget() {
        let mut l = link(5, 5);
        let blinker = Grid::from_coords(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let report = DifferentialRunner::new(RunProfile { max_generations: 10 }).run(&mut l, &blinker);
        // A period-2 oscillator never equals the previous state.
        assert_eq!(report.state, RunState::ExhaustedBudget);
        assert_eq!(report.generations.len(), 10);
        assert!(report.passed());
        // Every captured generation matches the oracle trajectory.
        let mut expected = blinker;
        for g in &report.generations {
            expected = crate::oracle::next(&expected);
            assert_eq!(g, &expected);
        }
    }

    #[test]
    fn test_random_stimulus_tracks_oracle() {
        let mut l = link(6, 10);
        let stim = stimulus::random(6, 10);
        let report = DifferentialRunner::new(RunProfile::default()).run(&mut l, &stim);
        assert!(report.passed());
        assert!(!report.generations.is_empty());
    }

    #[test]
    fn test_faulty_circuit_is_flagged_but_run_continues() {
        let mut circuit = SoftLifeCircuit::new(5, 5);
        circuit.break_cell(0, 0);
        let mut l = SerialLink::new(circuit, NullTrace);
        let blinker = Grid::from_coords(5, 5, &[(1, 2), (2, 2), (3, 2)]);
        let report = DifferentialRunner::new(RunProfile { max_generations: 8 }).run(&mut l, &blinker);
        assert!(!report.passed());
        // The run keeps stepping after the first divergence.
        assert_eq!(report.generations.len(), 8);
        assert_eq!(report.divergences[0].generation, 0);
        assert_eq!(report.divergences[0].mismatched_cells, 1);
    }

    #[test]
    fn test_long_profile_budget() {
        assert_eq!(RunProfile::long().max_generations, 200);
        assert_eq!(RunProfile::default().max_generations, 50);
    }
}
