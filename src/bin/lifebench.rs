// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! CLI for the lifebench differential Game of Life testbench.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use lifebench::dut::SoftLifeCircuit;
use lifebench::grid::Grid;
use lifebench::replay::{InputEvent, PaceSetting, ReplayController};
use lifebench::runner::{DifferentialRunner, RunProfile, RunState};
use lifebench::serial::SerialLink;
use lifebench::stimulus;
use lifebench::testbench::BenchConfig;
use lifebench::trace::{NullTrace, TraceSink, VcdTrace};

#[derive(Parser)]
#[command(
    name = "lifebench",
    about = "Differential testbench for a bit-serial Game of Life circuit"
)]
struct Cli {
    /// JSON testbench configuration. CLI flags override individual fields.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Grid rows (n).
    #[clap(long)]
    rows: Option<usize>,

    /// Grid columns (m).
    #[clap(long)]
    cols: Option<usize>,

    /// Generation budget per test case.
    #[clap(long)]
    generations: Option<usize>,

    /// Use the long-run profile (200 generations), e.g. for the gun fixture.
    #[clap(long)]
    long: bool,

    /// Write the harness-side pin waveform to this VCD path.
    #[clap(long)]
    vcd: Option<PathBuf>,

    /// Start the first test case from the canonical glider-gun fixture
    /// instead of random stimulus.
    #[clap(long)]
    canonical: bool,

    /// Number of test cases to run.
    #[clap(long)]
    cases: Option<usize>,

    /// Replay each recorded trajectory in the terminal, paced by the
    /// hold-to-play controller.
    #[clap(long)]
    autoplay: bool,

    /// Inject a fault: force this cell (row,col) wrong in every generation
    /// the circuit computes, to demonstrate divergence reporting.
    #[clap(long, value_delimiter = ',', num_args = 2, value_names = ["ROW", "COL"])]
    break_cell: Vec<usize>,
}

fn main() {
    clilog::init_stderr_color_debug();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        clilog::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut cfg = match &cli.config {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::default(),
    };
    if let Some(rows) = cli.rows {
        cfg.rows = rows;
    }
    if let Some(cols) = cli.cols {
        cfg.cols = cols;
    }
    if let Some(generations) = cli.generations {
        cfg.max_generations = generations;
    } else if cli.long {
        cfg.max_generations = RunProfile::long().max_generations;
    }
    if let Some(cases) = cli.cases {
        cfg.num_cases = cases;
    }
    if let Some(vcd) = &cli.vcd {
        cfg.vcd_path = Some(vcd.display().to_string());
    }
    if cfg.rows == 0 || cfg.cols == 0 {
        return Err(format!("grid must be at least 1x1, got {}x{}", cfg.rows, cfg.cols));
    }
    if cfg.pace_min_ms > cfg.pace_max_ms {
        return Err(format!(
            "pace bounds inverted: min {} ms > max {} ms",
            cfg.pace_min_ms, cfg.pace_max_ms
        ));
    }

    let mut circuit = SoftLifeCircuit::new(cfg.rows, cfg.cols);
    match cli.break_cell.as_slice() {
        [] => {}
        &[row, col] if row < cfg.rows && col < cfg.cols => circuit.break_cell(row, col),
        other => return Err(format!("--break-cell expects an in-bounds row,col pair, got {:?}", other)),
    }

    let trace: Box<dyn TraceSink> = match &cfg.vcd_path {
        Some(path) => {
            clilog::info!("writing pin waveform to {}", path);
            Box::new(
                VcdTrace::create(std::path::Path::new(path))
                    .map_err(|e| format!("failed to create VCD {}: {}", path, e))?,
            )
        }
        None => Box::new(NullTrace),
    };

    let mut link = SerialLink::new(circuit, trace);
    link.settle(cfg.settle_cycles);

    let runner = DifferentialRunner::new(RunProfile {
        max_generations: cfg.max_generations,
    });
    let pace = PaceSetting::new(cfg.pace_min_ms, cfg.pace_max_ms);

    let mut canonical_next = cli.canonical;
    let mut total_divergences = 0usize;
    for case in 1..=cfg.num_cases {
        let stim = if canonical_next {
            stimulus::canonical(cfg.rows, cfg.cols)
        } else {
            stimulus::random(cfg.rows, cfg.cols)
        };
        clilog::info!(
            "test case {}/{}: {} stimulus, {}x{} grid, budget {}",
            case,
            cfg.num_cases,
            if canonical_next { "canonical" } else { "random" },
            cfg.rows,
            cfg.cols,
            cfg.max_generations
        );

        let report = runner.run(&mut link, &stim);
        total_divergences += report.divergences.len();
        match report.state {
            RunState::Converged => clilog::info!(
                "test case {} converged after {} generations, {} divergences",
                case,
                report.generations.len(),
                report.divergences.len()
            ),
            _ => clilog::info!(
                "test case {} ran {} generations without converging, {} divergences",
                case,
                report.generations.len(),
                report.divergences.len()
            ),
        }

        if cli.autoplay {
            autoplay(&report.generations, pace);
        }
        // Headless restarts always draw a fresh random stimulus, like the
        // interactive "new random game" control.
        canonical_next = false;
    }

    if total_divergences > 0 {
        clilog::warn!(
            "{} divergent generations across {} test cases",
            total_divergences,
            cfg.num_cases
        );
    } else {
        clilog::info!("all test cases matched the oracle");
    }
    clilog::info!("simulated {} time units", link.elapsed());
    Ok(())
}

/// Replay one trajectory in the terminal, paced by the hold-to-play
/// controller: a synthetic press on the iterate control is held for the
/// whole pass, so the printout advances at the configured pace.
fn autoplay(frames: &[Grid], pace: PaceSetting) {
    let mut controller = ReplayController::with_pace(frames.to_vec(), 800.0, 800.0, pace);
    let button = controller.layout().iter_button;
    let (bx, by) = (button.x + button.w / 2.0, button.y + button.h / 2.0);
    let start = Instant::now();
    controller.handle_event(InputEvent::Pressed { x: bx, y: by }, 0);

    println!("generation 1/{}\n{}", frames.len(), frames[0]);
    let mut shown = 1;
    let mut last_index = 0;
    while shown < frames.len() {
        let now = start.elapsed().as_millis() as u64;
        controller.tick(now);
        if controller.frame_index() != last_index {
            last_index = controller.frame_index();
            shown += 1;
            println!(
                "generation {}/{}\n{}",
                last_index + 1,
                frames.len(),
                controller.current()
            );
        }
        thread::sleep(Duration::from_millis(2));
    }
    let now = start.elapsed().as_millis() as u64;
    controller.handle_event(InputEvent::Released { x: 0.0, y: 0.0 }, now);
}
