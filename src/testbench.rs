// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Testbench configuration (loaded from JSON).
//!
//! Everything here has a default, so `{}` is a valid config; CLI flags
//! override individual fields after loading.

use std::path::Path;

use serde::Deserialize;

/// Testbench configuration loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchConfig {
    /// Grid rows (n).
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Grid columns (m).
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Generation budget per test case.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Idle clock pulses before the first test case.
    #[serde(default = "default_settle_cycles")]
    pub settle_cycles: usize,
    /// Write the harness pin waveform to this VCD path.
    #[serde(default)]
    pub vcd_path: Option<String>,
    /// Number of test cases per headless batch run.
    #[serde(default = "default_num_cases")]
    pub num_cases: usize,
    /// Auto-play pace bounds in milliseconds per generation.
    #[serde(default = "default_pace_min_ms")]
    pub pace_min_ms: u32,
    #[serde(default = "default_pace_max_ms")]
    pub pace_max_ms: u32,
}

fn default_rows() -> usize {
    6
}

fn default_cols() -> usize {
    10
}

fn default_max_generations() -> usize {
    50
}

fn default_settle_cycles() -> usize {
    5
}

fn default_num_cases() -> usize {
    1
}

fn default_pace_min_ms() -> u32 {
    20
}

fn default_pace_max_ms() -> u32 {
    500
}

impl Default for BenchConfig {
    fn default() -> Self {
        serde_json::from_str("{}").unwrap()
    }
}

impl BenchConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }
}
