// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Waveform trace output for the harness-side circuit pins.
//!
//! Every `eval` of the circuit emits one timestamped [`PinSample`] to a
//! [`TraceSink`]. [`VcdTrace`] writes the samples to a VCD file with
//! change-only scalar emission; [`NullTrace`] discards them for headless
//! runs and tests.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use vcd_ng::{IdCode, SimulationCommand, TimescaleUnit, Value};

/// One sample of the five harness-visible pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinSample {
    pub clock: bool,
    pub shift: bool,
    pub data_in: bool,
    pub data_out: bool,
    pub next_tick: bool,
}

impl PinSample {
    fn bits(&self) -> [bool; 5] {
        [self.clock, self.shift, self.data_in, self.data_out, self.next_tick]
    }
}

/// Sink for timestamped pin samples.
///
/// Buffered implementations flush when dropped at the end of the run.
pub trait TraceSink {
    /// Record the pin state at the given simulated time.
    fn sample(&mut self, time: u64, pins: PinSample);
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn sample(&mut self, time: u64, pins: PinSample) {
        (**self).sample(time, pins)
    }
}

/// Trace sink that discards all samples.
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn sample(&mut self, _time: u64, _pins: PinSample) {}
}

/// VCD writer for the harness pin trace.
///
/// Registers one scalar wire per pin under a `lifebench` scope and emits a
/// change only when a pin actually toggles, so idle stretches stay compact.
pub struct VcdTrace {
    writer: vcd_ng::Writer<BufWriter<File>>,
    wires: Vec<IdCode>,
    // 0 = low, 1 = high, 2 = initial (always emit first sample).
    last_val: [u8; 5],
}

const PIN_NAMES: [&str; 5] = ["clock", "shift", "data_in", "data_out", "next_tick"];

impl VcdTrace {
    /// Create the VCD file and write its header and wire definitions.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        let mut writer = vcd_ng::Writer::new(file);
        writer.timescale(1, TimescaleUnit::NS)?;
        writer.add_module("lifebench")?;
        let mut wires = Vec::with_capacity(PIN_NAMES.len());
        for name in PIN_NAMES {
            wires.push(writer.add_wire(1, name)?);
        }
        writer.upscope()?;
        writer.enddefinitions()?;
        writer.begin(SimulationCommand::Dumpvars)?;
        Ok(VcdTrace {
            writer,
            wires,
            last_val: [2; 5],
        })
    }
}

impl TraceSink for VcdTrace {
    fn sample(&mut self, time: u64, pins: PinSample) {
        let bits = pins.bits();
        let mut timestamp_written = false;
        for i in 0..5 {
            let v = bits[i] as u8;
            if v == self.last_val[i] {
                continue;
            }
            self.last_val[i] = v;
            if !timestamp_written {
                self.writer.timestamp(time).unwrap();
                timestamp_written = true;
            }
            self.writer
                .change_scalar(self.wires[i], if bits[i] { Value::V1 } else { Value::V0 })
                .unwrap();
        }
    }
}

/// In-memory trace sink recording every sample, for harness tests.
#[cfg(test)]
pub struct RecordingTrace {
    pub samples: Vec<(u64, PinSample)>,
}

#[cfg(test)]
impl RecordingTrace {
    pub fn new() -> Self {
        RecordingTrace { samples: Vec::new() }
    }
}

#[cfg(test)]
impl TraceSink for RecordingTrace {
    fn sample(&mut self, time: u64, pins: PinSample) {
        self.samples.push((time, pins));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_trace_is_monotonic_under_driver() {
        let mut t = RecordingTrace::new();
        for time in 0..10 {
            t.sample(
                time,
                PinSample {
                    clock: time % 2 == 0,
                    ..Default::default()
                },
            );
        }
        assert_eq!(t.samples.len(), 10);
        assert!(t.samples.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_vcd_emits_timestamps_only_on_pin_changes() {
        let path = std::env::temp_dir().join("lifebench_vcd_change_only.vcd");
        {
            let mut t = VcdTrace::create(&path).unwrap();
            // First sample always dumps the initial pin values.
            t.sample(0, PinSample::default());
            // Identical sample: nothing to write, no timestamp.
            t.sample(1, PinSample::default());
            t.sample(
                2,
                PinSample {
                    clock: true,
                    ..Default::default()
                },
            );
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        let timestamps: Vec<&str> = contents
            .lines()
            .filter(|l| l.starts_with('#'))
            .collect();
        assert_eq!(timestamps, vec!["#0", "#2"]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_null_trace_accepts_samples() {
        let mut t = NullTrace;
        t.sample(0, PinSample::default());
    }
}
