// SPDX-FileCopyrightText: Copyright (c) 2024 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//! Interactive replay of a recorded generation sequence.
//!
//! The controller is a single-threaded, event-driven state machine over an
//! abstract input-event stream and draw surface; it owns state and layout
//! math only and emits draw commands through the [`Surface`] trait, so it
//! runs (and is tested) without any windowing system. Time never comes from
//! a wall clock inside the controller: every entry point takes an explicit
//! `now_ms`, which keeps the 500 ms click/hold disambiguation and the
//! auto-advance cadence deterministic under test.

use crate::grid::Grid;

/// A press shorter than this is a click (advance one generation); holding
/// past it starts auto-advancing at the pace setting.
pub const CLICK_HOLD_THRESHOLD_MS: u64 = 500;

// ── Geometry and draw-command types ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// RGBA fill color for draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const ALIVE_CELL: Rgba = Rgba { r: 0, g: 255, b: 75, a: 150 };
pub const DEAD_CELL: Rgba = Rgba { r: 200, g: 0, b: 0, a: 150 };
pub const BUTTON: Rgba = Rgba { r: 0, g: 150, b: 255, a: 255 };
pub const SLIDER_TRACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };
pub const SLIDER_THUMB: Rgba = Rgba { r: 255, g: 0, b: 0, a: 255 };

/// Pixel-drawing collaborator. The controller only emits filled rectangles
/// and labeled buttons; rasterization lives entirely behind this trait.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn label(&mut self, rect: Rect, text: &str, char_size: f32);
    fn present(&mut self);
}

// ── Input events ────────────────────────────────────────────────────────────

/// Input events consumed by the controller. Coordinates are pixels; the
/// event timestamp is passed separately as `now_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed { x: f32, y: f32 },
    Released { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
    Resized { width: f32, height: f32 },
    Closed,
}

/// Source of input events and timestamps for a replay session.
pub trait EventSource {
    /// Drain all pending events into `out`.
    fn poll_events(&mut self, out: &mut Vec<InputEvent>);
    /// Milliseconds since an arbitrary session epoch.
    fn now_ms(&mut self) -> u64;
}

/// What the outer loop should do after a replay session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Window closed (or surface resource failure): end the whole run.
    Terminate,
    /// Start a new test case from random stimulus.
    RestartRandom,
    /// Start a new test case from the canonical gun stimulus.
    RestartCanonical,
}

// ── Pace setting ────────────────────────────────────────────────────────────

/// Auto-advance pace in milliseconds per generation, clamped to
/// `[min, max]`. Mutated only by the slider interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceSetting {
    ms: u32,
    min: u32,
    max: u32,
}

impl PaceSetting {
    pub fn new(min: u32, max: u32) -> Self {
        assert!(min <= max);
        PaceSetting { ms: 50.clamp(min, max), min, max }
    }

    pub fn ms(&self) -> u32 {
        self.ms
    }

    /// Set from a 0.0..=1.0 slider position, 0.0 = fastest (minimum pace).
    fn set_from_ratio(&mut self, ratio: f32) {
        let ratio = ratio.clamp(0.0, 1.0);
        self.ms = self.min + (ratio * (self.max - self.min) as f32) as u32;
    }
}

impl Default for PaceSetting {
    fn default() -> Self {
        PaceSetting::new(20, 500)
    }
}

// ── Layout ──────────────────────────────────────────────────────────────────

/// Control positions and grid geometry for the current window size.
///
/// Recomputed on every resize; holds no interaction state except the slider
/// thumb's vertical position, which encodes the pace visually.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub window_w: f32,
    pub window_h: f32,
    /// "Calc Next Iteration" button, bottom center.
    pub iter_button: Rect,
    /// "New Random Game" button, top left.
    pub random_button: Rect,
    /// "Special Game" button, top right.
    pub canonical_button: Rect,
    pub slider_track: Rect,
    pub slider_thumb: Rect,
    /// Cell edge length chosen so the full grid fits the window.
    pub cell_size: f32,
    /// Top-left corner of the centered grid.
    pub grid_origin: (f32, f32),
    rows: usize,
    cols: usize,
}

const EDGE_PAD: f32 = 20.0;
const SLIDER_TOP: f32 = 100.0;
const SLIDER_LEN: f32 = 300.0;

impl Layout {
    pub fn compute(window_w: f32, window_h: f32, rows: usize, cols: usize) -> Self {
        let iter_w = window_w * 0.25;
        let side_w = window_w * 0.375;
        let button_h = window_h * 0.06;

        let cell_size = (window_w / cols as f32).min(window_h / rows as f32);
        let grid_w = cell_size * cols as f32;
        let grid_h = cell_size * rows as f32;

        Layout {
            window_w,
            window_h,
            iter_button: Rect::new(
                (window_w - iter_w) / 2.0,
                window_h - button_h - EDGE_PAD,
                iter_w,
                button_h,
            ),
            random_button: Rect::new(EDGE_PAD, EDGE_PAD, side_w, button_h),
            canonical_button: Rect::new(window_w - side_w - EDGE_PAD, EDGE_PAD, side_w, button_h),
            slider_track: Rect::new(window_w - 30.0, SLIDER_TOP, 10.0, SLIDER_LEN),
            slider_thumb: Rect::new(window_w - 35.0, SLIDER_TOP, 20.0, 20.0),
            cell_size,
            grid_origin: ((window_w - grid_w) / 2.0, (window_h - grid_h) / 2.0),
            rows,
            cols,
        }
    }

    /// Recompute for a new window size, keeping the thumb's track position.
    fn resize(&mut self, window_w: f32, window_h: f32) {
        let thumb_y = self.slider_thumb.y;
        *self = Layout::compute(window_w, window_h, self.rows, self.cols);
        self.slider_thumb.y = thumb_y;
    }

    /// Pixel rect of cell (row, col).
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.grid_origin.0 + col as f32 * self.cell_size,
            self.grid_origin.1 + row as f32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }
}

// ── Controller ──────────────────────────────────────────────────────────────

/// Click/hold disambiguation state for the iterate control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Idle,
    /// Pressed, not yet past the click threshold.
    Armed { pressed_at: u64 },
    /// Held past the threshold; auto-advancing once per pace interval.
    Advancing { last_advance: u64 },
}

/// Replays a recorded generation sequence: manual single-step, press-and-hold
/// auto-play at an adjustable pace, and restart/terminate signaling.
pub struct ReplayController {
    frames: Vec<Grid>,
    index: usize,
    pace: PaceSetting,
    hold: HoldState,
    dragging_slider: bool,
    layout: Layout,
}

impl ReplayController {
    pub fn new(frames: Vec<Grid>, window_w: f32, window_h: f32) -> Self {
        Self::with_pace(frames, window_w, window_h, PaceSetting::default())
    }

    pub fn with_pace(frames: Vec<Grid>, window_w: f32, window_h: f32, pace: PaceSetting) -> Self {
        assert!(!frames.is_empty(), "replay needs at least one generation");
        let (rows, cols) = (frames[0].rows(), frames[0].cols());
        ReplayController {
            frames,
            index: 0,
            pace,
            hold: HoldState::Idle,
            dragging_slider: false,
            layout: Layout::compute(window_w, window_h, rows, cols),
        }
    }

    pub fn current(&self) -> &Grid {
        &self.frames[self.index]
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn pace(&self) -> &PaceSetting {
        &self.pace
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn advance_one(&mut self) {
        self.index += 1;
        if self.index >= self.frames.len() {
            self.index = 0;
        }
    }

    /// Feed one input event. Returns a session outcome when the event ends
    /// the replay (close or restart buttons).
    pub fn handle_event(&mut self, event: InputEvent, now_ms: u64) -> Option<ReplayOutcome> {
        match event {
            InputEvent::Closed => return Some(ReplayOutcome::Terminate),
            InputEvent::Pressed { x, y } => {
                if self.layout.iter_button.contains(x, y) {
                    self.hold = HoldState::Armed { pressed_at: now_ms };
                } else if self.layout.random_button.contains(x, y) {
                    return Some(ReplayOutcome::RestartRandom);
                } else if self.layout.canonical_button.contains(x, y) {
                    return Some(ReplayOutcome::RestartCanonical);
                } else if self.layout.slider_thumb.contains(x, y) {
                    self.dragging_slider = true;
                }
            }
            InputEvent::Released { x, y } => {
                self.dragging_slider = false;
                if let HoldState::Armed { pressed_at } = self.hold {
                    let is_click = now_ms.saturating_sub(pressed_at) < CLICK_HOLD_THRESHOLD_MS;
                    if is_click && self.layout.iter_button.contains(x, y) {
                        self.advance_one();
                    }
                }
                // Auto-advance stops immediately on release, wherever it lands.
                self.hold = HoldState::Idle;
            }
            InputEvent::Moved { y, .. } => {
                if self.dragging_slider {
                    let track = self.layout.slider_track;
                    let clamped = y.clamp(track.y, track.y + track.h);
                    self.layout.slider_thumb.y = clamped;
                    self.pace.set_from_ratio((clamped - track.y) / track.h);
                }
            }
            InputEvent::Resized { width, height } => {
                self.layout.resize(width, height);
            }
        }
        None
    }

    /// Periodic time tick: runs the press-and-hold auto-advance.
    pub fn tick(&mut self, now_ms: u64) {
        match self.hold {
            HoldState::Armed { pressed_at }
                if now_ms.saturating_sub(pressed_at) >= CLICK_HOLD_THRESHOLD_MS =>
            {
                // First auto-advance fires at the threshold itself.
                self.advance_one();
                self.hold = HoldState::Advancing { last_advance: now_ms };
            }
            HoldState::Advancing { last_advance }
                if now_ms.saturating_sub(last_advance) >= self.pace.ms() as u64 =>
            {
                self.advance_one();
                self.hold = HoldState::Advancing { last_advance: now_ms };
            }
            _ => {}
        }
    }

    /// Emit draw commands for the current frame and all controls.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        let grid = self.current();
        for i in 0..grid.rows() {
            for j in 0..grid.cols() {
                let color = if grid.get(i, j) { ALIVE_CELL } else { DEAD_CELL };
                surface.fill_rect(self.layout.cell_rect(i, j), color);
            }
        }
        let l = &self.layout;
        surface.fill_rect(l.iter_button, BUTTON);
        surface.label(l.iter_button, "Calc Next Iteration", l.iter_button.h * 0.5);
        surface.fill_rect(l.random_button, BUTTON);
        surface.label(l.random_button, "Click for New Random Game", l.random_button.h * 0.5);
        surface.fill_rect(l.canonical_button, BUTTON);
        surface.label(l.canonical_button, "Click for Special Game", l.canonical_button.h * 0.5);
        surface.fill_rect(l.slider_track, SLIDER_TRACK);
        surface.fill_rect(l.slider_thumb, SLIDER_THUMB);
    }
}

// ── Session loop ────────────────────────────────────────────────────────────

/// Cooperative poll loop for one replay session.
///
/// Processes one event batch per iteration. A close event anywhere in the
/// batch terminates before any other queued event is acted on.
pub fn run_session<E: EventSource, S: Surface>(
    controller: &mut ReplayController,
    events: &mut E,
    surface: &mut S,
) -> ReplayOutcome {
    let mut queue = Vec::new();
    loop {
        queue.clear();
        events.poll_events(&mut queue);
        let now = events.now_ms();
        if queue.iter().any(|e| matches!(e, InputEvent::Closed)) {
            return ReplayOutcome::Terminate;
        }
        for &event in &queue {
            if let Some(outcome) = controller.handle_event(event, now) {
                return outcome;
            }
        }
        controller.tick(now);
        controller.render(surface);
        surface.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn frames(n: usize) -> Vec<Grid> {
        (0..n).map(|i| Grid::from_coords(3, 3, &[(i % 3, i % 3)])).collect()
    }

    fn controller(n: usize) -> ReplayController {
        ReplayController::new(frames(n), 800.0, 800.0)
    }

    fn center(r: Rect) -> (f32, f32) {
        (r.x + r.w / 2.0, r.y + r.h / 2.0)
    }

    #[test]
    fn test_short_press_is_a_click() {
        let mut c = controller(4);
        let (x, y) = center(c.layout().iter_button);
        c.handle_event(InputEvent::Pressed { x, y }, 1000);
        c.tick(1100);
        assert_eq!(c.frame_index(), 0);
        c.handle_event(InputEvent::Released { x, y }, 1200);
        assert_eq!(c.frame_index(), 1);
    }

    #[test]
    fn test_click_wraps_past_the_end() {
        let mut c = controller(2);
        let (x, y) = center(c.layout().iter_button);
        for _ in 0..2 {
            c.handle_event(InputEvent::Pressed { x, y }, 0);
            c.handle_event(InputEvent::Released { x, y }, 10);
        }
        assert_eq!(c.frame_index(), 0);
    }

    #[test]
    fn test_hold_auto_advances_at_pace() {
        let mut c = ReplayController::with_pace(frames(100), 800.0, 800.0, PaceSetting::default());
        let pace = c.pace().ms() as u64;
        let (x, y) = center(c.layout().iter_button);
        c.handle_event(InputEvent::Pressed { x, y }, 0);

        // Nothing before the 500 ms threshold.
        c.tick(499);
        assert_eq!(c.frame_index(), 0);

        // First auto-advance at the threshold.
        c.tick(500);
        assert_eq!(c.frame_index(), 1);

        // Then once per pace interval, not faster.
        c.tick(500 + pace - 1);
        assert_eq!(c.frame_index(), 1);
        c.tick(500 + pace);
        assert_eq!(c.frame_index(), 2);
        c.tick(500 + 2 * pace);
        assert_eq!(c.frame_index(), 3);

        // Release stops advancing immediately and does not add a click.
        c.handle_event(InputEvent::Released { x, y }, 500 + 2 * pace + 1);
        c.tick(10_000);
        assert_eq!(c.frame_index(), 3);
    }

    #[test]
    fn test_release_outside_button_is_not_a_click() {
        let mut c = controller(4);
        let (x, y) = center(c.layout().iter_button);
        c.handle_event(InputEvent::Pressed { x, y }, 0);
        c.handle_event(InputEvent::Released { x: 0.0, y: 0.0 }, 100);
        assert_eq!(c.frame_index(), 0);
    }

    #[test]
    fn test_restart_buttons() {
        let mut c = controller(3);
        let (x, y) = center(c.layout().random_button);
        assert_eq!(
            c.handle_event(InputEvent::Pressed { x, y }, 0),
            Some(ReplayOutcome::RestartRandom)
        );
        let (x, y) = center(c.layout().canonical_button);
        assert_eq!(
            c.handle_event(InputEvent::Pressed { x, y }, 0),
            Some(ReplayOutcome::RestartCanonical)
        );
    }

    #[test]
    fn test_close_terminates() {
        let mut c = controller(3);
        assert_eq!(
            c.handle_event(InputEvent::Closed, 0),
            Some(ReplayOutcome::Terminate)
        );
    }

    #[test]
    fn test_slider_maps_track_linearly() {
        let mut c = controller(3);
        let track = c.layout().slider_track;
        let (tx, ty) = center(c.layout().slider_thumb);
        c.handle_event(InputEvent::Pressed { x: tx, y: ty }, 0);

        // Drag far above the track: clamps to the top = minimum pace.
        c.handle_event(InputEvent::Moved { x: tx, y: -100.0 }, 10);
        assert_eq!(c.pace().ms(), 20);

        // Far below: clamps to the bottom = maximum pace.
        c.handle_event(InputEvent::Moved { x: tx, y: 10_000.0 }, 20);
        assert_eq!(c.pace().ms(), 500);

        // Midpoint interpolates linearly.
        c.handle_event(InputEvent::Moved { x: tx, y: track.y + track.h / 2.0 }, 30);
        assert_eq!(c.pace().ms(), 260);

        // Monotonic along the track.
        let mut last = 0;
        for step in 0..=10 {
            let y = track.y + track.h * step as f32 / 10.0;
            c.handle_event(InputEvent::Moved { x: tx, y }, 40 + step);
            assert!(c.pace().ms() >= last);
            last = c.pace().ms();
        }

        // Release anywhere freezes the pace and ends dragging.
        c.handle_event(InputEvent::Released { x: 0.0, y: 0.0 }, 100);
        let frozen = c.pace().ms();
        c.handle_event(InputEvent::Moved { x: tx, y: track.y }, 110);
        assert_eq!(c.pace().ms(), frozen);
    }

    #[test]
    fn test_resize_recomputes_layout_only() {
        let mut c = controller(3);
        let (x, y) = center(c.layout().iter_button);
        c.handle_event(InputEvent::Pressed { x, y }, 0);
        c.handle_event(InputEvent::Resized { width: 1200.0, height: 600.0 }, 10);

        let l = c.layout();
        assert_eq!(l.window_w, 1200.0);
        assert_eq!(l.iter_button.w, 300.0);
        // Grid still fits and is centered.
        assert_eq!(l.cell_size, 200.0);
        assert_eq!(l.grid_origin, (300.0, 0.0));
        // Interaction state survives the resize: hold still armed.
        c.tick(600);
        assert_eq!(c.frame_index(), 1);
    }

    // Scripted session plumbing.
    struct Script {
        batches: Vec<(u64, Vec<InputEvent>)>,
        cursor: usize,
    }

    impl EventSource for Script {
        fn poll_events(&mut self, out: &mut Vec<InputEvent>) {
            if let Some((_, batch)) = self.batches.get(self.cursor) {
                out.extend_from_slice(batch);
            }
        }

        fn now_ms(&mut self) -> u64 {
            let t = self.batches.get(self.cursor).map(|&(t, _)| t).unwrap_or(u64::MAX);
            self.cursor += 1;
            t
        }
    }

    struct CountingSurface {
        rects: usize,
        presents: usize,
    }

    impl Surface for CountingSurface {
        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {
            self.rects += 1;
        }

        fn label(&mut self, _rect: Rect, _text: &str, _size: f32) {}

        fn present(&mut self) {
            self.presents += 1;
        }
    }

    #[test]
    fn test_session_close_wins_over_other_events_in_batch() {
        let mut c = controller(3);
        let (x, y) = center(c.layout().random_button);
        let mut script = Script {
            batches: vec![(0, vec![InputEvent::Pressed { x, y }, InputEvent::Closed])],
            cursor: 0,
        };
        let mut surface = CountingSurface { rects: 0, presents: 0 };
        let outcome = run_session(&mut c, &mut script, &mut surface);
        assert_eq!(outcome, ReplayOutcome::Terminate);
        // Terminated before rendering anything.
        assert_eq!(surface.presents, 0);
    }

    #[test]
    fn test_session_renders_then_returns_restart() {
        let mut c = controller(3);
        let (x, y) = center(c.layout().random_button);
        let mut script = Script {
            batches: vec![(0, vec![]), (16, vec![InputEvent::Pressed { x, y }])],
            cursor: 0,
        };
        let mut surface = CountingSurface { rects: 0, presents: 0 };
        let outcome = run_session(&mut c, &mut script, &mut surface);
        assert_eq!(outcome, ReplayOutcome::RestartRandom);
        // One full frame rendered for the empty first batch:
        // 9 cells + 3 buttons + track + thumb.
        assert_eq!(surface.presents, 1);
        assert_eq!(surface.rects, 14);
    }
}
