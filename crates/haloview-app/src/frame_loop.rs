//! Fixed-timestep frame loop.
//!
//! Decouples camera/animation updates (fixed 60 Hz) from rendering (once per
//! redraw) using an accumulator, so damping and fly-to interpolation advance
//! at a stable rate regardless of display refresh. Call
//! [`tick`](FrameLoop::tick) once per redraw, then render.

use std::time::Instant;
use tracing::warn;

/// Fixed update timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Maximum frame time clamp. A frame longer than this is clamped and the
/// viewer accepts slowdown rather than running dozens of catch-up ticks.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep frame loop state.
pub struct FrameLoop {
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    /// Creates a new `FrameLoop` starting from the current instant.
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame's worth of updates: measures elapsed wall-clock time
    /// and calls `update_fn(FIXED_DT)` zero or more times at the fixed rate.
    pub fn tick(&mut self, mut update_fn: impl FnMut(f64)) {
        let current_time = Instant::now();
        let mut frame_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = current_time;

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        self.frame_count += 1;
    }

    /// Total frames ticked.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total fixed update steps executed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// A testable loop that accepts explicit frame times instead of measuring
/// wall-clock time.
#[cfg(test)]
struct TestableFrameLoop {
    accumulator: f64,
    frame_count: u64,
    update_count: u64,
}

#[cfg(test)]
impl TestableFrameLoop {
    fn new() -> Self {
        Self {
            accumulator: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    fn tick(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64)) {
        let clamped = frame_time.min(MAX_FRAME_TIME);
        self.accumulator += clamped;

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        self.frame_count += 1;
    }
}
