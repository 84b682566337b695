//! Fixed-timestep loop driven by externally supplied frame times.
//!
//! Variable frame times feed an accumulator; the simulation always advances
//! in whole [`FIXED_DT`] steps. Long frames are clamped to
//! [`MAX_FRAME_TIME`] so a stall never turns into a burst of catch-up steps.

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame the accumulator accepts.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator state for the fixed-timestep loop.
#[derive(Debug, Default)]
pub struct FixedStepLoop {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FixedStepLoop {
    /// A loop with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one rendered frame lasting `frame_time` seconds.
    ///
    /// - `update_fn(fixed_dt, total_sim_time)` is called zero or more times.
    /// - `render_fn(alpha)` is called once with the interpolation alpha in `[0, 1)`.
    pub fn tick(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
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
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Fraction of a fixed step left in the accumulator.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulation steps executed so far.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
