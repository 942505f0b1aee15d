//! Fixed-timestep clock driving scene ticks from variable frame times.

use tracing::warn;

/// Longest frame accepted before clamping, so a stall does not trigger a
/// burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Splits frame times into fixed simulation steps.
pub struct FixedStep {
    dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    step_count: u64,
}

impl FixedStep {
    /// A clock stepping `dt` seconds at a time. Non-positive `dt` falls back to 60 Hz.
    pub fn new(dt: f64) -> Self {
        let dt = if dt > 0.0 { dt } else { 1.0 / 60.0 };
        Self {
            dt,
            accumulator: 0.0,
            total_sim_time: 0.0,
            step_count: 0,
        }
    }

    /// Feed one frame of `frame_time` seconds, calling `step(dt)` for every
    /// whole step it covers. Returns the number of steps run.
    pub fn advance(&mut self, frame_time: f64, mut step: impl FnMut(f64)) -> u32 {
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
        let mut steps = 0;
        while self.accumulator >= self.dt {
            step(self.dt);
            self.accumulator -= self.dt;
            self.total_sim_time += self.dt;
            self.step_count += 1;
            steps += 1;
        }
        steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
