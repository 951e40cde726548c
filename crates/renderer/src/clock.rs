//! Fixed-step simulated time.
//!
//! The demo advances shader time by exactly one step per produced frame, no
//! matter how long the wall-clock gap between ticks was. Dropped or delayed
//! frames therefore slow the ocean down instead of making it jump.

/// Simulated seconds added per frame tick.
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

/// Deterministic clock that advances by a fixed step per tick.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    step: f32,
    ticks: u64,
}

impl FixedStepClock {
    /// Creates a clock that advances `step` simulated seconds per tick.
    pub fn new(step: f32) -> Self {
        Self { step, ticks: 0 }
    }

    /// Advances the clock one tick and returns the sample for that frame.
    ///
    /// The first tick reports one full step of elapsed time; time is bumped
    /// before the frame's uniforms are written.
    pub fn tick(&mut self) -> TimeSample {
        self.ticks = self.ticks.saturating_add(1);
        TimeSample {
            seconds: self.ticks as f32 * self.step,
            frame_index: self.ticks - 1,
        }
    }

    /// Rewinds the clock to the start of the session.
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(TIME_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_is_step_exact() {
        let mut clock = FixedStepClock::default();
        let mut last = 0.0;
        for n in 1..=600u64 {
            let sample = clock.tick();
            assert!((sample.seconds - n as f32 * TIME_STEP).abs() < 1e-5);
            assert!(sample.seconds > last, "simulated time must be monotonic");
            last = sample.seconds;
        }
    }

    #[test]
    fn frame_index_counts_from_zero() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn reset_restarts_the_session() {
        let mut clock = FixedStepClock::default();
        clock.tick();
        clock.tick();
        clock.reset();
        let sample = clock.tick();
        assert_eq!(sample.frame_index, 0);
        assert!((sample.seconds - TIME_STEP).abs() < 1e-6);
    }
}
