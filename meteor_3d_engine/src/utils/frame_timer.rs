/// Per-frame delta time measurement for the main loop.

use std::time::Instant;

/// Measures the wall-clock duration of each frame.
///
/// `tick` returns the seconds elapsed since the previous `tick` (zero on
/// the first call), which the loop hands to every subsystem as `dt`.
pub struct FrameTimer {
    last: Option<Instant>,
}

impl FrameTimer {
    /// Create a timer that has not ticked yet
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Advance the timer and return the elapsed seconds since the last tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
