#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Upper bound applied to a single tick's delta, so a stall (debugger break,
/// window drag) does not fling animations forward by seconds at once.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(250);

/// Frame timer producing the per-tick delta fed to `update(dt)` calls.
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Instant,
    last_tick: Instant,
    max_delta: Duration,
    /// Clamped time since the previous tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_tick: now,
            max_delta: DEFAULT_MAX_DELTA,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Overrides the per-tick delta clamp.
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Advances the timer and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = (now - self.last_tick).min(self.max_delta);
        self.elapsed = now - self.start_time;
        self.last_tick = now;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
