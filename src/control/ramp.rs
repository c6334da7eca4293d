//! Jump-delay speed ramp.
//!
//! The game scrolls faster the longer a run lasts, so obstacles reach the
//! dino sooner after they pass the sensors. The ramp shortens the jump
//! delay by a fixed step every interval. It arms on the first jump of the
//! session and then free-runs; later jumps do not reset it.

/// Monotonically decreasing jump delay.
#[derive(Debug)]
pub struct SpeedRamp {
    delay_ms: u32,
    floor_ms: u32,
    interval_ms: u32,
    step_ms: u32,
    /// Start of the current interval; `None` until the first jump.
    last_step_ms: Option<u32>,
}

impl SpeedRamp {
    pub fn new(initial_ms: u32, floor_ms: u32, interval_ms: u32, step_ms: u32) -> Self {
        Self {
            delay_ms: initial_ms,
            floor_ms,
            interval_ms,
            step_ms,
            last_step_ms: None,
        }
    }

    /// Start the interval timer. Only the first call has any effect.
    pub fn arm(&mut self, now_ms: u32) {
        if self.last_step_ms.is_none() {
            self.last_step_ms = Some(now_ms);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.last_step_ms.is_some()
    }

    /// Apply at most one step if an interval has elapsed. Returns the new
    /// delay when it changed.
    pub fn update(&mut self, now_ms: u32) -> Option<u32> {
        let last = self.last_step_ms?;
        if now_ms.wrapping_sub(last) < self.interval_ms {
            return None;
        }
        // Advance by whole intervals so the cadence does not drift with
        // loop jitter.
        self.last_step_ms = Some(last.wrapping_add(self.interval_ms));

        let next = self.delay_ms.saturating_sub(self.step_ms).max(self.floor_ms);
        if next == self.delay_ms {
            return None;
        }
        self.delay_ms = next;
        Some(next)
    }

    /// Current jump delay.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}
