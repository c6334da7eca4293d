//! Hysteresis edge detector for one obstacle channel.
//!
//! An obstacle passing in front of a light sensor shows up as a dip (or
//! bump) away from the channel baseline that lasts several loop iterations.
//! The detector latches on the first sample whose deviation exceeds the
//! high threshold and reports exactly one edge for it; the latch only
//! releases once the deviation falls back under the low threshold.
//!
//! ```text
//!  deviation
//!     │        ┌──┐   ┌─┐
//!  high ─ ─ ─ ─│─ ┼ ─ ┼─┼ ─ ─ ─ ─   edge reported at ▲ only
//!     │       ╱ ▲  ╲_╱   ╲
//!  low ─ ─ ─ ╱─ ─ ─ ─ ─ ─ ╲ ─ ─ ─   latch released here
//!     │_____╱               ╲____
//! ```
//!
//! Each obstacle channel owns its own detector; channels never share latch
//! state.

/// Enter/exit thresholds, as absolute deviation from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub high: u16,
    pub low: u16,
}

impl Thresholds {
    pub const fn new(high: u16, low: u16) -> Self {
        Self { high, low }
    }
}

/// Latched rising-edge comparator.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    in_peak: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { in_peak: false }
    }

    /// Feed one sample. Returns `true` on the sample that starts a new peak.
    pub fn update(&mut self, sample: u16, reference: u16, thresholds: Thresholds) -> bool {
        let deviation = reference.abs_diff(sample);

        if deviation > thresholds.high && !self.in_peak {
            self.in_peak = true;
            return true;
        }
        if deviation < thresholds.low {
            self.in_peak = false;
        }
        false
    }

    /// Whether the detector is currently inside a peak.
    pub fn is_latched(&self) -> bool {
        self.in_peak
    }
}
