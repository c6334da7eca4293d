//! Controller configuration parameters
//!
//! All tunable parameters for the jump controller. The defaults are the
//! empirically tuned values for the reference game setup; time values are
//! in milliseconds, thresholds in 10-bit ADC counts (0-1023).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of obstacles that may be in flight between the sensors
/// and the jump point at the same time.
pub const QUEUE_CAPACITY: usize = 4;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Edge detection (day) ---
    /// Deviation from baseline that latches an obstacle edge.
    pub edge_high_threshold: u16,
    /// Deviation below which the edge latch is released.
    pub edge_low_threshold: u16,

    // --- Edge detection (dark) ---
    /// Latch threshold for obstacle channel A in dark mode.
    pub dark_high_threshold_a: u16,
    /// Latch threshold for obstacle channel B in dark mode.
    pub dark_high_threshold_b: u16,
    /// Release threshold for both obstacle channels in dark mode.
    pub dark_low_threshold: u16,

    // --- Mode detection ---
    /// Ambient drop below baseline that means the game went dark.
    pub mode_threshold: u16,
    /// Candidate mode must persist longer than this before it commits.
    pub mode_confirm_ms: u32,

    // --- Obstacle queue ---
    /// Detections closer than this to the previous one are discarded.
    pub obstacle_debounce_ms: u32,

    // --- Jump timing ---
    /// Delay between detection and jump at game start.
    pub initial_jump_delay_ms: u32,
    /// The speed ramp never shortens the delay below this.
    pub min_jump_delay_ms: u32,
    /// Interval between delay decrements once the first jump happened.
    pub ramp_interval_ms: u32,
    /// Amount subtracted from the delay every ramp interval.
    pub ramp_step_ms: u32,

    // --- Actuator ---
    /// Minimum time the servo holds the pressed position.
    pub pulse_ms: u32,
    /// Servo angle (degrees) at rest.
    pub idle_angle_deg: u8,
    /// Servo angle (degrees) that presses the jump key.
    pub press_angle_deg: u8,

    // --- Calibration ---
    /// Samples averaged per channel during startup calibration.
    pub calibration_samples: u16,
    /// Pause between calibration samples.
    pub calibration_interval_ms: u32,

    // --- Main loop ---
    /// Settle time after boot before calibration starts.
    pub startup_settle_ms: u32,
    /// Yield between loop iterations so the idle task can feed the watchdog.
    pub loop_yield_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            edge_high_threshold: 80,
            edge_low_threshold: 40,

            dark_high_threshold_a: 80,
            dark_high_threshold_b: 88,
            dark_low_threshold: 40,

            mode_threshold: 50,
            mode_confirm_ms: 100,

            obstacle_debounce_ms: 150,

            initial_jump_delay_ms: 1183,
            min_jump_delay_ms: 250,
            ramp_interval_ms: 1200,
            ramp_step_ms: 12,

            pulse_ms: 120,
            idle_angle_deg: 90,
            press_angle_deg: 60,

            calibration_samples: 200,
            calibration_interval_ms: 4, // ~0.8 s per channel

            startup_settle_ms: 2000,
            loop_yield_ms: 1,
        }
    }
}

impl ControllerConfig {
    /// Reject parameter sets that break hysteresis or timing relationships.
    pub fn validate(&self) -> Result<()> {
        if self.edge_high_threshold <= self.edge_low_threshold {
            return Err(Error::Config("edge_high_threshold must exceed edge_low_threshold"));
        }
        if self.dark_high_threshold_a <= self.dark_low_threshold
            || self.dark_high_threshold_b <= self.dark_low_threshold
        {
            return Err(Error::Config("dark high thresholds must exceed dark_low_threshold"));
        }
        if self.mode_confirm_ms == 0 {
            return Err(Error::Config("mode_confirm_ms must be non-zero"));
        }
        if self.ramp_interval_ms == 0 {
            return Err(Error::Config("ramp_interval_ms must be non-zero"));
        }
        if self.min_jump_delay_ms > self.initial_jump_delay_ms {
            return Err(Error::Config("min_jump_delay_ms exceeds initial_jump_delay_ms"));
        }
        if self.pulse_ms == 0 {
            return Err(Error::Config("pulse_ms must be non-zero"));
        }
        if self.idle_angle_deg == self.press_angle_deg {
            return Err(Error::Config("press and idle angles are identical"));
        }
        if self.idle_angle_deg > 180 || self.press_angle_deg > 180 {
            return Err(Error::Config("servo angles must be within 0-180"));
        }
        if self.calibration_samples == 0 {
            return Err(Error::Config("calibration_samples must be non-zero"));
        }
        Ok(())
    }
}
