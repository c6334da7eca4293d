//! Baseline estimation.
//!
//! Calibration runs once at boot while the game shows a static screen with
//! no obstacles. It blocks: each channel is sampled at a fixed cadence and
//! the integer-truncated mean becomes that channel's reference for the
//! rest of the session. A busy screen during calibration is not detected;
//! detection quality silently degrades instead.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{Channel, SensorPort};
use crate::config::ControllerConfig;
use crate::error::{Error, Result};

/// Per-channel reference values, fixed after calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baselines {
    pub obstacle_a: u16,
    pub obstacle_b: u16,
    pub ambient: u16,
}

impl Baselines {
    /// Calibrate every channel in turn. Blocks for roughly
    /// `3 * calibration_samples * calibration_interval_ms`.
    pub fn calibrate(
        sensors: &mut impl SensorPort,
        delay: &mut impl DelayNs,
        config: &ControllerConfig,
    ) -> Result<Self> {
        let baselines = Self {
            obstacle_a: calibrate_channel(sensors, delay, Channel::ObstacleA, config)?,
            obstacle_b: calibrate_channel(sensors, delay, Channel::ObstacleB, config)?,
            ambient: calibrate_channel(sensors, delay, Channel::Ambient, config)?,
        };
        info!(
            "Calibrated: A={} B={} ambient={}",
            baselines.obstacle_a, baselines.obstacle_b, baselines.ambient
        );
        Ok(baselines)
    }
}

/// Mean of `calibration_samples` reads of one channel. Failed reads are
/// skipped; a channel that never reads successfully fails calibration.
pub fn calibrate_channel(
    sensors: &mut impl SensorPort,
    delay: &mut impl DelayNs,
    channel: Channel,
    config: &ControllerConfig,
) -> Result<u16> {
    let mut sum: u32 = 0;
    let mut good: u32 = 0;
    let mut failed: u32 = 0;

    for _ in 0..config.calibration_samples {
        match sensors.read(channel) {
            Ok(sample) => {
                sum += u32::from(sample);
                good += 1;
            }
            Err(_) => failed += 1,
        }
        delay.delay_ms(config.calibration_interval_ms);
    }

    if failed > 0 {
        warn!("Calibration {:?}: {} of {} reads failed", channel, failed, config.calibration_samples);
    }
    if good == 0 {
        return Err(Error::Init("calibration: no valid samples"));
    }
    Ok((sum / good) as u16)
}

/// Smaller of the previous minimum and the new sample.
pub fn running_min(previous: u16, sample: u16) -> u16 {
    previous.min(sample)
}

/// Darkest level seen on an obstacle channel since day mode began.
///
/// Tracked for diagnostics only: dark-mode thresholds come from the fixed
/// `dark_*` config values, not from this minimum.
#[derive(Debug, Clone, Copy)]
pub struct RunningMin {
    value: u16,
}

impl RunningMin {
    pub fn new(start: u16) -> Self {
        Self { value: start }
    }

    pub fn update(&mut self, sample: u16) -> u16 {
        self.value = running_min(self.value, sample);
        self.value
    }

    pub fn reset(&mut self, start: u16) {
        self.value = start;
    }

    pub fn value(&self) -> u16 {
        self.value
    }
}
