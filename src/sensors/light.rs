//! Photoresistor light sensor on one ADC1 channel.
//!
//! The ESP32-S3 ADC is 12-bit; readings are scaled down to the 0-1023
//! range every threshold in [`ControllerConfig`](crate::config::ControllerConfig)
//! is tuned for.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::app::ports::Channel;
use crate::error::SensorError;

/// Largest valid 12-bit raw sample.
pub const ADC_RAW_MAX: u16 = 4095;

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; 3] = [AtomicU16::new(2048), AtomicU16::new(2048), AtomicU16::new(2048)];

/// Inject a raw 12-bit sample for `channel`. Values above [`ADC_RAW_MAX`]
/// simulate a misbehaving converter.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: Channel, raw: u16) {
    SIM_ADC[sim_slot(channel)].store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
fn sim_slot(channel: Channel) -> usize {
    match channel {
        Channel::ObstacleA => 0,
        Channel::ObstacleB => 1,
        Channel::Ambient => 2,
    }
}

pub struct LightSensor {
    channel: Channel,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl LightSensor {
    pub fn new(channel: Channel, adc_channel: u32) -> Self {
        Self {
            channel,
            adc_channel,
        }
    }

    /// One sample on the 0-1023 scale.
    pub fn read(&self) -> Result<u16, SensorError> {
        let raw = self.read_adc()?;
        if raw > ADC_RAW_MAX {
            return Err(SensorError::OutOfRange);
        }
        Ok(raw >> 2)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        crate::drivers::hw_init::adc1_read(self.adc_channel).inspect_err(|e| {
            log::debug!("{:?} (ADC1 CH{}): {}", self.channel, self.adc_channel, e);
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        Ok(SIM_ADC[sim_slot(self.channel)].load(Ordering::Relaxed))
    }
}
