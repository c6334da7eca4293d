//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the jump servo, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! sensors use cfg-gated simulation stubs and the servo any mock PWM.

use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{ActuatorPort, Channel, SensorPort};
use crate::drivers::servo::ServoDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    sensor_hub: SensorHub,
    servo: ServoDriver<P>,
    idle_angle: u8,
    press_angle: u8,
}

impl<P: SetDutyCycle> HardwareAdapter<P> {
    pub fn new(sensor_hub: SensorHub, servo: ServoDriver<P>, idle_angle: u8, press_angle: u8) -> Self {
        Self {
            sensor_hub,
            servo,
            idle_angle,
            press_angle,
        }
    }

    pub fn servo(&self) -> &ServoDriver<P> {
        &self.servo
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P> SensorPort for HardwareAdapter<P> {
    fn read(&mut self, channel: Channel) -> Result<u16, SensorError> {
        self.sensor_hub.read(channel)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: SetDutyCycle> ActuatorPort for HardwareAdapter<P> {
    fn press(&mut self) -> Result<(), ActuatorError> {
        self.servo.set_angle(self.press_angle)
    }

    fn release(&mut self) -> Result<(), ActuatorError> {
        self.servo.set_angle(self.idle_angle)
    }
}
