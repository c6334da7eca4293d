//! Hobby servo driver for the jump key.
//!
//! Converts an angle (0-180°) into a 500-2500 µs pulse inside a 20 ms
//! frame and writes it as a duty-cycle fraction. Generic over any
//! `embedded_hal` PWM channel; on ESP-IDF that is an LEDC channel running
//! at 50 Hz.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::error::ActuatorError;

const FRAME_US: u16 = 20_000;
const MIN_PULSE_US: u32 = 500;
const MAX_PULSE_US: u32 = 2_500;
const MAX_ANGLE: u8 = 180;

pub struct ServoDriver<P> {
    pwm: P,
    angle: Option<u8>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Pulse width for `angle`, clamped to the servo's travel.
    pub fn pulse_us(angle: u8) -> u16 {
        let angle = u32::from(angle.min(MAX_ANGLE));
        (MIN_PULSE_US + angle * (MAX_PULSE_US - MIN_PULSE_US) / u32::from(MAX_ANGLE)) as u16
    }

    pub fn set_angle(&mut self, angle: u8) -> Result<(), ActuatorError> {
        let angle = angle.min(MAX_ANGLE);
        self.pwm
            .set_duty_cycle_fraction(Self::pulse_us(angle), FRAME_US)
            .map_err(|e| {
                warn!("Servo: PWM write failed ({:?})", e.kind());
                ActuatorError::PwmWriteFailed
            })?;
        self.angle = Some(angle);
        Ok(())
    }

    /// Last angle successfully written, if any.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}
