//! GPIO / ADC assignments for the jumpbot board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding channel numbers.
//!
//! The three photoresistors sit in voltage dividers taped to the monitor.

// ---------------------------------------------------------------------------
// Light sensors: analog (ADC1, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// Obstacle sensor A, over the ground line ahead of the dino.
/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const OBSTACLE_A_ADC_CH: u32 = 3;
/// Obstacle sensor B, slightly above A.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const OBSTACLE_B_ADC_CH: u32 = 4;
/// Ambient sensor over an empty patch of sky.
/// ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const AMBIENT_ADC_CH: u32 = 5;

// ---------------------------------------------------------------------------
// Jump servo (SG90 over the space bar)
// ---------------------------------------------------------------------------

/// LEDC output driving the servo signal line. [`servo_pin`] hands out the
/// typed pin with this number.
pub const SERVO_PWM_GPIO: i32 = 18;
/// Standard hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// Take the servo's typed output pin. esp-idf-hal models each GPIO as its
/// own type, so the number in [`SERVO_PWM_GPIO`] is repeated in the field
/// name here; the debug assertion keeps the two in step.
#[cfg(target_os = "espidf")]
pub fn servo_pin(pins: esp_idf_hal::gpio::Pins) -> esp_idf_hal::gpio::Gpio18 {
    use esp_idf_hal::gpio::Pin;

    let pin = pins.gpio18;
    debug_assert_eq!(pin.pin(), SERVO_PWM_GPIO);
    pin
}
