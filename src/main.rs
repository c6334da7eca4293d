//! Jumpbot Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter        LogEventSink    MonotonicClock   │
//! │  (Sensor+Actuator)      (EventSink)     (ms uptime)      │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────────  │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            Controller (pure logic)                 │  │
//! │  │  Edge · Mode · Queue · Ramp · Pulse                │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::info;

use jumpbot::adapters::hardware::HardwareAdapter;
use jumpbot::adapters::log_sink::LogEventSink;
use jumpbot::adapters::time::MonotonicClock;
use jumpbot::app::service::Controller;
use jumpbot::config::ControllerConfig;
use jumpbot::control::baseline::Baselines;
use jumpbot::drivers::{hw_init, servo::ServoDriver};
use jumpbot::pins;
use jumpbot::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Jumpbot v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ControllerConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let peripherals = Peripherals::take()?;

    let timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(pins::SERVO_PWM_FREQ_HZ.Hz().into())
            .resolution(Resolution::Bits14),
    )?;
    let pwm = LedcDriver::new(
        peripherals.ledc.channel0,
        &timer,
        pins::servo_pin(peripherals.pins),
    )?;
    info!(
        "Servo PWM on GPIO{} at {} Hz",
        pins::SERVO_PWM_GPIO,
        pins::SERVO_PWM_FREQ_HZ
    );

    let mut hw = HardwareAdapter::new(
        SensorHub::from_pins(),
        ServoDriver::new(pwm),
        config.idle_angle_deg,
        config.press_angle_deg,
    );

    // ── 4. Calibration ────────────────────────────────────────
    // The game screen must be on and showing an empty track.
    info!("Settling {} ms before calibration", config.startup_settle_ms);
    FreeRtos::delay_ms(config.startup_settle_ms);
    let baselines = Baselines::calibrate(&mut hw, &mut FreeRtos, &config)?;

    // ── 5. Control loop ───────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut controller = Controller::new(config.clone(), baselines);
    controller.start(&mut hw, &mut sink);

    info!("System ready. Entering control loop.");

    loop {
        controller.tick(&mut hw, clock.now_ms(), &mut sink);
        // Lets the idle task run so the task watchdog stays fed.
        FreeRtos::delay_ms(config.loop_yield_ms);
    }
}
