//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering each controller event as one
//! tab-separated line (tag first) and writing it to the ESP-IDF logger,
//! which goes to UART / USB-CDC. Lines are built in a fixed-capacity
//! buffer; an over-long line is truncated rather than allocated.

use core::fmt::{self, Write};

use heapless::String;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Longest rendered line.
pub const LINE_CAP: usize = 64;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `event` as a TSV line.
pub fn render<const N: usize>(event: &AppEvent, out: &mut String<N>) -> fmt::Result {
    match event {
        AppEvent::Calibrated(b) => {
            write!(out, "CAL\t{}\t{}\t{}", b.obstacle_a, b.obstacle_b, b.ambient)
        }
        AppEvent::ObstacleRecorded { index, at_ms } => write!(out, "OBST\t{}\t{}", index, at_ms),
        AppEvent::ObstacleDebounced { at_ms } => write!(out, "DBNC\t{}", at_ms),
        AppEvent::QueueOverrun { index } => write!(out, "OVRN\t{}", index),
        AppEvent::QueueRolledBack { index } => write!(out, "RBCK\t{}", index),
        AppEvent::JumpTriggered { index, at_ms, delay_ms } => {
            write!(out, "JUMP\t{}\t{}\t{}", index, at_ms, delay_ms)
        }
        AppEvent::ModeChanged { dark, at_ms, min_a, min_b } => write!(
            out,
            "MODE\t{}\t{}\t{}\t{}",
            if *dark { "dark" } else { "day" },
            at_ms,
            min_a,
            min_b
        ),
        AppEvent::DelayStepped { delay_ms, at_ms } => write!(out, "DLAY\t{}\t{}", delay_ms, at_ms),
        AppEvent::SensorFault { channel, error } => write!(out, "SERR\t{:?}\t{}", channel, error),
        AppEvent::ActuatorFault(error) => write!(out, "AERR\t{}", error),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let mut line: String<LINE_CAP> = String::new();
        // A full buffer keeps what fit; diagnostics are best-effort.
        let _ = render(event, &mut line);

        match event {
            AppEvent::SensorFault { .. } | AppEvent::ActuatorFault(_) | AppEvent::QueueOverrun { .. } => {
                warn!("{}", line);
            }
            _ => info!("{}", line),
        }
    }
}
