//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port. They are diagnostics only;
//! nothing downstream parses them.

use crate::app::ports::Channel;
use crate::control::baseline::Baselines;
use crate::error::{ActuatorError, SensorError};

/// Structured events emitted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Controller constructed from calibrated baselines.
    Calibrated(Baselines),

    /// An obstacle edge was accepted into the queue.
    ObstacleRecorded { index: u32, at_ms: u32 },

    /// An edge fell inside the debounce window of the previous obstacle.
    ObstacleDebounced { at_ms: u32 },

    /// Accepting obstacle `index` overwrote an obstacle that was never jumped.
    QueueOverrun { index: u32 },

    /// Obstacle `index` was cancelled because the mode flip caused it.
    QueueRolledBack { index: u32 },

    /// The jump signal fired for obstacle `index`.
    JumpTriggered { index: u32, at_ms: u32, delay_ms: u32 },

    /// The committed day/night mode changed.
    ModeChanged {
        dark: bool,
        at_ms: u32,
        /// Day-mode running minima of channels A and B at the flip.
        min_a: u16,
        min_b: u16,
    },

    /// The speed ramp shortened the jump delay.
    DelayStepped { delay_ms: u32, at_ms: u32 },

    /// A sensor read failed; the previous sample was reused.
    SensorFault { channel: Channel, error: SensorError },

    /// An actuator write failed.
    ActuatorFault(ActuatorError),
}
