//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (light sensors, jump servo, event sinks) implement these
//! traits. The [`Controller`](super::service::Controller) consumes them via
//! generics, so the domain core never touches hardware directly.
//! Blocking delays use [`embedded_hal::delay::DelayNs`] directly.

use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The three analog light-sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First obstacle sensor, taped over the ground line.
    ObstacleA,
    /// Second obstacle sensor, slightly higher to catch tall cacti and birds.
    ObstacleB,
    /// Background sky patch used for day/night detection.
    Ambient,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::ObstacleA, Channel::ObstacleB, Channel::Ambient];
}

/// Read-side port: the domain calls this to obtain raw samples.
pub trait SensorPort {
    /// One raw sample on the 0-1023 scale.
    fn read(&mut self, channel: Channel) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to move the jump servo.
pub trait ActuatorPort {
    /// Move to the pressed position.
    fn press(&mut self) -> Result<(), ActuatorError>;

    /// Return to the idle position.
    fn release(&mut self) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
