//! Non-blocking jump pulse.
//!
//! Two states, purely time-gated. A jump signal presses the key and
//! restarts the hold timer on every call it is present; once the signal
//! is gone and the hold time has passed, the key is released. Nothing
//! here ever waits.

/// Mechanical actuator position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorState {
    Idle,
    Pressed { since_ms: u32 },
}

/// Hardware command the caller must forward to the actuator port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseCommand {
    Press,
    Release,
}

#[derive(Debug)]
pub struct PulseActuator {
    state: ActuatorState,
    pulse_ms: u32,
}

impl PulseActuator {
    pub fn new(pulse_ms: u32) -> Self {
        Self {
            state: ActuatorState::Idle,
            pulse_ms,
        }
    }

    /// Advance the state machine. Returns the command to drive, if any.
    ///
    /// Every `jump == true` call re-issues `Press`; a second jump arriving
    /// inside the pulse simply extends it.
    pub fn update(&mut self, jump: bool, now_ms: u32) -> Option<PulseCommand> {
        if jump {
            self.state = ActuatorState::Pressed { since_ms: now_ms };
            return Some(PulseCommand::Press);
        }

        match self.state {
            ActuatorState::Pressed { since_ms } if now_ms.wrapping_sub(since_ms) >= self.pulse_ms => {
                self.state = ActuatorState::Idle;
                Some(PulseCommand::Release)
            }
            _ => None,
        }
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, ActuatorState::Pressed { .. })
    }
}
