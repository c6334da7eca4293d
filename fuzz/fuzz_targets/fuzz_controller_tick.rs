//! Fuzz target: `Controller::tick`
//!
//! Interprets the input as a stream of 7-byte frames (three 10-bit light
//! levels plus a time step) and drives the controller through them.
//! Asserts the queue cursors stay ordered and the actuator never stays
//! pressed past its hold time once the jumps stop.
//!
//! cargo fuzz run fuzz_controller_tick

#![no_main]

use jumpbot::app::events::AppEvent;
use jumpbot::app::ports::{ActuatorPort, Channel, EventSink, SensorPort};
use jumpbot::app::service::Controller;
use jumpbot::config::ControllerConfig;
use jumpbot::control::actuator::ActuatorState;
use jumpbot::control::baseline::Baselines;
use jumpbot::error::{ActuatorError, SensorError};
use libfuzzer_sys::fuzz_target;

struct Frame {
    levels: [u16; 3],
}

impl SensorPort for Frame {
    fn read(&mut self, channel: Channel) -> Result<u16, SensorError> {
        let i = match channel {
            Channel::ObstacleA => 0,
            Channel::ObstacleB => 1,
            Channel::Ambient => 2,
        };
        Ok(self.levels[i])
    }
}

impl ActuatorPort for Frame {
    fn press(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ControllerConfig::default();
    let pulse_ms = config.pulse_ms;
    let baselines = Baselines {
        obstacle_a: 500,
        obstacle_b: 500,
        ambient: 600,
    };
    let mut ctl = Controller::new(config, baselines);
    let mut hw = Frame { levels: [500, 500, 600] };
    let mut now: u32 = 0;

    for chunk in data.chunks_exact(7) {
        let level = |i: usize| u16::from_le_bytes([chunk[i], chunk[i + 1]]) & 0x3FF;
        hw.levels = [level(0), level(2), level(4)];
        now = now.wrapping_add(u32::from(chunk[6]));
        ctl.tick(&mut hw, now, &mut Discard);

        assert!(ctl.jump_count() <= ctl.obstacle_count());
        assert_eq!(ctl.pending_obstacles(), ctl.obstacle_count() - ctl.jump_count());
    }

    // Drain: with a quiet screen and the queue emptied, the key comes up.
    hw.levels = [500, 500, 600];
    while ctl.pending_obstacles() > 0 {
        now = now.wrapping_add(50);
        ctl.tick(&mut hw, now, &mut Discard);
    }
    now = now.wrapping_add(pulse_ms);
    ctl.tick(&mut hw, now, &mut Discard);
    assert_eq!(ctl.actuator_state(), ActuatorState::Idle);
});
