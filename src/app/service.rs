//! Application service: the hexagonal core.
//!
//! [`Controller`] is the session object: it owns every detector, the
//! obstacle queue, the speed ramp and the pulse actuator, and runs one
//! cooperative loop iteration per [`tick`](Controller::tick). All I/O
//! flows through port traits injected at call sites.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Controller          │
//! ActuatorPort ◀──│ Edge · Mode · Queue · Ramp   │
//!                 └──────────────────────────────┘
//! ```
//!
//! Ordering inside a tick is load-bearing:
//!
//! 1. read all three channels (one consistent snapshot)
//! 2. step the speed ramp
//! 3. update the mode; on a flip, roll back the last queued obstacle
//! 4. edge detection with mode-dependent thresholds, queue the edge
//! 5. poll the scheduler
//! 6. drive the actuator with the scheduler's signal
//!
//! Step 3 must precede step 4 so a rollback never cancels a detection made
//! in the same iteration.
//!
//! In day mode the edge detectors compare against the calibrated baselines.
//! Entering dark mode pins each obstacle channel's reference to the level it
//! reads on the committing sample, i.e. the settled night background; the
//! baselines come back into force when day mode is re-entered.

use log::{info, warn};

use crate::config::{ControllerConfig, QUEUE_CAPACITY};
use crate::control::actuator::{ActuatorState, PulseActuator, PulseCommand};
use crate::control::baseline::{Baselines, RunningMin};
use crate::control::edge::{EdgeDetector, Thresholds};
use crate::control::mode::ModeDetector;
use crate::control::queue::{ObstacleQueue, Record};
use crate::control::ramp::SpeedRamp;

use super::events::AppEvent;
use super::ports::{ActuatorPort, Channel, EventSink, SensorPort};

/// One reading per channel, taken at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Samples {
    pub obstacle_a: u16,
    pub obstacle_b: u16,
    pub ambient: u16,
}

impl Samples {
    fn set(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::ObstacleA => self.obstacle_a = value,
            Channel::ObstacleB => self.obstacle_b = value,
            Channel::Ambient => self.ambient = value,
        }
    }
}

impl From<Baselines> for Samples {
    fn from(b: Baselines) -> Self {
        Self {
            obstacle_a: b.obstacle_a,
            obstacle_b: b.obstacle_b,
            ambient: b.ambient,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// The jump controller session.
pub struct Controller {
    config: ControllerConfig,
    baselines: Baselines,
    /// Last good sample per channel; reused when a read fails.
    samples: Samples,
    /// Edge references for channels A and B in the committed mode.
    edge_refs: (u16, u16),
    edge_a: EdgeDetector,
    edge_b: EdgeDetector,
    mode: ModeDetector,
    min_a: RunningMin,
    min_b: RunningMin,
    queue: ObstacleQueue<QUEUE_CAPACITY>,
    ramp: SpeedRamp,
    actuator: PulseActuator,
    tick_count: u64,
}

impl Controller {
    /// Build the session from calibrated baselines. Calibration must have
    /// happened first; see [`Baselines::calibrate`].
    pub fn new(config: ControllerConfig, baselines: Baselines) -> Self {
        Self {
            mode: ModeDetector::new(config.mode_threshold, config.mode_confirm_ms),
            queue: ObstacleQueue::new(config.obstacle_debounce_ms),
            ramp: SpeedRamp::new(
                config.initial_jump_delay_ms,
                config.min_jump_delay_ms,
                config.ramp_interval_ms,
                config.ramp_step_ms,
            ),
            actuator: PulseActuator::new(config.pulse_ms),
            samples: baselines.into(),
            edge_refs: (baselines.obstacle_a, baselines.obstacle_b),
            edge_a: EdgeDetector::new(),
            edge_b: EdgeDetector::new(),
            min_a: RunningMin::new(baselines.obstacle_a),
            min_b: RunningMin::new(baselines.obstacle_b),
            config,
            baselines,
            tick_count: 0,
        }
    }

    /// Announce the session. The actuator starts idle.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Err(e) = hw.release() {
            warn!("Actuator: initial release failed: {}", e);
            sink.emit(&AppEvent::ActuatorFault(e));
        }
        sink.emit(&AppEvent::Calibrated(self.baselines));
        info!("Controller started, jump delay {} ms", self.ramp.delay_ms());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop iteration at `now_ms` (wrapping millisecond uptime).
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        now_ms: u32,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Snapshot
        let samples = self.read_samples(hw, sink);

        // 2. Speed ramp
        if let Some(delay_ms) = self.ramp.update(now_ms) {
            sink.emit(&AppEvent::DelayStepped { delay_ms, at_ms: now_ms });
        }

        // 3. Mode, with queue compensation on a flip
        let was_dark = self.mode.is_dark();
        let dark = self.mode.update(samples.ambient, self.baselines.ambient, now_ms);
        if dark != was_dark {
            self.on_mode_change(dark, samples, now_ms, sink);
        }
        if !dark {
            self.min_a.update(samples.obstacle_a);
            self.min_b.update(samples.obstacle_b);
        }

        // 4. Edge detection → queue
        let (th_a, th_b) = self.thresholds(dark);
        let (ref_a, ref_b) = self.edge_refs;
        let edge_a = self.edge_a.update(samples.obstacle_a, ref_a, th_a);
        let edge_b = self.edge_b.update(samples.obstacle_b, ref_b, th_b);
        if edge_a || edge_b {
            self.record_obstacle(now_ms, sink);
        }

        // 5. Scheduler
        let jump = self.queue.poll_jump_ready(now_ms, self.ramp.delay_ms());
        if jump {
            let index = self.queue.read_cursor() - 1;
            if !self.ramp.is_armed() {
                self.ramp.arm(now_ms);
                info!("Speed ramp armed at {} ms", now_ms);
            }
            sink.emit(&AppEvent::JumpTriggered {
                index,
                at_ms: now_ms,
                delay_ms: self.ramp.delay_ms(),
            });
        }

        // 6. Actuator
        if let Some(cmd) = self.actuator.update(jump, now_ms) {
            let result = match cmd {
                PulseCommand::Press => hw.press(),
                PulseCommand::Release => hw.release(),
            };
            if let Err(e) = result {
                warn!("Actuator: {:?} failed: {}", cmd, e);
                sink.emit(&AppEvent::ActuatorFault(e));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current jump delay.
    pub fn jump_delay_ms(&self) -> u32 {
        self.ramp.delay_ms()
    }

    /// Jumps signalled since startup.
    pub fn jump_count(&self) -> u32 {
        self.queue.read_cursor()
    }

    /// Obstacles accepted since startup, net of rollbacks.
    pub fn obstacle_count(&self) -> u32 {
        self.queue.write_cursor()
    }

    /// Obstacles detected but not yet jumped.
    pub fn pending_obstacles(&self) -> u32 {
        self.queue.outstanding()
    }

    /// Committed day/night mode.
    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    /// Day-mode running minima of the two obstacle channels.
    pub fn running_minima(&self) -> (u16, u16) {
        (self.min_a.value(), self.min_b.value())
    }

    /// References the obstacle edge detectors currently compare against.
    pub fn edge_references(&self) -> (u16, u16) {
        self.edge_refs
    }

    pub fn actuator_state(&self) -> ActuatorState {
        self.actuator.state()
    }

    /// Loop iterations executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn read_samples(&mut self, sensors: &mut impl SensorPort, sink: &mut impl EventSink) -> Samples {
        for channel in Channel::ALL {
            match sensors.read(channel) {
                Ok(value) => self.samples.set(channel, value),
                Err(error) => {
                    warn!("Sensor {:?}: {} (reusing last sample)", channel, error);
                    sink.emit(&AppEvent::SensorFault { channel, error });
                }
            }
        }
        self.samples
    }

    /// Day thresholds are shared; dark mode pins per-channel latch levels.
    fn thresholds(&self, dark: bool) -> (Thresholds, Thresholds) {
        let c = &self.config;
        if dark {
            (
                Thresholds::new(c.dark_high_threshold_a, c.dark_low_threshold),
                Thresholds::new(c.dark_high_threshold_b, c.dark_low_threshold),
            )
        } else {
            let day = Thresholds::new(c.edge_high_threshold, c.edge_low_threshold);
            (day, day)
        }
    }

    fn on_mode_change(&mut self, dark: bool, samples: Samples, now_ms: u32, sink: &mut impl EventSink) {
        // The lighting change itself trips the obstacle detectors; cancel
        // the obstacle it produced. A genuine obstacle arriving together
        // with the flip is cancelled instead, which is a known limitation.
        if let Some(index) = self.queue.rollback() {
            sink.emit(&AppEvent::QueueRolledBack { index });
        }

        info!("Mode: {} at {} ms", if dark { "dark" } else { "day" }, now_ms);
        sink.emit(&AppEvent::ModeChanged {
            dark,
            at_ms: now_ms,
            min_a: self.min_a.value(),
            min_b: self.min_b.value(),
        });

        if dark {
            self.edge_refs = (samples.obstacle_a, samples.obstacle_b);
        } else {
            self.edge_refs = (self.baselines.obstacle_a, self.baselines.obstacle_b);
            self.min_a.reset(self.baselines.obstacle_a);
            self.min_b.reset(self.baselines.obstacle_b);
        }
        info!("Edge references: A={} B={}", self.edge_refs.0, self.edge_refs.1);
    }

    fn record_obstacle(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        match self.queue.record(now_ms) {
            Record::Accepted { index, overwrote } => {
                if overwrote {
                    warn!("Queue: obstacle {} overwrote an unjumped obstacle", index);
                    sink.emit(&AppEvent::QueueOverrun { index });
                }
                sink.emit(&AppEvent::ObstacleRecorded { index, at_ms: now_ms });
            }
            Record::Debounced => {
                sink.emit(&AppEvent::ObstacleDebounced { at_ms: now_ms });
            }
        }
    }
}
