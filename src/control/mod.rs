//! Detection and scheduling building blocks.
//!
//! Pure state machines driven by the [`Controller`](crate::app::service::Controller)
//! once per loop iteration. None of them touch hardware or block, except
//! the one-shot calibration in [`baseline`].

pub mod actuator;
pub mod baseline;
pub mod edge;
pub mod mode;
pub mod queue;
pub mod ramp;
