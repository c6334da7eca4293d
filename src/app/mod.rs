//! Application core: pure domain logic, zero I/O.
//!
//! The [`service::Controller`] runs the detect → queue → schedule → actuate
//! loop. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
