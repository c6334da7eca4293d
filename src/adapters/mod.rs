//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                 |
//! |-------------|---------------|-----------------------------|
//! | `hardware`  | SensorPort    | ESP32 ADC1 light sensors    |
//! |             | ActuatorPort  | LEDC PWM jump servo         |
//! | `log_sink`  | EventSink     | Serial log output           |
//! | `time`      | -             | ESP32 system timer          |

pub mod hardware;
pub mod log_sink;
pub mod time;
