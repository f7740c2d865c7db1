//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements                         | Connects to       |
//! |----------------|------------------------------------|-------------------|
//! | `hardware`     | AnalogPort, ButtonPort             | ESP32 ADC1, GPIO  |
//! |                | ActuatorPort, IndicatorPort        | ESP32 GPIO        |
//! | `log_sink`     | EventSink                          | Serial log output |

pub mod hardware;
pub mod log_sink;
