//! Actuator drivers, hardware initialisation, and the tick source.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod pump;
pub mod status_led;
