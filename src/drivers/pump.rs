//! Water pump relay driver.
//!
//! Single active-high output driving the relay transistor.  The Second
//! Ticker is the only caller; this driver is a dumb actuator and keeps
//! no notion of schedule or duration.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the pump GPIO via hw_init.
//! On host/test: writes the simulated GPIO bank.

use log::warn;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver {
    state: PumpState,
}

impl Default for PumpDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PumpDriver {
    pub fn new() -> Self {
        Self { state: PumpState::Stopped }
    }

    pub fn start(&mut self) -> Result<(), ActuatorError> {
        self.drive(true)
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.drive(false)
    }

    fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        if let Err(e) = hw_init::gpio_write(pins::PUMP_GPIO, on) {
            warn!("pump: write failed: {}", e);
            return Err(e);
        }
        self.state = if on { PumpState::Running } else { PumpState::Stopped };
        Ok(())
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::Running
    }
}
