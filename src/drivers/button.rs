//! Water button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled.  The
//! GPIO interrupt fires on the falling edge and only latches an edge flag
//! via [`on_edge`]; the sampling loop later confirms it against the live
//! level read through [`WaterButton::is_pressed`].

use crate::drivers::hw_init;
use crate::pins;
use crate::shared::SharedState;

/// ISR handler: lock-free, safe from interrupt context.
pub fn on_edge(shared: &SharedState) {
    shared.latch_button_edge();
}

/// Live-level reader for the water button.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterButton;

impl WaterButton {
    pub fn new() -> Self {
        Self
    }

    /// `true` while the pin is pulled low.
    pub fn is_pressed(&self) -> bool {
        !hw_init::gpio_read(pins::BUTTON_GPIO)
    }
}

/// Hold the simulated button down (`true`) or release it.
#[cfg(not(target_os = "espidf"))]
pub fn sim_press(pressed: bool) {
    hw_init::sim_set_gpio(pins::BUTTON_GPIO, !pressed);
}
