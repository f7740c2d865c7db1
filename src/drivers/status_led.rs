//! Single-colour status LED.
//!
//! Two writers share this LED: the Second Ticker (solid while pumping)
//! and the sampling loop (charge blink).  Arbitration happens one level
//! up through the lock in [`crate::shared::SharedState`]; this driver
//! only remembers the last level so `toggle` works from either side.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LED GPIO via hw_init.
//! On host/test: writes the simulated GPIO bank.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::drivers::hw_init;
use crate::pins;

/// How long the LED stays lit at boot.
pub const BOOT_FLASH_MS: u32 = 1000;

/// Last level written, shared by every `StatusLed` handle.
static LED_LEVEL: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLed;

impl StatusLed {
    pub fn new() -> Self {
        Self
    }

    pub fn set(&mut self, on: bool) {
        match hw_init::gpio_write(pins::STATUS_LED_GPIO, on) {
            Ok(()) => LED_LEVEL.store(on, Ordering::Release),
            Err(e) => warn!("status_led: write failed: {}", e),
        }
    }

    pub fn on(&mut self) {
        self.set(true);
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on());
    }

    pub fn is_on(&self) -> bool {
        LED_LEVEL.load(Ordering::Acquire)
    }

    /// Light the LED for [`BOOT_FLASH_MS`] as a power-on indication.
    pub fn boot_flash(&mut self, delay: &mut impl DelayNs) {
        self.on();
        delay.delay_ms(BOOT_FLASH_MS);
        self.off();
    }
}
