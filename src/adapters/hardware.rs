//! Hardware adapters: bridge real peripherals to the domain port traits.
//!
//! The board is split between two execution contexts, so there are two
//! adapters:
//!
//! | Adapter           | Context        | Ports                                  |
//! |-------------------|----------------|----------------------------------------|
//! | `TickerOutputs`   | Second Ticker  | ActuatorPort, IndicatorPort            |
//! | `HardwareAdapter` | sampling loop  | AnalogPort, ButtonPort, IndicatorPort  |
//!
//! Only `TickerOutputs` owns the pump.  On non-espidf targets the
//! underlying drivers use the simulated GPIO bank and ADC.

use log::warn;

use crate::app::ports::{ActuatorPort, AnalogPort, ButtonPort, IndicatorPort};
use crate::drivers::button::WaterButton;
use crate::drivers::pump::PumpDriver;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;
use crate::sensors::{AnalogChannel, AnalogSampler};

// ── Second Ticker side ────────────────────────────────────────

/// Outputs driven from the Second Ticker.
pub struct TickerOutputs {
    pump: PumpDriver,
    led: StatusLed,
}

impl TickerOutputs {
    pub fn new(pump: PumpDriver, led: StatusLed) -> Self {
        Self { pump, led }
    }

    pub fn pump(&self) -> &PumpDriver {
        &self.pump
    }
}

impl ActuatorPort for TickerOutputs {
    fn set_pump(&mut self, on: bool) {
        let result = if on { self.pump.start() } else { self.pump.stop() };
        if let Err(e) = result {
            warn!("TickerOutputs: pump {} failed: {}", if on { "on" } else { "off" }, e);
        }
    }
}

impl IndicatorPort for TickerOutputs {
    fn set_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn toggle_led(&mut self) {
        self.led.toggle();
    }
}

// ── Sampling loop side ────────────────────────────────────────

/// Inputs read by the sampling loop, plus the LED for the charge blink.
pub struct HardwareAdapter {
    sampler: AnalogSampler,
    button: WaterButton,
    led: StatusLed,
}

impl HardwareAdapter {
    pub fn new(sampler: AnalogSampler, button: WaterButton, led: StatusLed) -> Self {
        Self { sampler, button, led }
    }
}

impl AnalogPort for HardwareAdapter {
    fn sample(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        self.sampler.read(channel)
    }
}

impl ButtonPort for HardwareAdapter {
    fn is_pressed(&mut self) -> bool {
        self.button.is_pressed()
    }
}

impl IndicatorPort for HardwareAdapter {
    fn set_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn toggle_led(&mut self) {
        self.led.toggle();
    }
}
