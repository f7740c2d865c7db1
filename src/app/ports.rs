//! Port traits: the hexagonal boundary between domain logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SecondTicker / SamplingLoop (domain)
//! ```
//!
//! Driven adapters (ADC, button, pump, LED, event sinks) implement these
//! traits.  The services consume them via generics, so the domain core
//! never touches a register directly and every schedule can be replayed
//! on the host with mocks.

use crate::error::SensorError;
use crate::sensors::AnalogChannel;

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the two analog inputs.
pub trait AnalogPort {
    /// Sample one channel as a 10-bit value in `[0, 1023]`.
    ///
    /// Implementations must bound the conversion wait and return
    /// [`SensorError::AdcTimeout`] rather than block forever.
    fn sample(&mut self, channel: AnalogChannel) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Button port
// ───────────────────────────────────────────────────────────────

/// Live level of the water button.
pub trait ButtonPort {
    /// `true` while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the pump.  Only the Second Ticker holds one.
pub trait ActuatorPort {
    fn set_pump(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Indicator port
// ───────────────────────────────────────────────────────────────

/// The status LED.  Both services hold one; the LED lock in
/// [`SharedState`](crate::shared::SharedState) decides who may write.
pub trait IndicatorPort {
    fn set_led(&mut self, on: bool);

    /// Invert the LED's current level.
    fn toggle_led(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
