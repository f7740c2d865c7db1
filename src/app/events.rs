//! Outbound application events.
//!
//! The Second Ticker and the sampling loop emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; on the board they become log lines.

use crate::error::SensorError;
use crate::fsm::context::Trigger;
use crate::sensors::AnalogChannel;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller finished booting.
    Started { events: usize, day_length: u32 },

    /// An activation began at `second`.
    PumpStarted { second: u32, trigger: Trigger },

    /// An activation ended at `second` after running `ran_secs`.
    PumpStopped { second: u32, ran_secs: u32 },

    /// The elapsed-seconds counter wrapped to 0.  `pumping` is set when an
    /// activation was still running across the boundary.
    DayWrapped { pumping: bool },

    /// The duration dial moved to a new value.
    DurationChanged { from: u8, to: u8 },

    /// A debounced button press became a pending manual request.
    ManualRequestLatched { second: u32 },

    /// An analog sample failed; the step that needed it was skipped.
    SampleFailed { channel: AnalogChannel, error: SensorError },
}
