//! Inputs and outputs of one Second Ticker transition.
//!
//! The transition never touches hardware or shared state.  The shim in
//! [`crate::app::service::SecondTicker`] snapshots [`TickInputs`] from the
//! shared state, runs the transition, then applies [`TickEffects`]
//! through the actuator port.

use crate::config::DayWrapPolicy;
use crate::scheduler::EventTable;

/// Snapshot taken at the start of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'a> {
    /// A debounced manual request is waiting.
    pub manual_pending: bool,
    /// Current pump-on duration from the dial.
    pub duration_secs: u8,
    pub events: &'a EventTable,
    /// Tick count at which the elapsed-seconds counter wraps.
    pub day_length: u32,
    pub day_wrap: DayWrapPolicy,
}

/// What started an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The water button.
    Manual,
    /// Entry `index` of the event table.
    Scheduled { index: usize },
}

/// Side effects requested by one tick.  Applied in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEffects {
    /// The pending manual request was used; clear it.
    pub consumed_manual: bool,
    /// A new activation began this tick.
    pub started: Option<Trigger>,
    /// The activation start second equals this second: pump on, lock the
    /// LED, LED on solid.
    pub pump_on: bool,
    /// The activation ended after running this many seconds: pump off,
    /// LED off, release the LED lock.
    pub pump_off: Option<u32>,
    /// The elapsed-seconds counter wrapped to 0 this tick.
    pub day_wrapped: bool,
}
