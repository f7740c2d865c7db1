//! Second Ticker state machine.
//!
//! Two states keyed on the pump start second:
//!
//! ```text
//!            manual request or scheduled second
//!   ┌──────┐ ─────────────────────────────────▶ ┌─────────┐
//!   │ Idle │                                    │ Pumping │
//!   └──────┘ ◀───────────────────────────────── └─────────┘
//!            elapsed >= start + duration
//! ```
//!
//! [`transition`] is a pure function of the previous state and a snapshot
//! of the shared inputs, so the whole schedule can be driven in tests
//! without timers.  Each call performs, in order:
//!
//! 1. advance the elapsed-seconds counter;
//! 2. when idle, start an activation for a pending manual request, else
//!    for the first event-table entry equal to the new second;
//! 3. if the activation starts on this second, switch pump and LED on;
//! 4. if the activation has run for its duration, switch them off;
//! 5. wrap the counter at the end of the day.
//!
//! Disarming the compare-match happens in [`crate::clock::TickDivider`]
//! before the transition is called.

pub mod context;

use context::{TickEffects, TickInputs, Trigger};

use crate::config::DayWrapPolicy;

/// Pump start second meaning "no activation in progress".
pub const PUMP_IDLE: u32 = 0;

/// Enumeration of the ticker's states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Pumping = 1,
}

/// State owned exclusively by the Second Ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickerState {
    /// Seconds since boot, always inside `[0, day_length)` between ticks.
    pub elapsed: u32,
    /// Elapsed second at which the current activation began, or
    /// [`PUMP_IDLE`].
    pub pump_start: u32,
}

impl TickerState {
    pub fn state_id(&self) -> StateId {
        if self.pump_start == PUMP_IDLE {
            StateId::Idle
        } else {
            StateId::Pumping
        }
    }
}

/// Advance the ticker by one second.
pub fn transition(state: TickerState, inputs: &TickInputs<'_>) -> (TickerState, TickEffects) {
    let mut next = state;
    let mut fx = TickEffects::default();

    next.elapsed = state.elapsed + 1;

    if next.pump_start == PUMP_IDLE {
        let trigger = if inputs.manual_pending {
            fx.consumed_manual = true;
            Some(Trigger::Manual)
        } else {
            inputs
                .events
                .match_at(next.elapsed)
                .map(|index| Trigger::Scheduled { index })
        };
        if trigger.is_some() {
            next.pump_start = next.elapsed;
            fx.started = trigger;
        }
    }

    if next.pump_start != PUMP_IDLE && next.pump_start == next.elapsed {
        fx.pump_on = true;
    }

    if next.pump_start != PUMP_IDLE {
        if let Some(ran) = finished_run(&next, inputs) {
            fx.pump_off = Some(ran);
            next.pump_start = PUMP_IDLE;
        }
    }

    if next.elapsed >= inputs.day_length {
        next.elapsed = 0;
        fx.day_wrapped = true;
    }

    (next, fx)
}

/// Seconds the activation has run, if it has reached its duration.
fn finished_run(state: &TickerState, inputs: &TickInputs<'_>) -> Option<u32> {
    let duration = u32::from(inputs.duration_secs);
    match inputs.day_wrap {
        // A run that wrapped has `pump_start + duration > day_length`, and
        // `elapsed < day_length`, so this stays false for as long as the
        // duration does not shrink.
        DayWrapPolicy::Preserve => {
            (state.elapsed >= state.pump_start + duration)
                .then(|| state.elapsed - state.pump_start)
        }
        DayWrapPolicy::Modular => {
            let day = inputs.day_length;
            let ran = (state.elapsed + day - state.pump_start) % day;
            (ran >= duration).then_some(ran)
        }
    }
}
