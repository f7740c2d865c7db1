//! Application services: the hexagonal core.
//!
//! Two independent services share one [`SharedState`]:
//!
//! ```text
//!   compare-match ──▶ ┌──────────────┐ ──▶ ActuatorPort, IndicatorPort
//!                     │ SecondTicker │ ──▶ EventSink
//!                     └──────┬───────┘
//!                            │ SharedState
//!   idle loop ──────▶ ┌──────┴───────┐ ◀── AnalogPort, ButtonPort
//!                     │ SamplingLoop │ ──▶ IndicatorPort (blink)
//!                     └──────────────┘
//! ```
//!
//! [`SecondTicker`] is the interrupt-side shim around the pure
//! [`transition`](crate::fsm::transition).  [`SamplingLoop`] is the
//! low-priority side: it never touches the elapsed counter or the pump.

use log::info;

use crate::config::{DayWrapPolicy, SystemConfig};
use crate::fsm::context::{TickEffects, TickInputs};
use crate::fsm::{StateId, TickerState, transition};
use crate::scheduler::EventTable;
use crate::sensors::AnalogChannel;
use crate::sensors::duration::duration_from_raw;
use crate::sensors::solar::is_charging;
use crate::shared::SharedState;

use super::events::AppEvent;
use super::ports::{ActuatorPort, AnalogPort, ButtonPort, EventSink, IndicatorPort};

// ───────────────────────────────────────────────────────────────
// SecondTicker
// ───────────────────────────────────────────────────────────────

/// Owns the ticker state and the event table; called once per second.
pub struct SecondTicker {
    state: TickerState,
    events: EventTable,
    day_length: u32,
    day_wrap: DayWrapPolicy,
}

impl SecondTicker {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: TickerState::default(),
            events: EventTable::from_config(config),
            day_length: config.day_length(),
            day_wrap: config.day_wrap,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&self, shared: &SharedState, sink: &mut impl EventSink) {
        shared.publish_elapsed(self.state.elapsed);
        sink.emit(&AppEvent::Started {
            events: self.events.len(),
            day_length: self.day_length,
        });
        info!(
            "SecondTicker started: day_length={}s wrap={:?}",
            self.day_length, self.day_wrap
        );
    }

    // ── Per-second orchestration ──────────────────────────────

    /// Run one tick: snapshot shared inputs, transition, apply effects,
    /// publish the (already wrapped) elapsed seconds.
    pub fn on_tick(
        &mut self,
        shared: &SharedState,
        out: &mut (impl ActuatorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> TickEffects {
        let inputs = TickInputs {
            manual_pending: shared.manual_water_pending(),
            duration_secs: shared.pump_duration_secs(),
            events: &self.events,
            day_length: self.day_length,
            day_wrap: self.day_wrap,
        };
        let (next, fx) = transition(self.state, &inputs);
        // The second this tick counted, before any wrap.
        let second = self.state.elapsed + 1;
        self.state = next;

        if fx.consumed_manual {
            shared.consume_manual_water();
        }
        if let Some(trigger) = fx.started {
            sink.emit(&AppEvent::PumpStarted { second, trigger });
        }
        if fx.pump_on {
            out.set_pump(true);
            // Lock before lighting so a concurrent blink cannot land after.
            shared.set_led_lock(true);
            out.set_led(true);
        }
        if let Some(ran_secs) = fx.pump_off {
            out.set_pump(false);
            out.set_led(false);
            shared.set_led_lock(false);
            sink.emit(&AppEvent::PumpStopped { second, ran_secs });
        }

        shared.publish_elapsed(self.state.elapsed);

        if fx.day_wrapped {
            sink.emit(&AppEvent::DayWrapped {
                pumping: self.state.state_id() == StateId::Pumping,
            });
        }
        fx
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> TickerState {
        self.state
    }

    pub fn state_id(&self) -> StateId {
        self.state.state_id()
    }
}

// ───────────────────────────────────────────────────────────────
// SamplingLoop
// ───────────────────────────────────────────────────────────────

/// The polling side: debounce, duration dial and charge blink, once per
/// elapsed second.
pub struct SamplingLoop {
    last_second: u32,
    solar_threshold_raw: u16,
}

impl SamplingLoop {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            // Matches the boot value, so the first pass runs at second 1.
            last_second: 0,
            solar_threshold_raw: config.solar_threshold_raw,
        }
    }

    /// Run one pass if the elapsed second changed since the last pass.
    /// Returns whether it ran.
    pub fn poll(
        &mut self,
        shared: &SharedState,
        hw: &mut (impl AnalogPort + ButtonPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) -> bool {
        let now = shared.elapsed_seconds();
        if now == self.last_second {
            return false;
        }
        self.last_second = now;

        self.debounce(now, shared, hw, sink);
        self.update_duration(shared, hw, sink);
        self.charge_blink(shared, hw, sink);
        true
    }

    /// One-sample debounce: a latched edge counts only if the pin still
    /// reads pressed.  Otherwise the edge stays latched for the next pass.
    fn debounce(
        &self,
        now: u32,
        shared: &SharedState,
        button: &mut impl ButtonPort,
        sink: &mut impl EventSink,
    ) {
        if shared.button_edge_pending() && button.is_pressed() {
            shared.request_manual_water();
            shared.clear_button_edge();
            sink.emit(&AppEvent::ManualRequestLatched { second: now });
        }
    }

    fn update_duration(
        &self,
        shared: &SharedState,
        adc: &mut impl AnalogPort,
        sink: &mut impl EventSink,
    ) {
        let channel = AnalogChannel::Duration;
        match adc.sample(channel) {
            Ok(raw) => {
                let from = shared.pump_duration_secs();
                let to = duration_from_raw(raw);
                shared.set_pump_duration_secs(to);
                if from != to {
                    sink.emit(&AppEvent::DurationChanged { from, to });
                }
            }
            Err(error) => sink.emit(&AppEvent::SampleFailed { channel, error }),
        }
    }

    fn charge_blink(
        &self,
        shared: &SharedState,
        hw: &mut (impl AnalogPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        let channel = AnalogChannel::Solar;
        match hw.sample(channel) {
            Ok(raw) if is_charging(raw, self.solar_threshold_raw) => {
                shared.with_led_unlocked(|| hw.toggle_led());
            }
            Ok(_) => {}
            Err(error) => sink.emit(&AppEvent::SampleFailed { channel, error }),
        }
    }
}
