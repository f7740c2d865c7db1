//! Mock board and event sink for integration tests.
//!
//! `MockBoard` implements every port, so the Second Ticker and the
//! sampling loop can share it the way they share the real LED.  Every
//! output call is recorded for assertions on the full history.

use plantwater::app::events::AppEvent;
use plantwater::app::ports::{ActuatorPort, AnalogPort, ButtonPort, EventSink, IndicatorPort};
use plantwater::config::{SystemConfig, TimeOfDay};
use plantwater::error::SensorError;
use plantwater::sensors::AnalogChannel;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Pump(bool),
    Led(bool),
    ToggleLed,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub pump: bool,
    pub led: bool,
    pub calls: Vec<OutputCall>,
    pub pressed: bool,
    pub duration_adc: Result<u16, SensorError>,
    pub solar_adc: Result<u16, SensorError>,
    pub samples: usize,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            pump: false,
            led: false,
            calls: Vec::new(),
            pressed: false,
            duration_adc: Ok(0),
            solar_adc: Ok(0),
            samples: 0,
        }
    }

    pub fn led_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutputCall::Led(_) | OutputCall::ToggleLed))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockBoard {
    fn set_pump(&mut self, on: bool) {
        self.pump = on;
        self.calls.push(OutputCall::Pump(on));
    }
}

impl IndicatorPort for MockBoard {
    fn set_led(&mut self, on: bool) {
        self.led = on;
        self.calls.push(OutputCall::Led(on));
    }

    fn toggle_led(&mut self) {
        self.led = !self.led;
        self.calls.push(OutputCall::ToggleLed);
    }
}

impl ButtonPort for MockBoard {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

impl AnalogPort for MockBoard {
    fn sample(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        self.samples += 1;
        match channel {
            AnalogChannel::Duration => self.duration_adc,
            AnalogChannel::Solar => self.solar_adc,
        }
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Seconds at which activations started, in order.
    pub fn starts(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PumpStarted { second, .. } => Some(*second),
                _ => None,
            })
            .collect()
    }

    /// Seconds at which activations stopped, in order.
    pub fn stops(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PumpStopped { second, .. } => Some(*second),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Config helpers ────────────────────────────────────────────

/// A default config with its event table replaced by `seconds`.
#[allow(dead_code)]
pub fn config_with_events(seconds: &[u32]) -> SystemConfig {
    let mut config = SystemConfig::default();
    config.events.clear();
    for &s in seconds {
        let t = TimeOfDay::new((s / 3600) as u8, (s / 60 % 60) as u8, (s % 60) as u8);
        config.events.push(t).expect("event table full");
    }
    config.validate().expect("test config must be valid");
    config
}
