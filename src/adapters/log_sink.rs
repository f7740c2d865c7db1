//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC on the board, stderr on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::Trigger;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { events, day_length } => {
                info!("START | events={} | day_length={}s", events, day_length);
            }
            AppEvent::PumpStarted { second, trigger } => match trigger {
                Trigger::Manual => info!("PUMP  | on at +{}s | manual", second),
                Trigger::Scheduled { index } => {
                    info!("PUMP  | on at +{}s | event #{}", second, index)
                }
            },
            AppEvent::PumpStopped { second, ran_secs } => {
                info!("PUMP  | off at +{}s | ran {}s", second, ran_secs);
            }
            AppEvent::DayWrapped { pumping: false } => {
                info!("CLOCK | day wrapped");
            }
            AppEvent::DayWrapped { pumping: true } => {
                warn!("CLOCK | day wrapped while pumping");
            }
            AppEvent::DurationChanged { from, to } => {
                info!("DIAL  | duration {}s -> {}s", from, to);
            }
            AppEvent::ManualRequestLatched { second } => {
                info!("BTN   | manual request at +{}s", second);
            }
            AppEvent::SampleFailed { channel, error } => {
                warn!("ADC   | {:?} sample skipped: {}", channel, error);
            }
        }
    }
}
