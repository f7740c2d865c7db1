//! Daily watering event table.
//!
//! A fixed, ordered list of seconds-since-boot at which an activation
//! should begin.  The Second Ticker asks the table once per second
//! whether the current second is scheduled; the first matching entry in
//! table order wins.
//!
//! Entries must be unique and inside `[1, day_length)`.  This is checked
//! once at boot by [`crate::config::SystemConfig::validate`]; the table
//! itself never changes at runtime.

use log::info;

use crate::config::{MAX_EVENTS, SystemConfig};

/// The daily event set.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    seconds: heapless::Vec<u32, MAX_EVENTS>,
}

impl EventTable {
    /// Build from already-validated seconds.  Entries past `MAX_EVENTS`
    /// are dropped.
    pub fn new(seconds: &[u32]) -> Self {
        let mut table = heapless::Vec::new();
        for &s in seconds.iter().take(MAX_EVENTS) {
            let _ = table.push(s);
        }
        Self { seconds: table }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        let table = Self {
            seconds: config.event_seconds(),
        };
        for (i, s) in table.seconds.iter().enumerate() {
            info!("Scheduler: event #{} at +{}s", i, s);
        }
        table
    }

    /// Index of the first entry scheduled at `second`.
    pub fn match_at(&self, second: u32) -> Option<usize> {
        self.seconds.iter().position(|&s| s == second)
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.seconds
    }
}
