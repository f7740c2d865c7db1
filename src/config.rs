//! System configuration parameters
//!
//! All tunable parameters for the watering system.  They are build-time
//! constants in practice: `config/default.json` is embedded into the
//! firmware image and validated once at boot.

use serde::{Deserialize, Serialize};

use crate::clock::{day_length, water_event};
use crate::error::ConfigError;

/// Maximum number of daily watering events.
pub const MAX_EVENTS: usize = 16;

/// A scheduled watering time, counted from boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self { hour, minute, second }
    }

    /// Seconds since the boot epoch.
    pub const fn as_seconds(&self) -> u32 {
        water_event(self.hour as u32, self.minute as u32, self.second as u32)
    }

    fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60 && self.second < 60
    }
}

/// Two-stage tick source calibration.
///
/// The oscillator rarely runs at its nominal frequency, so these values
/// are tuned per device: run for 24 h, measure the drift `D` seconds
/// against a reference clock, then shorten `remainder_us` by
/// `D * 1_000_000 / 86_400` (borrowing from `overflow_ticks` when the
/// remainder would go negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCalibration {
    /// Period of the free-running overflow timer.
    pub overflow_period_us: u32,
    /// Overflows counted before the compare-match is armed.
    pub overflow_ticks: u16,
    /// Delay of the one-shot compare-match after arming.
    pub remainder_us: u32,
}

impl TickCalibration {
    /// Length of one tick as configured.
    pub const fn nominal_second_us(&self) -> u32 {
        self.overflow_period_us * self.overflow_ticks as u32 + self.remainder_us
    }
}

impl Default for TickCalibration {
    fn default() -> Self {
        // 8192us * 122 + 576us = 1_000_000us
        Self {
            overflow_period_us: 8192,
            overflow_ticks: 122,
            remainder_us: 576,
        }
    }
}

/// What to do with an activation that is still running when the day wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayWrapPolicy {
    /// Compare the wrapped clock against the unwrapped start second.  A run
    /// that crosses the wrap has `start + duration` past the end of the day,
    /// which the clock never reaches, so the pump stays on until reboot and
    /// blocks every later event and manual request.  Only turning the dial
    /// down far enough to pull `start + duration` back inside the day ends it.
    #[default]
    Preserve,
    /// Measure the run time modulo the day length so the activation ends
    /// after its duration regardless of the wrap.
    Modular,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Schedule ---
    /// Watering start times, in table order (first match wins).
    pub events: heapless::Vec<TimeOfDay, MAX_EVENTS>,
    /// Extra ticks per hour to count before wrapping the day.
    pub hourly_drift_secs: u8,
    /// Behaviour of an activation that straddles the day wrap.
    pub day_wrap: DayWrapPolicy,

    // --- Timing ---
    pub tick: TickCalibration,
    /// Main-loop idle sleep between polls (milliseconds).
    pub idle_sleep_ms: u32,

    // --- Analog ---
    /// Solar reading (10-bit) at or above which the panel counts as charging.
    pub solar_threshold_raw: u16,
    /// Maximum conversion polls before an ADC read is abandoned.
    pub adc_max_polls: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut events = heapless::Vec::new();
        for t in [
            TimeOfDay::new(0, 0, 5),
            TimeOfDay::new(0, 1, 0),
            TimeOfDay::new(0, 5, 0),
            TimeOfDay::new(0, 10, 0),
            TimeOfDay::new(0, 30, 0),
        ] {
            let _ = events.push(t);
        }

        Self {
            events,
            hourly_drift_secs: 0,
            day_wrap: DayWrapPolicy::Preserve,

            tick: TickCalibration::default(),
            idle_sleep_ms: 50,

            solar_threshold_raw: 700,
            adc_max_polls: 1000,
        }
    }
}

impl SystemConfig {
    /// Parse and validate a JSON configuration blob.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| {
            log::error!("config: parse failed: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Number of ticks after which the elapsed-seconds counter wraps.
    pub fn day_length(&self) -> u32 {
        day_length(self.hourly_drift_secs)
    }

    /// Event table as seconds since boot, in configured order.
    pub fn event_seconds(&self) -> heapless::Vec<u32, MAX_EVENTS> {
        self.events.iter().map(TimeOfDay::as_seconds).collect()
    }

    /// Reject configurations the scheduler cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let day = self.day_length();
        for (index, t) in self.events.iter().enumerate() {
            if !t.is_valid() {
                return Err(ConfigError::InvalidTimeOfDay { index });
            }
            let second = t.as_seconds();
            if second == 0 {
                return Err(ConfigError::EventAtBoot { index });
            }
            if second >= day {
                return Err(ConfigError::EventOutOfDay { index, second });
            }
            if let Some(first) = self.events[..index]
                .iter()
                .position(|other| other.as_seconds() == second)
            {
                return Err(ConfigError::DuplicateEvent { first, second: index });
            }
        }

        if self.tick.overflow_period_us == 0 || self.tick.overflow_ticks == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.tick.remainder_us >= self.tick.overflow_period_us {
            return Err(ConfigError::RemainderTooLong);
        }
        if self.adc_max_polls == 0 {
            return Err(ConfigError::ZeroAdcBudget);
        }
        Ok(())
    }
}
