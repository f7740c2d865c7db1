//! Error types for the plantwater firmware.
//!
//! One small enum per concern.  All variants are `Copy` so they can be
//! passed out of interrupt-context code without allocation; `main` lifts
//! them into `anyhow::Error` at the boot boundary.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The conversion did not complete within the configured poll budget.
    AdcTimeout,
    /// The ADC driver reported a failure code.
    AdcReadFailed(i32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcTimeout => write!(f, "ADC conversion timed out"),
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO level write failed.
    GpioWriteFailed(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed(rc) => write!(f, "GPIO write failed (rc={rc})"),
        }
    }
}

impl core::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Startup validation failures.  The event table and tick calibration are
/// checked once at boot; nothing is re-validated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON blob could not be parsed into a [`crate::config::SystemConfig`].
    Malformed,
    /// Event at `index` is at second 0, which the ticker never observes.
    EventAtBoot { index: usize },
    /// Event at `index` falls on or after the end of the day.
    EventOutOfDay { index: usize, second: u32 },
    /// Two events share the same second; only one activation slot exists.
    DuplicateEvent { first: usize, second: usize },
    /// A time-of-day field is out of range (e.g. minute 61).
    InvalidTimeOfDay { index: usize },
    /// Overflow period or overflow count is zero.
    ZeroTickPeriod,
    /// Compare-match remainder does not fit inside one overflow period.
    RemainderTooLong,
    /// The ADC poll budget is zero.
    ZeroAdcBudget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed configuration"),
            Self::EventAtBoot { index } => write!(f, "event #{index} scheduled at second 0"),
            Self::EventOutOfDay { index, second } => {
                write!(f, "event #{index} at second {second} is past the end of the day")
            }
            Self::DuplicateEvent { first, second } => {
                write!(f, "events #{first} and #{second} share a timestamp")
            }
            Self::InvalidTimeOfDay { index } => write!(f, "event #{index} is not a valid time of day"),
            Self::ZeroTickPeriod => write!(f, "tick calibration has a zero period"),
            Self::RemainderTooLong => write!(f, "tick remainder exceeds one overflow period"),
            Self::ZeroAdcBudget => write!(f, "ADC poll budget must be non-zero"),
        }
    }
}

impl core::error::Error for ConfigError {}
