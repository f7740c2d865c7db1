//! Boot-relative timekeeping.
//!
//! The tick source stretches a short periodic "overflow" timer into an
//! accurate one-second tick by chaining a second, one-shot
//! "compare-match" timer:
//!
//! ```text
//!   overflow ─┬─ overflow ─┬─ … ─┬─ overflow (N-th) ──▶ pause overflow,
//!             │            │     │                      arm compare
//!             ▼            ▼     ▼                          │ remainder_us
//!          count=1      count=2  count=0                    ▼
//!                                              compare-match: restart overflow
//!                                                   (Second Ticker runs)
//! ```
//!
//! One nominal second is `overflow_period_us * overflow_ticks + remainder_us`
//! only because the overflow timer is stopped while the remainder runs.
//! The divider itself is pure; `drivers::hw_timer` wires it to real timers.
//!
//! Times of day are counted from boot, not from wall-clock midnight: the
//! device has no RTC and every power cycle restarts the day at second 0.

use crate::config::TickCalibration;

/// Seconds in one nominal day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds since the boot epoch for a given hour/minute/second.
///
/// Entries in the event table are expressed with this helper, so
/// `water_event(7, 0, 0)` fires seven hours after power-up.
pub const fn water_event(hour: u32, minute: u32, second: u32) -> u32 {
    3600 * hour + 60 * minute + second
}

/// Length of one day in ticks, stretched by a per-hour drift correction.
///
/// A tick source that runs `hourly_drift_secs` fast per hour would wrap
/// the day early; counting `(3600 + drift) * 24` ticks compensates.
pub const fn day_length(hourly_drift_secs: u8) -> u32 {
    (3600 + hourly_drift_secs as u32) * 24
}

/// What the hardware shim should do after an overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowAction {
    /// Keep counting overflows.
    Count,
    /// Stop the overflow timer and start the one-shot compare timer for
    /// `remainder_us`.  The overflow timer restarts on the compare-match.
    ArmCompare { remainder_us: u32 },
}

/// Two-stage divider: counts overflows, then arms the compare-match.
#[derive(Debug, Clone)]
pub struct TickDivider {
    calibration: TickCalibration,
    overflows: u16,
    armed: bool,
}

impl TickDivider {
    pub fn new(calibration: TickCalibration) -> Self {
        Self {
            calibration,
            overflows: 0,
            armed: false,
        }
    }

    /// Call from the overflow interrupt.
    pub fn on_overflow(&mut self) -> OverflowAction {
        self.overflows = self.overflows.saturating_add(1);
        if self.overflows >= self.calibration.overflow_ticks {
            self.overflows = 0;
            self.armed = true;
            return OverflowAction::ArmCompare {
                remainder_us: self.calibration.remainder_us,
            };
        }
        OverflowAction::Count
    }

    /// Call from the compare-match interrupt.  Disarms the compare and
    /// returns `true` if the Second Ticker should run.  A compare-match
    /// that fires while disarmed is ignored.
    pub fn on_compare_match(&mut self) -> bool {
        core::mem::replace(&mut self.armed, false)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn calibration(&self) -> &TickCalibration {
        &self.calibration
    }
}
