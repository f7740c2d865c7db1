//! Duration potentiometer → pump-on seconds.
//!
//! Linear map through the two end points:
//!
//! ```text
//!   raw = 0    (0 V)   →  5 s
//!   raw = 1023 (Vref)  → 60 s
//!   duration = 55 * raw / 1023 + 5      (integer division, truncating)
//! ```

use super::ADC_MAX;

pub const MIN_DURATION_SECS: u8 = 5;
pub const MAX_DURATION_SECS: u8 = 60;

/// Map a 10-bit dial reading to a pump duration in seconds.
pub fn duration_from_raw(raw: u16) -> u8 {
    let raw = u32::from(raw.min(ADC_MAX));
    let span = u32::from(MAX_DURATION_SECS - MIN_DURATION_SECS);
    (span * raw / u32::from(ADC_MAX)) as u8 + MIN_DURATION_SECS
}
