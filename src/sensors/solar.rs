//! Solar panel voltage sense.
//!
//! The panel feeds ADC1 through a resistive divider, so the threshold in
//! [`crate::config::SystemConfig::solar_threshold_raw`] has to be
//! recalibrated whenever the divider ratio changes.

/// Whether the panel reading counts as "charging".
pub fn is_charging(raw: u16, threshold_raw: u16) -> bool {
    raw >= threshold_raw
}
