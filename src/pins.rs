//! GPIO / peripheral pin assignments for the watering controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output: HIGH = pump running (drives the relay transistor).
pub const PUMP_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary "water now" push-button.  Falling-edge interrupt.
pub const BUTTON_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Digital output: HIGH = LED lit.
pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// Duration potentiometer wiper.  ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const DURATION_ADC_CHANNEL: u32 = 3;
/// Solar panel voltage divider.  ADC1 channel 2 (GPIO 3 on ESP32-S3).
pub const SOLAR_ADC_CHANNEL: u32 = 2;
