//! Analog inputs: duration dial and solar panel sense.
//!
//! Both channels are sampled once per second by the sampling loop through
//! [`AnalogSampler`], which bounds every conversion with a poll budget
//! instead of spinning forever on a stuck ADC.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: polls ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static atomics for injection.

pub mod duration;
pub mod solar;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_DURATION_ADC: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_SOLAR_ADC: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_ADC_STUCK: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: AnalogChannel, raw: u16) {
    match channel {
        AnalogChannel::Duration => SIM_DURATION_ADC.store(raw, Ordering::Relaxed),
        AnalogChannel::Solar => SIM_SOLAR_ADC.store(raw, Ordering::Relaxed),
    }
}

/// Make every simulated conversion stay pending forever.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_stuck(stuck: bool) {
    SIM_ADC_STUCK.store(stuck, Ordering::Relaxed);
}

/// Full-scale value of a 10-bit sample.
pub const ADC_MAX: u16 = 1023;

/// The two analog inputs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// Pump duration potentiometer.
    Duration,
    /// Solar panel voltage divider.
    Solar,
}

impl AnalogChannel {
    /// ADC1 channel number this input is wired to.
    pub const fn adc_channel(self) -> u32 {
        match self {
            Self::Duration => pins::DURATION_ADC_CHANNEL,
            Self::Solar => pins::SOLAR_ADC_CHANNEL,
        }
    }
}

/// State of an in-flight conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPoll {
    Ready(u16),
    Pending,
    Failed(i32),
}

/// Poll a conversion until it completes, at most `max_polls` times.
pub fn sample_bounded(
    max_polls: u16,
    mut poll: impl FnMut() -> ConversionPoll,
) -> Result<u16, SensorError> {
    for _ in 0..max_polls {
        match poll() {
            ConversionPoll::Ready(raw) => return Ok(raw.min(ADC_MAX)),
            ConversionPoll::Failed(rc) => return Err(SensorError::AdcReadFailed(rc)),
            ConversionPoll::Pending => {}
        }
    }
    Err(SensorError::AdcTimeout)
}

/// Bounded sampler over the board's ADC.
pub struct AnalogSampler {
    max_polls: u16,
}

impl AnalogSampler {
    pub fn new(max_polls: u16) -> Self {
        Self { max_polls }
    }

    /// Sample one channel as a 10-bit value.
    pub fn read(&mut self, channel: AnalogChannel) -> Result<u16, SensorError> {
        sample_bounded(self.max_polls, || Self::poll_conversion(channel))
    }

    #[cfg(target_os = "espidf")]
    fn poll_conversion(channel: AnalogChannel) -> ConversionPoll {
        hw_init::adc1_try_read(channel.adc_channel())
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll_conversion(channel: AnalogChannel) -> ConversionPoll {
        if SIM_ADC_STUCK.load(Ordering::Relaxed) {
            return ConversionPoll::Pending;
        }
        let raw = match channel {
            AnalogChannel::Duration => SIM_DURATION_ADC.load(Ordering::Relaxed),
            AnalogChannel::Solar => SIM_SOLAR_ADC.load(Ordering::Relaxed),
        };
        ConversionPoll::Ready(raw)
    }
}
