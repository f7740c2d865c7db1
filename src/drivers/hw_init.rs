//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit, GPIO directions and the button
//! interrupt using raw ESP-IDF sys calls.  Called once from `main()`
//! before the timers start.
//!
//! On host builds every helper works against an in-memory GPIO bank so
//! the drivers above this layer run unchanged in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::ActuatorError;
use crate::pins;
#[cfg(target_os = "espidf")]
use crate::sensors::ConversionPoll;
use crate::shared::SharedState;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerStartFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR install failed (rc={})", rc),
            Self::TimerStartFailed(rc) => write!(f, "tick timer start failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any timer or ISR is running.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static ADC1_HANDLE: core::sync::atomic::AtomicPtr<adc_oneshot_unit_ctx_t> =
    core::sync::atomic::AtomicPtr::new(core::ptr::null_mut());

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation covers the full 0..3.3 V swing of the dial and
    // the solar divider.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [pins::DURATION_ADC_CHANNEL, pins::SOLAR_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    ADC1_HANDLE.store(handle, core::sync::atomic::Ordering::Release);
    info!(
        "hw_init: ADC1 configured (CH{}=duration, CH{}=solar)",
        pins::DURATION_ADC_CHANNEL,
        pins::SOLAR_ADC_CHANNEL
    );
    Ok(())
}

/// Poll one ADC1 conversion, scaled from 12 to 10 bits.
#[cfg(target_os = "espidf")]
pub fn adc1_try_read(channel: u32) -> ConversionPoll {
    let handle = ADC1_HANDLE.load(core::sync::atomic::Ordering::Acquire);
    if handle.is_null() {
        return ConversionPoll::Failed(ESP_ERR_INVALID_STATE as i32);
    }
    let mut raw: i32 = 0;
    // SAFETY: handle was created by init_adc(); only the sampling loop reads.
    let ret = unsafe { adc_oneshot_read(handle, channel, &mut raw) };
    if ret == ESP_OK as i32 {
        ConversionPoll::Ready((raw.max(0) as u16) >> 2)
    } else if ret == ESP_ERR_TIMEOUT as i32 {
        ConversionPoll::Pending
    } else {
        ConversionPoll::Failed(ret)
    }
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Active-low button: internal pull-up, interrupt on the falling edge.
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: button input configured (GPIO{})", pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on a configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for pin in [pins::PUMP_GPIO, pins::STATUS_LED_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: pump + status LED outputs configured (low)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: single register write on a configured output pin.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed(ret));
    }
    Ok(())
}

// ── Simulated GPIO bank (host) ────────────────────────────────

/// One bit per pin.  The button pin idles high like the real pull-up.
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVELS: core::sync::atomic::AtomicU64 =
    core::sync::atomic::AtomicU64::new(1u64 << pins::BUTTON_GPIO);

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_GPIO_LEVELS.load(core::sync::atomic::Ordering::Relaxed) & (1u64 << pin) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    sim_set_gpio(pin, high);
    Ok(())
}

/// Drive a simulated pin level (inputs and outputs alike).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio(pin: i32, high: bool) {
    use core::sync::atomic::Ordering;
    if high {
        SIM_GPIO_LEVELS.fetch_or(1u64 << pin, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!(1u64 << pin), Ordering::Relaxed);
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the `&'static SharedState` registered below.
    let shared = unsafe { &*(arg as *const SharedState) };
    crate::drivers::button::on_edge(shared);
}

/// Install the per-pin GPIO ISR service and hook the button edge.
/// Call after init_peripherals().
#[cfg(target_os = "espidf")]
pub fn init_isr_service(shared: &'static SharedState) -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    // The handler only stores into an atomic flag.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let arg = shared as *const SharedState as *mut core::ffi::c_void;
        let ret = gpio_isr_handler_add(pins::BUTTON_GPIO, Some(button_gpio_isr), arg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::BUTTON_GPIO);
    }
    info!("hw_init: ISR service installed (button)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(_shared: &'static SharedState) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
