//! Two-stage tick source using ESP-IDF's esp_timer API.
//!
//! A periodic "overflow" timer feeds the [`TickDivider`]; once it has
//! counted the calibrated number of overflows the overflow timer is
//! paused and a one-shot "compare" timer is armed for the sub-period
//! remainder.  When that fires, the divider disarms itself, the overflow
//! timer restarts and the registered second handler runs.  One second is
//! therefore `overflow_period_us * overflow_ticks + remainder_us`.
//!
//! Both callbacks execute in the esp_timer task (not ISR), so they never
//! interleave with each other.  On simulation targets the same path is
//! driven by [`sim_overflow`] / [`sim_compare_match`].

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::clock::{OverflowAction, TickDivider};
use crate::config::TickCalibration;
use crate::drivers::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

static DIVIDER: Mutex<CriticalSectionRawMutex, RefCell<Option<TickDivider>>> =
    Mutex::new(RefCell::new(None));

static SECOND_HANDLER: Mutex<CriticalSectionRawMutex, Cell<Option<fn()>>> =
    Mutex::new(Cell::new(None));

/// Timer operations the divider chain needs from the platform.
trait TickTimers {
    fn pause_overflow(&self);
    fn resume_overflow(&self);
    fn arm_compare(&self, remainder_us: u32);
}

fn install(calibration: TickCalibration, on_second: fn()) {
    DIVIDER.lock(|d| *d.borrow_mut() = Some(TickDivider::new(calibration)));
    SECOND_HANDLER.lock(|h| h.set(Some(on_second)));
}

#[cfg(any(target_os = "espidf", test))]
fn overflow_period_us() -> Option<u32> {
    DIVIDER.lock(|d| d.borrow().as_ref().map(|d| d.calibration().overflow_period_us))
}

fn on_overflow(timers: &impl TickTimers) -> OverflowAction {
    let action = DIVIDER.lock(|d| {
        d.borrow_mut()
            .as_mut()
            .map_or(OverflowAction::Count, TickDivider::on_overflow)
    });
    if let OverflowAction::ArmCompare { remainder_us } = action {
        // No overflows may land while the remainder runs.
        timers.pause_overflow();
        timers.arm_compare(remainder_us);
    }
    action
}

fn on_compare_match(timers: &impl TickTimers) {
    let fire = DIVIDER.lock(|d| {
        d.borrow_mut()
            .as_mut()
            .is_some_and(TickDivider::on_compare_match)
    });
    if fire {
        // Restart before the handler so its run time is not added to the next second.
        timers.resume_overflow();
        // The handler runs outside the divider lock.
        if let Some(handler) = SECOND_HANDLER.lock(Cell::get) {
            handler();
        }
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static OVERFLOW_TIMER: core::sync::atomic::AtomicPtr<esp_timer> =
    core::sync::atomic::AtomicPtr::new(core::ptr::null_mut());
#[cfg(target_os = "espidf")]
static COMPARE_TIMER: core::sync::atomic::AtomicPtr<esp_timer> =
    core::sync::atomic::AtomicPtr::new(core::ptr::null_mut());

#[cfg(target_os = "espidf")]
struct EspTimers;

#[cfg(target_os = "espidf")]
impl TickTimers for EspTimers {
    fn pause_overflow(&self) {
        let t = OVERFLOW_TIMER.load(core::sync::atomic::Ordering::Acquire);
        // SAFETY: handle created in start_timers() before it was started.
        let ret = unsafe { esp_timer_stop(t) };
        if ret != ESP_OK as i32 {
            log::warn!("hw_timer: overflow pause failed (rc={})", ret);
        }
    }

    fn resume_overflow(&self) {
        let Some(period_us) = overflow_period_us() else { return };
        let t = OVERFLOW_TIMER.load(core::sync::atomic::Ordering::Acquire);
        // SAFETY: handle created in start_timers(); it was stopped when
        // the compare was armed.
        let ret = unsafe { esp_timer_start_periodic(t, u64::from(period_us)) };
        if ret != ESP_OK as i32 {
            log::warn!("hw_timer: overflow restart failed (rc={})", ret);
        }
    }

    fn arm_compare(&self, remainder_us: u32) {
        let compare = COMPARE_TIMER.load(core::sync::atomic::Ordering::Acquire);
        // SAFETY: compare was created in start_timers() before the
        // overflow timer was started.
        let ret = unsafe { esp_timer_start_once(compare, u64::from(remainder_us)) };
        if ret != ESP_OK as i32 {
            log::warn!("hw_timer: compare arm failed (rc={})", ret);
        }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn overflow_cb(_arg: *mut core::ffi::c_void) {
    on_overflow(&EspTimers);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn compare_cb(_arg: *mut core::ffi::c_void) {
    on_compare_match(&EspTimers);
}

#[cfg(target_os = "espidf")]
unsafe fn create_timer(
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    name: &'static [u8],
) -> Result<esp_timer_handle_t, HwInitError> {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: false,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();
    let ret = unsafe { esp_timer_create(&args, &mut handle) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TimerStartFailed(ret));
    }
    Ok(handle)
}

/// Start the tick source.  `on_second` runs once per calibrated second.
#[cfg(target_os = "espidf")]
pub fn start_timers(calibration: TickCalibration, on_second: fn()) -> Result<(), HwInitError> {
    use core::sync::atomic::Ordering;

    install(calibration, on_second);
    // SAFETY: called once from main before any callback can fire; the
    // compare timer exists before the overflow timer starts.
    unsafe {
        let compare = create_timer(compare_cb, b"tick_cmp\0")?;
        COMPARE_TIMER.store(compare, Ordering::Release);

        let overflow = create_timer(overflow_cb, b"tick_ovf\0")?;
        OVERFLOW_TIMER.store(overflow, Ordering::Release);

        let ret = esp_timer_start_periodic(overflow, u64::from(calibration.overflow_period_us));
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerStartFailed(ret));
        }
    }
    log::info!(
        "hw_timer: {}us x {} + {}us = {}us tick",
        calibration.overflow_period_us,
        calibration.overflow_ticks,
        calibration.remainder_us,
        calibration.nominal_second_us()
    );
    Ok(())
}

/// Stop both tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    use core::sync::atomic::Ordering;
    for timer in [&OVERFLOW_TIMER, &COMPARE_TIMER] {
        let t = timer.load(Ordering::Acquire);
        if !t.is_null() {
            // SAFETY: valid handle from start_timers(); stopping an idle
            // timer only returns ESP_ERR_INVALID_STATE.
            unsafe { esp_timer_stop(t) };
        }
    }
}

// ── Simulation ────────────────────────────────────────────

/// Whether the simulated overflow timer is running.
#[cfg(not(target_os = "espidf"))]
static SIM_OVERFLOW_RUNNING: core::sync::atomic::AtomicBool =
    core::sync::atomic::AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
struct SimTimers;

#[cfg(not(target_os = "espidf"))]
impl TickTimers for SimTimers {
    fn pause_overflow(&self) {
        SIM_OVERFLOW_RUNNING.store(false, core::sync::atomic::Ordering::SeqCst);
    }

    fn resume_overflow(&self) {
        SIM_OVERFLOW_RUNNING.store(true, core::sync::atomic::Ordering::SeqCst);
    }

    fn arm_compare(&self, _remainder_us: u32) {}
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(calibration: TickCalibration, on_second: fn()) -> Result<(), HwInitError> {
    install(calibration, on_second);
    SimTimers.resume_overflow();
    log::info!("hw_timer(sim): divider installed, drive with sim_overflow()");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {
    SimTimers.pause_overflow();
}

/// Deliver one overflow interrupt.  `None` while the overflow timer is
/// paused waiting for the compare-match.
#[cfg(not(target_os = "espidf"))]
pub fn sim_overflow() -> Option<OverflowAction> {
    SIM_OVERFLOW_RUNNING
        .load(core::sync::atomic::Ordering::SeqCst)
        .then(|| on_overflow(&SimTimers))
}

/// Deliver one compare-match interrupt.
#[cfg(not(target_os = "espidf"))]
pub fn sim_compare_match() {
    on_compare_match(&SimTimers);
}
