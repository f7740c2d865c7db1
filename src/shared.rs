//! State shared between interrupt context and the polling loop.
//!
//! Every cross-context field lives in [`SharedState`]; one instance is
//! created as a `static` in `main` and handed by reference to the Second
//! Ticker shim, the button ISR and the sampling loop.
//!
//! ## Access discipline
//!
//! | Field                 | Written by                    | Read by               | Guard            |
//! |-----------------------|-------------------------------|-----------------------|------------------|
//! | elapsed seconds       | Second Ticker                 | sampling loop         | atomic           |
//! | pending button edge   | button ISR (set), debounce (clear) | debounce         | atomic           |
//! | pending manual water  | debounce (set), ticker (clear)| Second Ticker         | atomic           |
//! | pump duration         | sampling loop                 | Second Ticker         | critical section |
//! | status LED lock       | Second Ticker                 | charge blink          | critical section |
//!
//! The pump start second is not here: it is private to the ticker.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::sensors::duration::MIN_DURATION_SECS;

/// Pump-on duration used until the first dial sample lands.
pub const DEFAULT_PUMP_DURATION_SECS: u8 = MIN_DURATION_SECS;

pub struct SharedState {
    elapsed_seconds: AtomicU32,
    pending_button_edge: AtomicBool,
    pending_manual_water: AtomicBool,
    pump_duration_secs: Mutex<CriticalSectionRawMutex, Cell<u8>>,
    status_led_lock: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            elapsed_seconds: AtomicU32::new(0),
            pending_button_edge: AtomicBool::new(false),
            pending_manual_water: AtomicBool::new(false),
            pump_duration_secs: Mutex::new(Cell::new(DEFAULT_PUMP_DURATION_SECS)),
            status_led_lock: Mutex::new(Cell::new(false)),
        }
    }

    // ── Elapsed seconds ───────────────────────────────────────

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds.load(Ordering::Acquire)
    }

    /// Second Ticker only.  Always called with an already-wrapped value.
    pub fn publish_elapsed(&self, seconds: u32) {
        self.elapsed_seconds.store(seconds, Ordering::Release);
    }

    // ── Button edge ───────────────────────────────────────────

    /// Lock-free; safe from interrupt context.
    pub fn latch_button_edge(&self) {
        self.pending_button_edge.store(true, Ordering::Release);
    }

    pub fn button_edge_pending(&self) -> bool {
        self.pending_button_edge.load(Ordering::Acquire)
    }

    pub fn clear_button_edge(&self) {
        self.pending_button_edge.store(false, Ordering::Release);
    }

    // ── Manual water request ──────────────────────────────────

    /// Idempotent: a request that is already pending stays a single request.
    pub fn request_manual_water(&self) {
        self.pending_manual_water.store(true, Ordering::Release);
    }

    pub fn manual_water_pending(&self) -> bool {
        self.pending_manual_water.load(Ordering::Acquire)
    }

    /// Second Ticker only, once the request has started an activation.
    pub fn consume_manual_water(&self) {
        self.pending_manual_water.store(false, Ordering::Release);
    }

    // ── Pump duration ─────────────────────────────────────────

    pub fn pump_duration_secs(&self) -> u8 {
        self.pump_duration_secs.lock(Cell::get)
    }

    /// Written with interrupts masked so the ticker never sees a torn value.
    pub fn set_pump_duration_secs(&self, secs: u8) {
        self.pump_duration_secs.lock(|d| d.set(secs));
    }

    // ── Status LED lock ───────────────────────────────────────

    pub fn led_locked(&self) -> bool {
        self.status_led_lock.lock(Cell::get)
    }

    /// Second Ticker only.
    pub fn set_led_lock(&self, locked: bool) {
        self.status_led_lock.lock(|l| l.set(locked));
    }

    /// Run `f` only while the LED is unlocked, without letting the ticker
    /// take the lock in between.  Returns whether `f` ran.
    pub fn with_led_unlocked(&self, f: impl FnOnce()) -> bool {
        self.status_led_lock.lock(|l| {
            if l.get() {
                false
            } else {
                f();
                true
            }
        })
    }
}
