//! Sampling loop integration tests: once-per-second gating, debounce,
//! duration updates and the charge blink.

use crate::mock_hw::{MockBoard, OutputCall, RecordingSink};

use plantwater::app::events::AppEvent;
use plantwater::app::service::SamplingLoop;
use plantwater::config::SystemConfig;
use plantwater::error::SensorError;
use plantwater::sensors::AnalogChannel;
use plantwater::shared::{DEFAULT_PUMP_DURATION_SECS, SharedState};

fn rig() -> (SamplingLoop, SharedState, MockBoard, RecordingSink) {
    (
        SamplingLoop::new(&SystemConfig::default()),
        SharedState::new(),
        MockBoard::new(),
        RecordingSink::new(),
    )
}

// ── Gating ────────────────────────────────────────────────────

#[test]
fn runs_once_per_elapsed_second() {
    let (mut sampling, shared, mut board, mut sink) = rig();

    // Still second 0 since boot: nothing to do.
    assert!(!sampling.poll(&shared, &mut board, &mut sink));
    assert_eq!(board.samples, 0);

    shared.publish_elapsed(1);
    assert!(sampling.poll(&shared, &mut board, &mut sink));
    assert!(!sampling.poll(&shared, &mut board, &mut sink));
    assert!(!sampling.poll(&shared, &mut board, &mut sink));
    assert_eq!(board.samples, 2);

    shared.publish_elapsed(2);
    assert!(sampling.poll(&shared, &mut board, &mut sink));
    assert_eq!(board.samples, 4);
}

#[test]
fn runs_again_after_day_wrap() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    shared.publish_elapsed(86_399);
    assert!(sampling.poll(&shared, &mut board, &mut sink));
    shared.publish_elapsed(0);
    assert!(sampling.poll(&shared, &mut board, &mut sink));
}

// ── Debounce ──────────────────────────────────────────────────

#[test]
fn edge_with_pressed_pin_becomes_manual_request() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    shared.latch_button_edge();
    board.pressed = true;

    shared.publish_elapsed(7);
    sampling.poll(&shared, &mut board, &mut sink);

    assert!(shared.manual_water_pending());
    assert!(!shared.button_edge_pending());
    assert!(sink.events.contains(&AppEvent::ManualRequestLatched { second: 7 }));
}

#[test]
fn edge_with_released_pin_stays_latched() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    shared.latch_button_edge();
    board.pressed = false;

    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);
    assert!(!shared.manual_water_pending());
    assert!(shared.button_edge_pending());

    // Confirmed on a later pass once the pin reads pressed.
    board.pressed = true;
    shared.publish_elapsed(2);
    sampling.poll(&shared, &mut board, &mut sink);
    assert!(shared.manual_water_pending());
    assert!(!shared.button_edge_pending());
}

#[test]
fn held_button_without_edge_does_nothing() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.pressed = true;

    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);
    assert!(!shared.manual_water_pending());
}

// ── Duration dial ─────────────────────────────────────────────

#[test]
fn dial_extremes_map_to_duration_bounds() {
    let (mut sampling, shared, mut board, mut sink) = rig();

    board.duration_adc = Ok(1023);
    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);
    assert_eq!(shared.pump_duration_secs(), 60);

    board.duration_adc = Ok(0);
    shared.publish_elapsed(2);
    sampling.poll(&shared, &mut board, &mut sink);
    assert_eq!(shared.pump_duration_secs(), 5);

    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::DurationChanged { .. })),
        2
    );
}

#[test]
fn failed_dial_sample_keeps_previous_duration() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.duration_adc = Err(SensorError::AdcTimeout);

    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);

    assert_eq!(shared.pump_duration_secs(), DEFAULT_PUMP_DURATION_SECS);
    assert!(sink.events.contains(&AppEvent::SampleFailed {
        channel: AnalogChannel::Duration,
        error: SensorError::AdcTimeout,
    }));
}

// ── Charge blink ──────────────────────────────────────────────

#[test]
fn charging_toggles_led_each_second() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.solar_adc = Ok(900);

    for second in 1..=4 {
        shared.publish_elapsed(second);
        sampling.poll(&shared, &mut board, &mut sink);
        assert_eq!(board.led, second % 2 == 1);
    }
    assert_eq!(board.led_writes(), 4);
}

#[test]
fn threshold_is_inclusive() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.solar_adc = Ok(SystemConfig::default().solar_threshold_raw);

    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);
    assert_eq!(board.calls, vec![OutputCall::ToggleLed]);
}

#[test]
fn below_threshold_leaves_led_untouched() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.led = true;
    board.solar_adc = Ok(100);

    for second in 1..=3 {
        shared.publish_elapsed(second);
        sampling.poll(&shared, &mut board, &mut sink);
    }
    assert!(board.led);
    assert_eq!(board.led_writes(), 0);
}

#[test]
fn locked_led_is_never_blinked() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.solar_adc = Ok(1023);
    shared.set_led_lock(true);

    for second in 1..=5 {
        shared.publish_elapsed(second);
        sampling.poll(&shared, &mut board, &mut sink);
    }
    assert_eq!(board.led_writes(), 0);

    // Resumes on the next qualifying sample once released.
    shared.set_led_lock(false);
    shared.publish_elapsed(6);
    sampling.poll(&shared, &mut board, &mut sink);
    assert_eq!(board.calls, vec![OutputCall::ToggleLed]);
}

#[test]
fn failed_solar_sample_skips_blink() {
    let (mut sampling, shared, mut board, mut sink) = rig();
    board.solar_adc = Err(SensorError::AdcReadFailed(-1));

    shared.publish_elapsed(1);
    sampling.poll(&shared, &mut board, &mut sink);
    assert_eq!(board.led_writes(), 0);
    assert!(sink.events.contains(&AppEvent::SampleFailed {
        channel: AnalogChannel::Solar,
        error: SensorError::AdcReadFailed(-1),
    }));
}
