//! Host simulation of the real drivers: tick source, GPIO bank and ADC.
//!
//! Everything here goes through process-wide simulation statics, so the
//! whole scenario lives in one test.

use std::sync::Mutex;

use crate::mock_hw::RecordingSink;

use plantwater::adapters::hardware::{HardwareAdapter, TickerOutputs};
use plantwater::app::events::AppEvent;
use plantwater::app::service::{SamplingLoop, SecondTicker};
use plantwater::clock::OverflowAction;
use plantwater::config::{SystemConfig, TickCalibration};
use plantwater::drivers::button::{self, WaterButton};
use plantwater::drivers::hw_timer;
use plantwater::drivers::pump::PumpDriver;
use plantwater::drivers::status_led::StatusLed;
use plantwater::error::SensorError;
use plantwater::sensors::{self, AnalogChannel, AnalogSampler};
use plantwater::shared::SharedState;

static SHARED: SharedState = SharedState::new();

struct TickerContext {
    ticker: SecondTicker,
    outputs: TickerOutputs,
    sink: RecordingSink,
}

static TICKER: Mutex<Option<TickerContext>> = Mutex::new(None);

fn on_second() {
    let mut guard = TICKER.lock().unwrap();
    let ctx = guard.as_mut().unwrap();
    ctx.ticker.on_tick(&SHARED, &mut ctx.outputs, &mut ctx.sink);
}

/// Two overflows and a compare-match make one second.  The overflow
/// timer is paused between arming and the compare.
fn one_second() {
    assert_eq!(hw_timer::sim_overflow(), Some(OverflowAction::Count));
    assert!(matches!(
        hw_timer::sim_overflow(),
        Some(OverflowAction::ArmCompare { .. })
    ));
    assert_eq!(hw_timer::sim_overflow(), None);
    hw_timer::sim_compare_match();
}

fn pump_running() -> bool {
    TICKER.lock().unwrap().as_ref().unwrap().outputs.pump().is_running()
}

#[test]
fn simulated_board_waters_on_button_press() {
    let mut config = SystemConfig::default();
    config.events.clear();
    config.tick = TickCalibration {
        overflow_period_us: 500_000,
        overflow_ticks: 2,
        remainder_us: 0,
    };
    config.adc_max_polls = 8;
    config.validate().unwrap();

    let ticker = SecondTicker::new(&config);
    let mut sink = RecordingSink::new();
    ticker.start(&SHARED, &mut sink);
    *TICKER.lock().unwrap() = Some(TickerContext {
        ticker,
        outputs: TickerOutputs::new(PumpDriver::new(), StatusLed::new()),
        sink: RecordingSink::new(),
    });
    hw_timer::start_timers(config.tick, on_second).unwrap();

    let mut hw = HardwareAdapter::new(
        AnalogSampler::new(config.adc_max_polls),
        WaterButton::new(),
        StatusLed::new(),
    );
    let mut sampling = SamplingLoop::new(&config);

    // Full-scale dial, dark panel.
    sensors::sim_set_adc(AnalogChannel::Duration, 1023);
    sensors::sim_set_adc(AnalogChannel::Solar, 0);

    one_second();
    assert_eq!(SHARED.elapsed_seconds(), 1);
    assert!(sampling.poll(&SHARED, &mut hw, &mut sink));
    assert_eq!(SHARED.pump_duration_secs(), 60);

    // Press: the ISR latches, the loop confirms the level.
    button::sim_press(true);
    button::on_edge(&SHARED);
    one_second();
    sampling.poll(&SHARED, &mut hw, &mut sink);
    button::sim_press(false);
    assert!(SHARED.manual_water_pending());

    one_second();
    assert!(pump_running());
    assert!(StatusLed::new().is_on());
    assert!(SHARED.led_locked());

    // A stuck converter is abandoned after the poll budget.
    sensors::sim_set_adc_stuck(true);
    one_second();
    sampling.poll(&SHARED, &mut hw, &mut sink);
    sensors::sim_set_adc_stuck(false);
    assert!(sink.events.contains(&AppEvent::SampleFailed {
        channel: AnalogChannel::Duration,
        error: SensorError::AdcTimeout,
    }));
    assert_eq!(SHARED.pump_duration_secs(), 60);

    for _ in 0..60 {
        one_second();
    }
    assert!(!pump_running());
    assert!(!StatusLed::new().is_on());
    assert_eq!(
        TICKER.lock().unwrap().as_ref().unwrap().sink.starts(),
        vec![3]
    );
    hw_timer::stop_timers();
}
