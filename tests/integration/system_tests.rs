//! End-to-end tests: the Second Ticker and the sampling loop interleaved
//! over one shared state and one board, the way the firmware runs them.

use crate::mock_hw::{MockBoard, OutputCall, RecordingSink, config_with_events};

use plantwater::app::service::{SamplingLoop, SecondTicker};
use plantwater::config::SystemConfig;
use plantwater::drivers::button;
use plantwater::fsm::StateId;
use plantwater::shared::SharedState;

struct Rig {
    ticker: SecondTicker,
    sampling: SamplingLoop,
    shared: SharedState,
    board: MockBoard,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: &SystemConfig) -> Self {
        let ticker = SecondTicker::new(config);
        let shared = SharedState::new();
        let mut sink = RecordingSink::new();
        ticker.start(&shared, &mut sink);
        Self {
            ticker,
            sampling: SamplingLoop::new(config),
            shared,
            board: MockBoard::new(),
            sink,
        }
    }

    /// One second of firmware time: the tick, then the loop wakes up.
    fn second(&mut self) {
        self.ticker.on_tick(&self.shared, &mut self.board, &mut self.sink);
        // The loop spins several times per second; only one pass counts.
        for _ in 0..3 {
            self.sampling.poll(&self.shared, &mut self.board, &mut self.sink);
        }
    }
}

#[test]
fn button_press_waters_for_dial_duration() {
    let mut rig = Rig::new(&config_with_events(&[]));
    rig.board.duration_adc = Ok(1023 / 5);

    rig.second();
    // 55 * 204 / 1023 + 5 = 15
    assert_eq!(rig.shared.pump_duration_secs(), 15);

    button::on_edge(&rig.shared);
    rig.board.pressed = true;
    rig.second(); // loop latches the request at second 2
    assert!(rig.shared.manual_water_pending());
    rig.board.pressed = false;

    rig.second(); // ticker starts at second 3
    assert!(rig.board.pump);
    assert_eq!(rig.ticker.state_id(), StateId::Pumping);

    for _ in 0..15 {
        rig.second();
    }
    assert!(!rig.board.pump);
    assert_eq!(rig.sink.starts(), vec![3]);
    assert_eq!(rig.sink.stops(), vec![18]);
}

#[test]
fn mashing_the_button_still_waters_once() {
    let mut rig = Rig::new(&config_with_events(&[]));
    rig.board.pressed = true;

    for _ in 0..4 {
        button::on_edge(&rig.shared);
        rig.second();
    }
    // Edge latched at 1 started at 2; edges during pumping re-latch the
    // request, which runs once after the first activation ends.
    rig.board.pressed = false;
    for _ in 0..30 {
        rig.second();
    }
    assert_eq!(rig.sink.starts(), vec![2, 8]);
}

#[test]
fn blink_pauses_while_pumping_and_resumes_after() {
    let mut rig = Rig::new(&config_with_events(&[4]));
    rig.board.solar_adc = Ok(1023);

    for _ in 0..3 {
        rig.second();
    }
    assert_eq!(rig.board.led_writes(), 3);
    rig.board.clear_calls();

    // Second 4 starts the pump: LED goes solid and stays that way.
    for _ in 4..=8 {
        rig.second();
        assert!(rig.board.led);
    }
    assert_eq!(
        rig.board.calls,
        vec![OutputCall::Pump(true), OutputCall::Led(true)]
    );
    rig.board.clear_calls();

    // Second 9 stops it; the blink picks up on the same pass.
    rig.second();
    assert_eq!(
        rig.board.calls,
        vec![OutputCall::Pump(false), OutputCall::Led(false), OutputCall::ToggleLed]
    );
    assert!(rig.board.led);
}

#[test]
fn default_schedule_runs_the_first_half_hour() {
    let mut rig = Rig::new(&SystemConfig::default());

    for _ in 0..1900 {
        rig.second();
    }
    assert_eq!(rig.sink.starts(), vec![5, 60, 300, 600, 1800]);
    assert_eq!(rig.sink.stops(), vec![10, 65, 305, 605, 1805]);
}
