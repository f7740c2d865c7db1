//! Plant-watering controller: main entry point.
//!
//! Two execution contexts share one static [`SharedState`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  esp_timer task                                              │
//! │    overflow timer ──▶ TickDivider ──▶ compare timer          │
//! │                                          │                   │
//! │                                          ▼                   │
//! │                     SecondTicker + TickerOutputs (pump, LED) │
//! ├──────────────────────────────────────────────────────────────┤
//! │  GPIO ISR: button falling edge ──▶ latch edge flag           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  main task                                                   │
//! │    loop { SamplingLoop::poll(HardwareAdapter); idle sleep }  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Times of day count from power-up: there is no RTC, so every reset
//! restarts the schedule at second 0.

#![deny(unused_must_use)]

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use plantwater::adapters::hardware::{HardwareAdapter, TickerOutputs};
use plantwater::adapters::log_sink::LogEventSink;
use plantwater::app::service::{SamplingLoop, SecondTicker};
use plantwater::config::SystemConfig;
use plantwater::drivers::button::WaterButton;
use plantwater::drivers::pump::PumpDriver;
use plantwater::drivers::status_led::StatusLed;
use plantwater::drivers::{hw_init, hw_timer};
use plantwater::sensors::AnalogSampler;
use plantwater::shared::SharedState;

static SHARED: SharedState = SharedState::new();

/// Everything the Second Ticker touches that is not in [`SHARED`].
struct TickerContext {
    ticker: SecondTicker,
    outputs: TickerOutputs,
    sink: LogEventSink,
}

/// Filled once in `main` before the tick source starts; afterwards only
/// the compare-match callback locks it.
static TICKER: Mutex<Option<TickerContext>> = Mutex::new(None);

fn on_second() {
    match TICKER.lock() {
        Ok(mut guard) => {
            if let Some(ctx) = guard.as_mut() {
                ctx.ticker.on_tick(&SHARED, &mut ctx.outputs, &mut ctx.sink);
            }
        }
        Err(_) => warn!("ticker context poisoned; tick dropped"),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  plantwater v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (embedded, validated once) ───────────
    let config = SystemConfig::from_json(include_bytes!("../config/default.json"))?;
    info!(
        "Config: {} events, day={}s, tick={}us, wrap={:?}",
        config.events.len(),
        config.day_length(),
        config.tick.nominal_second_us(),
        config.day_wrap
    );

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    StatusLed::new().boot_flash(&mut FreeRtos);

    // ── 4. Second Ticker ──────────────────────────────────────
    let ticker = SecondTicker::new(&config);
    let mut sink = LogEventSink::new();
    ticker.start(&SHARED, &mut sink);
    *TICKER.lock().map_err(|_| anyhow!("ticker context poisoned"))? = Some(TickerContext {
        ticker,
        outputs: TickerOutputs::new(PumpDriver::new(), StatusLed::new()),
        sink: LogEventSink::new(),
    });

    // ── 5. Interrupt sources ──────────────────────────────────
    hw_init::init_isr_service(&SHARED)?;
    hw_timer::start_timers(config.tick, on_second)?;

    // ── 6. Sampling loop ──────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        AnalogSampler::new(config.adc_max_polls),
        WaterButton::new(),
        StatusLed::new(),
    );
    let mut sampling = SamplingLoop::new(&config);

    info!("System ready. Entering polling loop.");
    loop {
        sampling.poll(&SHARED, &mut hw, &mut sink);
        FreeRtos::delay_ms(config.idle_sleep_ms);
    }
}
