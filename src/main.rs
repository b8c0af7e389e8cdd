//! MotionAlert Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative sampling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspRegisterBus      LogEventSink   Esp32TimeAdapter  LoopDelay│
//! │  (RegisterTransport) (EventSink)    (MonotonicClock)  (DelayNs)│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Icm42670 (MotionSource) · threshold policy            │    │
//! │  │  AlertActuator · Buzzer                                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  SamplingScheduler (20 ms sampling, 500 us alert toggling)     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use log::{error, info};

use motionalert::adapters::esp_i2c::EspRegisterBus;
use motionalert::adapters::log_sink::LogEventSink;
use motionalert::adapters::time::{Esp32TimeAdapter, LoopDelay};
use motionalert::app::events::AppEvent;
use motionalert::app::ports::EventSink;
use motionalert::config::SystemConfig;
use motionalert::drivers::buzzer::Buzzer;
use motionalert::drivers::hw_init;
use motionalert::error::Error;
use motionalert::scheduler::SamplingScheduler;
use motionalert::sensors::icm42670::Icm42670;

/// Cooperative shutdown request, checked once per loop iteration.
static STOP: AtomicBool = AtomicBool::new(false);

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MotionAlert v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    // Falls back to defaults when the build-time override is invalid.
    let config = SystemConfig::load();

    // ── 3. Peripherals ────────────────────────────────────────
    let board = hw_init::init_board(&config)
        .map_err(|e| {
            error!("HAL init failed: {}", e);
            Error::from(e)
        })
        .context("hardware init")?;

    let mut buzzer = Buzzer::new(board.buzzer);
    buzzer.off().context("buzzer off")?;

    let mut sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();
    let mut delay = LoopDelay::new(config.loop_yield_us);

    // ── 4. Sensor bring-up ────────────────────────────────────
    let bus = EspRegisterBus::new(board.i2c, config.i2c_address, config.transaction_timeout_ms);
    let mut imu = Icm42670::new(bus);

    let who_am_i = match imu.init(&mut delay, config.settle_ms) {
        Ok(id) => id,
        Err(e) => {
            error!("ICM-42670-P init at 0x{:02X} failed: {}", config.i2c_address, e);
            sink.emit(&AppEvent::Fatal(e));
            return Err(e).context("sensor init");
        }
    };
    sink.emit(&AppEvent::SensorIdentified { who_am_i });
    sink.emit(&AppEvent::SensorReady);

    // ── 5. Sampling loop ──────────────────────────────────────
    let mut scheduler = SamplingScheduler::new(&config);
    let result = scheduler.run(&clock, &mut imu, &mut buzzer, &mut delay, &mut sink, &STOP);

    let stats = scheduler.stats();
    info!(
        "Loop stats: iterations={} samples={} read_failures={} skipped={} alerts={}",
        stats.iterations, stats.samples, stats.read_failures, stats.skipped_periods, stats.alerts
    );

    // ── 6. Teardown ───────────────────────────────────────────
    drop(imu.release().release());
    info!("I2C de-initialized");
    drop(buzzer.release());
    info!("Buzzer GPIO released");

    result.context("sampling loop")
}
