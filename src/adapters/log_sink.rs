//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  The lines are for humans, not
//! a structured protocol.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::icm42670::MotionSample;

/// The per-sample console line.
pub fn format_sample(s: &MotionSample) -> String {
    format!(
        "Accel: X={} Y={} Z={} | Gyro: X={} Y={} Z={}",
        s.accel[0], s.accel[1], s.accel[2], s.gyro[0], s.gyro[1], s.gyro[2],
    )
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SensorIdentified { who_am_i } => {
                info!("ICM-42670-P WHO_AM_I = 0x{:02X}", who_am_i);
            }
            AppEvent::SensorReady => {
                info!("Sensor awake, entering sampling loop");
            }
            AppEvent::Sample(s) => {
                info!("{}", format_sample(s));
            }
            AppEvent::AlertTriggered { axis, value } => {
                info!("ALERT | gyro {} = {} over threshold", axis, value);
            }
            AppEvent::AlertCleared => {
                info!("ALERT | cleared");
            }
            AppEvent::ReadRetry { attempt, backoff_us, error } => {
                warn!("READ | {} | retry {} in {}us", error, attempt, backoff_us);
            }
            AppEvent::SampleSkipped { error } => {
                warn!("READ | {} | period skipped", error);
            }
            AppEvent::Fatal(e) => {
                error!("FATAL | {}", e);
            }
            AppEvent::Stopped => {
                info!("Sampling loop stopped");
            }
        }
    }
}
