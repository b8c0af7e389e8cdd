//! Domain events emitted by the driver and scheduler.

use crate::error::{Error, TransportError};
use crate::sensors::icm42670::MotionSample;

use super::policy::Axis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Sensor answered its identity probe.
    SensorIdentified { who_am_i: u8 },
    /// Sensor woken and settled; the loop is about to start.
    SensorReady,
    /// A motion sample was decoded.
    Sample(MotionSample),
    /// An angular-rate axis exceeded the threshold; the alert (re)started.
    AlertTriggered { axis: Axis, value: i16 },
    /// The alert ran for its full duration and went quiet.
    AlertCleared,
    /// A transient read failure will be retried after `backoff_us`.
    ReadRetry { attempt: u8, backoff_us: u32, error: TransportError },
    /// Retries ran out; this sampling period was skipped.
    SampleSkipped { error: TransportError },
    /// The loop is stopping because of an unrecoverable error.
    Fatal(Error),
    /// The loop stopped on request.
    Stopped,
}
