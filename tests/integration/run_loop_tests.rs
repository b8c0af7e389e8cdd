//! The blocking `run` loop: stop flag, fatal errors and the loop-tail yield.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use motionalert::app::events::AppEvent;
use motionalert::config::{ReadFailurePolicy, SystemConfig};
use motionalert::drivers::alert::AlertState;
use motionalert::drivers::buzzer::Buzzer;
use motionalert::error::{Error, TransportError};
use motionalert::scheduler::SamplingScheduler;
use motionalert::sensors::icm42670::Icm42670;

use crate::mock_hw::{CountingDelay, MockImu, RecordingPin, RecordingSink};

/// Advances 1 ms per call and raises `stop` once `until` has been handed out.
fn stepping_clock<'a>(stop: &'a AtomicBool, until: u64) -> impl Fn() -> u64 + 'a {
    let t = Cell::new(0u64);
    move || {
        let now = t.get();
        t.set(now + 1_000);
        if now >= until {
            stop.store(true, Ordering::Release);
        }
        now
    }
}

#[test]
fn stop_flag_ends_the_loop_with_the_buzzer_low() {
    let config = SystemConfig::default();
    let stop = AtomicBool::new(false);
    let clock = stepping_clock(&stop, 150_000);

    let mut mock = MockImu::new();
    // Every sample breaches, so the alert is sounding when the stop lands.
    mock.set_motion([0, 0, 0], [0, 0, 3000]);
    let mut imu = Icm42670::new(mock);
    let mut buzzer = Buzzer::new(RecordingPin::default());
    let mut delay = CountingDelay::default();
    let mut sink = RecordingSink::default();
    let mut sched = SamplingScheduler::new(&config);

    let result = sched.run(&clock, &mut imu, &mut buzzer, &mut delay, &mut sink, &stop);

    assert_eq!(result, Ok(()));
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
    assert_eq!(sched.stats().iterations, 151);
    assert_eq!(delay.calls, 151);
    assert_eq!(delay.total_ns, 151 * u64::from(config.loop_yield_us) * 1_000);
    assert_eq!(sched.alert_state(), AlertState::Idle);
    assert!(!buzzer.release().level());
    assert_eq!(imu.release().motion_reads(), 7);
}

#[test]
fn preset_stop_flag_never_samples() {
    let config = SystemConfig::default();
    let stop = AtomicBool::new(true);
    let clock = || 50_000u64;

    let mut imu = Icm42670::new(MockImu::new());
    let mut buzzer = Buzzer::new(RecordingPin::default());
    let mut sink = RecordingSink::default();
    let mut sched = SamplingScheduler::new(&config);

    sched
        .run(&clock, &mut imu, &mut buzzer, &mut CountingDelay::default(), &mut sink, &stop)
        .unwrap();

    assert_eq!(sink.events, vec![AppEvent::Stopped]);
    assert_eq!(imu.release().motion_reads(), 0);
    assert_eq!(buzzer.release().writes, vec![false]);
}

#[test]
fn nack_is_fatal() {
    let config = SystemConfig::default();
    let stop = AtomicBool::new(false);
    let clock = stepping_clock(&stop, u64::MAX);

    let mut mock = MockImu::new();
    mock.fail_next_reads([TransportError::Nack]);
    let mut imu = Icm42670::new(mock);
    let mut buzzer = Buzzer::new(RecordingPin::default());
    let mut sink = RecordingSink::default();
    let mut sched = SamplingScheduler::new(&config);

    let result = sched.run(
        &clock,
        &mut imu,
        &mut buzzer,
        &mut CountingDelay::default(),
        &mut sink,
        &stop,
    );

    let err = Error::Transport(TransportError::Nack);
    assert_eq!(result, Err(err));
    assert_eq!(sink.events.last(), Some(&AppEvent::Fatal(err)));
    assert!(!buzzer.level());
    // Failed on the first due read.
    assert_eq!(sched.stats().iterations, 21);
}

#[test]
fn abort_policy_halts_on_a_timeout() {
    let config = SystemConfig {
        read_failure_policy: ReadFailurePolicy::Abort,
        ..SystemConfig::default()
    };
    let stop = AtomicBool::new(false);
    let clock = stepping_clock(&stop, u64::MAX);

    let mut mock = MockImu::new();
    mock.fail_next_reads([TransportError::Timeout]);
    let mut imu = Icm42670::new(mock);
    let mut sink = RecordingSink::default();

    let result = SamplingScheduler::new(&config).run(
        &clock,
        &mut imu,
        &mut Buzzer::new(RecordingPin::default()),
        &mut CountingDelay::default(),
        &mut sink,
        &stop,
    );

    assert_eq!(result, Err(Error::Transport(TransportError::Timeout)));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReadRetry { .. })), 0);
}
