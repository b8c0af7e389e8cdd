//! Scheduler scenarios against the real driver and a mock register file.
//!
//! Time is injected per step, so every scenario is deterministic.

use motionalert::app::events::AppEvent;
use motionalert::config::SystemConfig;
use motionalert::drivers::alert::AlertState;
use motionalert::drivers::buzzer::Buzzer;
use motionalert::error::TransportError;
use motionalert::scheduler::SamplingScheduler;
use motionalert::sensors::icm42670::Icm42670;

use crate::mock_hw::{MockImu, RecordingPin, RecordingSink};

const QUIET: [i16; 3] = [120, -80, 15];
const SPIN: [i16; 3] = [2500, 0, 0];

struct Rig {
    sched: SamplingScheduler,
    imu: MockImu,
    buzzer: Buzzer<RecordingPin>,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: &SystemConfig) -> Self {
        let mut imu = MockImu::new();
        imu.set_motion([0, 0, 16384], QUIET);
        Self {
            sched: SamplingScheduler::new(config),
            imu,
            buzzer: Buzzer::new(RecordingPin::default()),
            sink: RecordingSink::default(),
        }
    }

    fn step(&mut self, now: u64) -> motionalert::scheduler::StepReport {
        let mut sensor = Icm42670::new(&mut self.imu);
        self.sched
            .step(now, &mut sensor, &mut self.buzzer, &mut self.sink)
            .unwrap()
    }
}

#[test]
fn breach_at_one_sample_plays_then_clears() {
    let config = SystemConfig::default();
    let duration = u64::from(config.alert_duration_us);
    let mut rig = Rig::new(&config);

    for now in (0..=200_000u64).step_by(20_000) {
        let gyro = if now == 20_000 { SPIN } else { QUIET };
        rig.imu.set_motion([0, 0, 16384], gyro);

        let report = rig.step(now);

        if now < 20_000 {
            assert!(!report.sampled, "no read before the first period");
            assert_eq!(rig.sched.alert_state(), AlertState::Idle);
            assert!(!report.level);
        } else if now == 20_000 {
            assert!(report.triggered);
            assert_eq!(
                rig.sched.alert_state(),
                AlertState::Active { start_us: 20_000, last_toggle_us: 20_000, level: false }
            );
        } else if now == 40_000 {
            assert!(report.level, "first edge one toggle interval after the trigger");
        } else if now >= 20_000 + duration {
            assert_eq!(rig.sched.alert_state(), AlertState::Idle);
            assert!(!report.level);
            assert!(!rig.buzzer.level());
        }
    }

    assert_eq!(rig.imu.motion_reads(), 10);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlertTriggered { .. })), 1);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlertCleared), 1);
}

#[test]
fn tone_toggles_every_iteration_between_samples() {
    let config = SystemConfig::default();
    let mut rig = Rig::new(&config);
    rig.imu.set_motion([0, 0, 0], [0, 0, -2001]);

    let mut levels = Vec::new();
    for now in (0..=30_000u64).step_by(1_000) {
        levels.push(rig.step(now).level);
        if now == 20_000 {
            rig.imu.set_motion([0, 0, 0], QUIET);
        }
    }

    // 20 idle iterations, the trigger iteration low, then alternating.
    assert!(levels[..=20].iter().all(|&l| !l));
    for (i, pair) in levels[20..].windows(2).enumerate() {
        assert_ne!(pair[0], pair[1], "no edge at iteration {}", 20 + i + 1);
    }
}

#[test]
fn retrigger_extends_the_alert() {
    let config = SystemConfig::default();
    let mut rig = Rig::new(&config);

    for now in (0..=200_000u64).step_by(20_000) {
        let gyro = if now == 20_000 || now == 80_000 { SPIN } else { QUIET };
        rig.imu.set_motion([0, 0, 0], gyro);
        rig.step(now);

        match now {
            120_000 | 160_000 => assert!(
                matches!(rig.sched.alert_state(), AlertState::Active { start_us: 80_000, .. })
            ),
            180_000.. => assert_eq!(rig.sched.alert_state(), AlertState::Idle),
            _ => {}
        }
    }
    assert_eq!(rig.sched.stats().alerts, 2);
}

#[test]
fn boundary_rate_never_alerts() {
    let config = SystemConfig::default();
    let mut rig = Rig::new(&config);
    rig.imu.set_motion([0, 0, 0], [2000, 2000, 2000]);

    for now in (0..=100_000u64).step_by(1_000) {
        assert!(!rig.step(now).triggered);
    }
    assert_eq!(rig.sched.stats().samples, 5);
    assert!(rig.buzzer.release().writes.iter().all(|&w| !w));
}

#[test]
fn transient_failure_is_retried_within_the_period() {
    let config = SystemConfig::default();
    let mut rig = Rig::new(&config);
    let backoff = u64::from(config.retry_backoff_us);

    for now in (0..=45_000u64).step_by(1_000) {
        if now == 20_000 {
            rig.imu.fail_next_reads([TransportError::Timeout]);
        }
        rig.step(now);
    }

    // 20000 fails, 20000 + backoff succeeds, the next period follows from there.
    assert_eq!(rig.imu.motion_reads(), 3);
    let stats = rig.sched.stats();
    assert_eq!((stats.samples, stats.read_failures, stats.skipped_periods), (2, 1, 0));
    assert_eq!(
        rig.sink.events.iter().find(|e| matches!(e, AppEvent::ReadRetry { .. })),
        Some(&AppEvent::ReadRetry {
            attempt: 1,
            backoff_us: backoff as u32,
            error: TransportError::Timeout
        })
    );
}

#[test]
fn exhausted_retries_skip_the_period_and_keep_the_alert() {
    let config = SystemConfig::default();
    let mut rig = Rig::new(&config);

    for now in (0..=60_000u64).step_by(1_000) {
        let gyro = if now == 20_000 { SPIN } else { QUIET };
        rig.imu.set_motion([0, 0, 0], gyro);
        rig.step(now);
        if now == 20_000 {
            rig.imu.fail_next_reads([TransportError::BusError; 4]);
        }
    }

    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ReadRetry { .. })), 3);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::SampleSkipped { error: TransportError::BusError }),
        1
    );
    assert!(matches!(rig.sched.alert_state(), AlertState::Active { start_us: 20_000, .. }));
    assert_eq!(rig.sched.stats().skipped_periods, 1);
}
