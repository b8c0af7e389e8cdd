//! Sampling / alert scheduler.
//!
//! One cooperative loop interleaves two independent timed tasks on a single
//! monotonic clock:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  now = clock.now_us()            (once per iteration)        │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  sample due? ──yes──▶ read_motion ──▶ first_axis_over?       │
//! │        │                   │                 │ yes           │
//! │        │              (retry/skip)           ▼               │
//! │        │                              alert.trigger(now)     │
//! │        ▼                                                     │
//! │  alert.tick(now) ──▶ buzzer.set(level)   (every iteration)   │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  delay.delay_us(loop_yield_us)                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All timing state lives in [`SamplingScheduler`], so a single `step()`
//! can be driven from tests with scripted timestamps and mock hardware.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::policy::first_axis_over;
use crate::app::ports::{EventSink, MonotonicClock, MotionSource};
use crate::config::{ReadFailurePolicy, SystemConfig};
use crate::drivers::alert::{AlertActuator, AlertState};
use crate::drivers::buzzer::Buzzer;
use crate::error::{Error, Result};
use crate::sensors::icm42670::MotionSample;

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// A sample was read and decoded this iteration.
    pub sampled: bool,
    /// The threshold was exceeded and the alert (re)started.
    pub triggered: bool,
    /// Level written to the buzzer.
    pub level: bool,
}

/// Running counters, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub iterations: u64,
    pub samples: u64,
    pub read_failures: u64,
    pub skipped_periods: u64,
    pub alerts: u64,
}

/// A transient read failure waiting for its backoff to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRetry {
    /// Wider than `max_retries` so the count can pass it.
    attempt: u16,
    failed_at_us: u64,
    backoff_us: u64,
}

pub struct SamplingScheduler {
    sample_period_us: u64,
    gyro_threshold: u16,
    policy: ReadFailurePolicy,
    max_retries: u8,
    retry_backoff_us: u32,
    loop_yield_us: u32,

    last_sample_us: u64,
    retry: Option<PendingRetry>,
    alert: AlertActuator,
    last_sample: Option<MotionSample>,
    stats: LoopStats,
}

impl SamplingScheduler {
    /// Build from config.  The sampling grid starts at clock time zero.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sample_period_us: u64::from(config.sample_period_us),
            gyro_threshold: config.gyro_threshold,
            policy: config.read_failure_policy,
            max_retries: config.max_read_retries,
            retry_backoff_us: config.retry_backoff_us,
            loop_yield_us: config.loop_yield_us,
            last_sample_us: 0,
            retry: None,
            alert: AlertActuator::from_config(config),
            last_sample: None,
            stats: LoopStats::default(),
        }
    }

    pub fn alert_state(&self) -> AlertState {
        self.alert.state()
    }

    pub fn last_sample(&self) -> Option<MotionSample> {
        self.last_sample
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    fn read_due(&self, now_us: u64) -> bool {
        match self.retry {
            Some(r) => now_us.wrapping_sub(r.failed_at_us) >= r.backoff_us,
            None => now_us.wrapping_sub(self.last_sample_us) >= self.sample_period_us,
        }
    }

    /// One loop iteration at time `now_us`.
    ///
    /// Sampling strictly precedes the alert tick, so a breach detected here
    /// reaches the pin in this same call.  Errors returned are fatal.
    pub fn step<S, P, E>(
        &mut self,
        now_us: u64,
        sensor: &mut S,
        buzzer: &mut Buzzer<P>,
        sink: &mut E,
    ) -> Result<StepReport>
    where
        S: MotionSource + ?Sized,
        P: OutputPin,
        E: EventSink + ?Sized,
    {
        let mut report = StepReport::default();
        self.stats.iterations += 1;

        if self.read_due(now_us) {
            match sensor.read_motion() {
                Ok(sample) => {
                    self.last_sample_us = now_us;
                    self.retry = None;
                    self.last_sample = Some(sample);
                    self.stats.samples += 1;
                    report.sampled = true;
                    sink.emit(&AppEvent::Sample(sample));

                    if let Some((axis, value)) = first_axis_over(sample.gyro, self.gyro_threshold) {
                        self.alert.trigger(now_us);
                        buzzer.off()?;
                        self.stats.alerts += 1;
                        report.triggered = true;
                        sink.emit(&AppEvent::AlertTriggered { axis, value });
                    }
                }
                Err(e) => self.on_read_failure(now_us, e, sink)?,
            }
        }

        let was_active = self.alert.is_active();
        let level = self.alert.tick(now_us);
        if was_active && !self.alert.is_active() {
            sink.emit(&AppEvent::AlertCleared);
        }
        buzzer.set(level)?;
        report.level = level;

        Ok(report)
    }

    /// Decide between retry, skip and abort.  `Err` means the loop must stop.
    fn on_read_failure<E: EventSink + ?Sized>(
        &mut self,
        now_us: u64,
        err: Error,
        sink: &mut E,
    ) -> Result<()> {
        self.stats.read_failures += 1;

        let transient = match (self.policy, err.transport()) {
            (ReadFailurePolicy::Retry, Some(t)) if t.is_transient() => t,
            _ => return Err(err),
        };

        let attempt = self.retry.map_or(1u16, |r| r.attempt + 1);
        if attempt > u16::from(self.max_retries) {
            warn!("Sampler: giving up on this period after {} retries ({})", self.max_retries, transient);
            self.retry = None;
            self.last_sample_us = now_us;
            self.stats.skipped_periods += 1;
            sink.emit(&AppEvent::SampleSkipped { error: transient });
            return Ok(());
        }

        let backoff_us = u64::from(self.retry_backoff_us) << (attempt - 1).min(16);
        warn!("Sampler: read failed ({}), retry {} in {}us", transient, attempt, backoff_us);
        self.retry = Some(PendingRetry { attempt, failed_at_us: now_us, backoff_us });
        sink.emit(&AppEvent::ReadRetry {
            // attempt <= max_retries here, so it fits.
            attempt: attempt as u8,
            backoff_us: backoff_us.min(u64::from(u32::MAX)) as u32,
            error: transient,
        });
        Ok(())
    }

    /// Run until `stop` is set or a fatal error occurs.
    ///
    /// The buzzer is always left low on exit.
    pub fn run<C, S, P, D, E>(
        &mut self,
        clock: &C,
        sensor: &mut S,
        buzzer: &mut Buzzer<P>,
        delay: &mut D,
        sink: &mut E,
        stop: &AtomicBool,
    ) -> Result<()>
    where
        C: MonotonicClock + ?Sized,
        S: MotionSource + ?Sized,
        P: OutputPin,
        D: DelayNs + ?Sized,
        E: EventSink + ?Sized,
    {
        info!(
            "Sampler: running (period={}us, threshold={}, yield={}us)",
            self.sample_period_us, self.gyro_threshold, self.loop_yield_us
        );

        loop {
            if stop.load(Ordering::Acquire) {
                self.alert.stop();
                buzzer.off()?;
                sink.emit(&AppEvent::Stopped);
                info!("Sampler: stopped after {} iterations", self.stats.iterations);
                return Ok(());
            }

            let now_us = clock.now_us();
            if let Err(e) = self.step(now_us, sensor, buzzer, sink) {
                error!("Sampler: fatal error: {}", e);
                self.alert.stop();
                // Report the step error, not a failed cleanup write.
                let _ = buzzer.off();
                sink.emit(&AppEvent::Fatal(e));
                return Err(e);
            }

            delay.delay_us(self.loop_yield_us);
        }
    }
}
