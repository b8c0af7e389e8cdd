//! ESP32 time adapter.
//!
//! Provides the monotonic clock and the loop-tail delay.
//!
//! - **`target_os = "espidf"`** — `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic) and
//!   `esp_idf_hal::delay::Delay`.
//! - **`not(target_os = "espidf")`** — `std::time::Instant` and
//!   `std::thread::sleep` for host-side testing and simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::MonotonicClock;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads a free-running hardware counter;
        // callable from any task once the system timer is up (before main).
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic, wraps at `u64::MAX`).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl MonotonicClock for Esp32TimeAdapter {
    fn now_us(&self) -> u64 {
        self.uptime_us()
    }
}

/// Delay used for the settle wait and the cooperative loop yield.
///
/// The IDF `Delay` sleeps through FreeRTOS at or above its busy-wait
/// threshold, and FreeRTOS rounds up to whole ticks (10 ms at 100 Hz).
/// The loop yield must stay below the threshold, or the 500 us tone
/// degrades to the tick rate.  Longer waits (sensor settle) still sleep.
pub struct LoopDelay {
    busy_wait_threshold_us: u32,
    #[cfg(target_os = "espidf")]
    inner: esp_idf_hal::delay::Delay,
}

impl LoopDelay {
    /// `loop_yield_us` is the longest wait that must not touch the scheduler.
    pub fn new(loop_yield_us: u32) -> Self {
        let busy_wait_threshold_us = loop_yield_us.saturating_add(1);
        Self {
            busy_wait_threshold_us,
            #[cfg(target_os = "espidf")]
            inner: esp_idf_hal::delay::Delay::new(busy_wait_threshold_us),
        }
    }

    /// Waits shorter than this spin instead of sleeping.
    pub fn busy_wait_threshold_us(&self) -> u32 {
        self.busy_wait_threshold_us
    }
}

impl DelayNs for LoopDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
