//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SamplingScheduler (domain)
//! ```
//!
//! Driven adapters (bus, sensor, clock, event sinks) implement these traits.
//! The scheduler consumes them via generics, so the domain core never
//! touches hardware directly.  The alert output is the one exception: it is
//! any `embedded_hal::digital::OutputPin`, wrapped by
//! [`Buzzer`](crate::drivers::buzzer::Buzzer).

use crate::error::{Result, TransportError};
use crate::sensors::icm42670::MotionSample;

// ───────────────────────────────────────────────────────────────
// Register transport (driven adapter: domain ↔ bus device)
// ───────────────────────────────────────────────────────────────

/// Addressed register access on one bus device.
///
/// An implementation is bound to a single device address for its whole
/// lifetime.  No retries happen at this layer; every failure is reported
/// to the caller as-is.
pub trait RegisterTransport {
    /// Send `reg`, then receive `buf.len()` bytes in one combined transaction.
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> core::result::Result<(), TransportError>;

    /// Send the two-byte payload `[reg, value]` as one transaction.
    fn write(&mut self, reg: u8, value: u8) -> core::result::Result<(), TransportError>;
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> core::result::Result<(), TransportError> {
        (**self).read(reg, buf)
    }

    fn write(&mut self, reg: u8, value: u8) -> core::result::Result<(), TransportError> {
        (**self).write(reg, value)
    }
}

// ───────────────────────────────────────────────────────────────
// Motion source (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the scheduler calls this once per sampling period.
pub trait MotionSource {
    fn read_motion(&mut self) -> Result<MotionSample>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: system timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond counter.  Never rewound; may wrap at `u64::MAX`.
pub trait MonotonicClock {
    fn now_us(&self) -> u64;
}

/// Any `Fn() -> u64` is a clock, which lets tests inject scripted time.
impl<F: Fn() -> u64> MonotonicClock for F {
    fn now_us(&self) -> u64 {
        self()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
