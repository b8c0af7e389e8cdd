//! Unified error types for the MotionAlert firmware.
//!
//! Every fallible operation funnels into [`Error`] so the control loop's
//! error handling stays uniform.  All variants are `Copy` so they can be
//! passed through the scheduler and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A register transaction on the sensor bus failed.
    Transport(TransportError),
    /// The identity register did not hold the expected value.
    WrongDevice { found: u8 },
    /// The alert output pin could not be driven.
    Pin,
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl Error {
    /// The transport failure behind this error, if any.
    pub fn transport(&self) -> Option<TransportError> {
        match self {
            Self::Transport(e) => Some(*e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::WrongDevice { found } => write!(f, "unexpected WHO_AM_I 0x{found:02X}"),
            Self::Pin => write!(f, "alert pin write failed"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failure of one addressed read or write transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The device did not complete the transaction within the bus timeout.
    Timeout,
    /// The device did not acknowledge its address.
    Nack,
    /// Electrical or bus-level fault (arbitration loss, overrun, data NACK).
    BusError,
}

impl TransportError {
    /// Whether a retry of the same transaction can reasonably succeed.
    ///
    /// A NACK on the address phase means wrong address or wiring and will
    /// not go away on its own.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Timeout | Self::BusError)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "bus timeout"),
            Self::Nack => write!(f, "address not acknowledged"),
            Self::BusError => write!(f, "bus error"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
