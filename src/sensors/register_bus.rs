//! Register transport over any embedded-hal 1.0 I2C bus.
//!
//! The bus itself is configured by the caller; this type only binds it to
//! one device address and speaks the register protocol:
//!
//! ```text
//! read:  START ADDR(W) REG  RESTART ADDR(R) DATA.. STOP
//! write: START ADDR(W) REG VALUE STOP
//! ```

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

use crate::app::ports::RegisterTransport;
use crate::error::TransportError;

/// One addressed device on an embedded-hal I2C bus.
pub struct I2cRegisterBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cRegisterBus<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Returns the underlying bus, consuming this wrapper.
    pub fn release(self) -> I {
        self.i2c
    }
}

/// Map an embedded-hal error onto the transport taxonomy.
///
/// embedded-hal has no timeout kind; HALs that report timeouts do so as
/// `Other`, which lands in `BusError` here.
pub fn classify(kind: ErrorKind) -> TransportError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address | NoAcknowledgeSource::Unknown) => {
            TransportError::Nack
        }
        _ => TransportError::BusError,
    }
}

impl<I: I2c> RegisterTransport for I2cRegisterBus<I> {
    fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), TransportError> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .map_err(|e| classify(e.kind()))
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), TransportError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|e| classify(e.kind()))
    }
}
