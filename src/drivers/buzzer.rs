//! Piezo buzzer on a single digital output.
//!
//! Remembers the last level written so the loop can call `set()` every
//! iteration without hammering the GPIO register.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

pub struct Buzzer<P> {
    pin: P,
    /// `None` until the first write, so the first `set()` always reaches the pin.
    current: Option<bool>,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, current: None }
    }

    /// Drive the pin to `level` unless it is already there.
    pub fn set(&mut self, level: bool) -> Result<()> {
        if self.current == Some(level) {
            return Ok(());
        }
        self.pin.set_state(level.into()).map_err(|_| Error::Pin)?;
        self.current = Some(level);
        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    /// Last level written; low before the first write.
    pub fn level(&self) -> bool {
        self.current.unwrap_or(false)
    }

    pub fn release(self) -> P {
        self.pin
    }
}
