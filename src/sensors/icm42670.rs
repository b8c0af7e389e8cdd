//! TDK InvenSense ICM-42670-P six-axis IMU driver.
//!
//! Only what the alert loop needs: identity probe, power-up into low-noise
//! mode, and a single burst read of the accelerometer and gyroscope data
//! registers.  The gyro block sits directly after the accel block, so one
//! 12-byte transaction starting at `ACCEL_DATA_X1` covers both:
//!
//! | Offset | Register        | Offset | Register       |
//! |--------|-----------------|--------|----------------|
//! | 0, 1   | ACCEL_DATA_X1/0 | 6, 7   | GYRO_DATA_X1/0 |
//! | 2, 3   | ACCEL_DATA_Y1/0 | 8, 9   | GYRO_DATA_Y1/0 |
//! | 4, 5   | ACCEL_DATA_Z1/0 | 10, 11 | GYRO_DATA_Z1/0 |
//!
//! Each pair is a big-endian two's-complement `i16`.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{MotionSource, RegisterTransport};
use crate::config::MIN_SETTLE_MS;
use crate::error::{Error, Result};

/// Value of `WHO_AM_I` on a genuine ICM-42670-P.
pub const WHO_AM_I_EXPECTED: u8 = 0x67;

/// `PWR_MGMT0`: gyro and accel both in low-noise mode.
pub const PWR_MODE_LOW_NOISE: u8 = 0x0F;

/// Length of the contiguous accel + gyro data block.
pub const MOTION_BLOCK_LEN: usize = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// High byte of X-axis acceleration; start of the motion block
    AccelDataX1 = 0x0B,
    /// High byte of X-axis angular rate
    GyroDataX1 = 0x11,
    /// Power management: accel/gyro operating modes
    PwrMgmt0 = 0x1F,
    /// Device identity
    WhoAmI = 0x75,
}

/// One decoded reading.  Raw sensor units, no scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionSample {
    /// Acceleration X, Y, Z.
    pub accel: [i16; 3],
    /// Angular rate X, Y, Z.
    pub gyro: [i16; 3],
}

/// Byte offset of the gyro words inside the motion block.
pub const GYRO_OFFSET: usize = (Register::GyroDataX1 as u8 - Register::AccelDataX1 as u8) as usize;

// Accel and gyro are contiguous, three words each.
const _: () = assert!(GYRO_OFFSET == 6 && GYRO_OFFSET * 2 == MOTION_BLOCK_LEN);

/// Decode the 12-byte accel + gyro block.
pub fn decode_motion(raw: &[u8; MOTION_BLOCK_LEN]) -> MotionSample {
    let word = |at: usize| i16::from_be_bytes([raw[at], raw[at + 1]]);
    let triple = |base: usize| [word(base), word(base + 2), word(base + 4)];
    MotionSample {
        accel: triple(0),
        gyro: triple(GYRO_OFFSET),
    }
}

/// ICM-42670-P driver over any [`RegisterTransport`].
pub struct Icm42670<T> {
    bus: T,
}

impl<T: RegisterTransport> Icm42670<T> {
    pub fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Returns the underlying transport, consuming this driver.
    pub fn release(self) -> T {
        self.bus
    }

    fn read_register(&mut self, reg: Register) -> Result<u8> {
        let mut buf = [0; 1];
        self.bus.read(reg as u8, &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        self.bus.write(reg as u8, value)?;
        Ok(())
    }

    /// Raw `WHO_AM_I` byte.  Comparison is the caller's business.
    pub fn identify(&mut self) -> Result<u8> {
        self.read_register(Register::WhoAmI)
    }

    /// `identify` and require the ICM-42670-P value.
    pub fn verify_identity(&mut self) -> Result<u8> {
        let found = self.identify()?;
        if found == WHO_AM_I_EXPECTED {
            Ok(found)
        } else {
            Err(Error::WrongDevice { found })
        }
    }

    /// Enable accel and gyro in low-noise mode.
    ///
    /// Data is not valid until the settle interval has passed.
    pub fn wake(&mut self) -> Result<()> {
        self.write_register(Register::PwrMgmt0, PWR_MODE_LOW_NOISE)
    }

    /// Probe, wake and wait out the settle interval.
    pub fn init(&mut self, delay: &mut impl DelayNs, settle_ms: u32) -> Result<u8> {
        let who_am_i = self.verify_identity()?;
        debug!("icm42670: identity ok, waking");
        self.wake()?;
        delay.delay_ms(settle_ms.max(MIN_SETTLE_MS));
        Ok(who_am_i)
    }

    /// One burst read of accel + gyro.
    pub fn read_motion(&mut self) -> Result<MotionSample> {
        let mut raw = [0u8; MOTION_BLOCK_LEN];
        self.bus.read(Register::AccelDataX1 as u8, &mut raw)?;
        Ok(decode_motion(&raw))
    }
}

impl<T: RegisterTransport> MotionSource for Icm42670<T> {
    fn read_motion(&mut self) -> Result<MotionSample> {
        Icm42670::read_motion(self)
    }
}
