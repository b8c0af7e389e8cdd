//! One-shot hardware peripheral initialization.
//!
//! Claims the I2C master port and the buzzer GPIO from the HAL and hands
//! them back as owned drivers.  Called once from `main()` before the
//! sampling loop starts.

use crate::config::SystemConfig;
use crate::error::Error;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    PeripheralsTaken,
    I2cInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PeripheralsTaken     => write!(f, "peripherals already taken"),
            Self::I2cInitFailed(rc)    => write!(f, "I2C{} init failed (rc={})", pins::I2C_PORT, rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO{} config failed (rc={})", pins::BUZZER_GPIO, rc),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::PeripheralsTaken    => Self::Init("peripherals already taken"),
            HwInitError::I2cInitFailed(_)    => Self::Init("I2C master"),
            HwInitError::GpioConfigFailed(_) => Self::Init("buzzer GPIO"),
        }
    }
}

// ── Board ─────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::{init_board, Board};

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;
    use log::info;

    use super::HwInitError;
    use crate::config::SystemConfig;
    use crate::pins;

    /// Owned drivers for everything the firmware touches.
    pub struct Board {
        pub i2c: I2cDriver<'static>,
        pub buzzer: PinDriver<'static, AnyOutputPin, Output>,
    }

    pub fn init_board(config: &SystemConfig) -> Result<Board, HwInitError> {
        let peripherals = Peripherals::take().map_err(|_| HwInitError::PeripheralsTaken)?;

        // GPIO4 / GPIO6 / GPIO7 must match `pins`.
        let i2c_config = I2cConfig::new().baudrate(Hertz(config.i2c_frequency_hz));
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio4,
            peripherals.pins.gpio6,
            &i2c_config,
        )
        .map_err(|e| HwInitError::I2cInitFailed(e.code()))?;
        info!(
            "hw_init: I2C{} SDA=GPIO{} SCL=GPIO{} @ {} Hz",
            pins::I2C_PORT,
            pins::I2C_SDA_GPIO,
            pins::I2C_SCL_GPIO,
            config.i2c_frequency_hz
        );

        let mut buzzer = PinDriver::output(peripherals.pins.gpio7.downgrade_output())
            .map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        buzzer
            .set_low()
            .map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        info!("hw_init: buzzer on GPIO{}", pins::BUZZER_GPIO);

        Ok(Board { i2c, buzzer })
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn init_board(config: &SystemConfig) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): I2C @ {} Hz, buzzer GPIO{}; peripheral init skipped",
        config.i2c_frequency_hz,
        pins::BUZZER_GPIO
    );
    Ok(())
}
