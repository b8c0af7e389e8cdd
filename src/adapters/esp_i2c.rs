//! Register transport over the ESP-IDF I2C master driver.
//!
//! Unlike the generic embedded-hal path, the IDF driver reports a distinct
//! error code when the bus transaction times out, so all three transport
//! failure kinds are distinguishable here.

use crate::error::TransportError;

/// `ESP_FAIL`: the IDF I2C driver returns this when the address is not acknowledged.
const ESP_FAIL: i32 = -1;
/// `ESP_ERR_TIMEOUT`: bus busy or clock stretched past the transaction timeout.
const ESP_ERR_TIMEOUT: i32 = 0x107;

/// Map an `esp_err_t` from an I2C transaction onto the transport taxonomy.
pub fn classify_esp_err(code: i32) -> TransportError {
    match code {
        ESP_ERR_TIMEOUT => TransportError::Timeout,
        ESP_FAIL => TransportError::Nack,
        _ => TransportError::BusError,
    }
}

#[cfg(target_os = "espidf")]
pub use esp_impl::EspRegisterBus;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use esp_idf_hal::delay::TickType;
    use esp_idf_hal::i2c::I2cDriver;
    use esp_idf_svc::sys::TickType_t;

    use super::classify_esp_err;
    use crate::app::ports::RegisterTransport;
    use crate::error::TransportError;

    /// One addressed device on an IDF I2C master port.
    pub struct EspRegisterBus {
        driver: I2cDriver<'static>,
        address: u8,
        timeout: TickType_t,
    }

    impl EspRegisterBus {
        pub fn new(driver: I2cDriver<'static>, address: u8, timeout_ms: u32) -> Self {
            Self {
                driver,
                address,
                timeout: TickType::new_millis(u64::from(timeout_ms)).ticks(),
            }
        }

        /// Returns the IDF driver; dropping it deletes the I2C driver instance.
        pub fn release(self) -> I2cDriver<'static> {
            self.driver
        }
    }

    impl RegisterTransport for EspRegisterBus {
        fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), TransportError> {
            self.driver
                .write_read(self.address, &[reg], buf, self.timeout)
                .map_err(|e| classify_esp_err(e.code()))
        }

        fn write(&mut self, reg: u8, value: u8) -> Result<(), TransportError> {
            self.driver
                .write(self.address, &[reg, value], self.timeout)
                .map_err(|e| classify_esp_err(e.code()))
        }
    }
}
