//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to               |
//! |------------|---------------------|---------------------------|
//! | `esp_i2c`  | RegisterTransport   | ESP-IDF I2C master driver |
//! | `log_sink` | EventSink           | Serial log output         |
//! | `time`     | MonotonicClock      | ESP32 system timer        |
//! |            | DelayNs             | FreeRTOS / thread sleep   |
//!
//! The embedded-hal flavoured transport lives with the sensor in
//! [`crate::sensors::register_bus`].

pub mod esp_i2c;
pub mod log_sink;
pub mod time;
