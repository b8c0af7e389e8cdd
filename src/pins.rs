//! GPIO / peripheral pin assignments for the MotionAlert board.
//!
//! The HAL hands out GPIOs as typed singletons, so `hw_init` claims them by
//! field name; these numbers are what it logs and must stay in step with it.

// ---------------------------------------------------------------------------
// I²C bus (ICM-42670-P motion sensor)
// ---------------------------------------------------------------------------

/// I2C controller used for the sensor bus.
pub const I2C_PORT: u8 = 0;
/// Serial data line.
pub const I2C_SDA_GPIO: i32 = 4;
/// Serial clock line.
pub const I2C_SCL_GPIO: i32 = 6;

/// ICM-42670-P address with AD0 tied low.
pub const ICM42670_I2C_ADDR: u8 = 0x68;
/// ICM-42670-P address with AD0 tied high.
pub const ICM42670_I2C_ADDR_ALT: u8 = 0x69;

// ---------------------------------------------------------------------------
// Alert output
// ---------------------------------------------------------------------------

/// Digital output driving the piezo buzzer (active HIGH).
pub const BUZZER_GPIO: i32 = 7;
