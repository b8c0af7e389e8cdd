//! System configuration parameters
//!
//! All tunable parameters for the MotionAlert system.  Defaults match the
//! reference board; a JSON override can be baked in at build time through
//! the `MOTION_ALERT_CONFIG` environment variable.

use core::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::pins;

/// Shortest settle interval the sensor datasheet allows after a power-mode change.
pub const MIN_SETTLE_MS: u32 = 10;

/// What the scheduler does when a motion read fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Any read failure stops the loop.
    Abort,
    /// Retry transient failures with backoff, then skip the period.
    Retry,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Bus ---
    /// 7-bit I2C address of the sensor
    pub i2c_address: u8,
    /// I2C clock rate (Hz)
    pub i2c_frequency_hz: u32,
    /// Upper bound on one register transaction (milliseconds)
    pub transaction_timeout_ms: u32,

    // --- Sensor ---
    /// Wait after waking the sensor before the first read is trusted (milliseconds)
    pub settle_ms: u32,
    /// Interval between motion reads (microseconds)
    pub sample_period_us: u32,
    /// Raw angular-rate magnitude that must be exceeded to raise the alert
    pub gyro_threshold: u16,

    // --- Alert ---
    /// How long one alert sounds (microseconds)
    pub alert_duration_us: u32,
    /// Half-period of the alert tone (microseconds)
    pub toggle_interval_us: u32,

    // --- Loop ---
    /// Cooperative yield at the end of each loop iteration (microseconds)
    pub loop_yield_us: u32,
    /// Reaction to failed motion reads
    pub read_failure_policy: ReadFailurePolicy,
    /// Transient failures retried per sampling period before it is skipped
    pub max_read_retries: u8,
    /// First retry delay; doubles on every further attempt (microseconds)
    pub retry_backoff_us: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Bus
            i2c_address: pins::ICM42670_I2C_ADDR,
            i2c_frequency_hz: 400_000,
            transaction_timeout_ms: 1000,

            // Sensor
            settle_ms: MIN_SETTLE_MS,
            sample_period_us: 20_000, // 50 Hz
            gyro_threshold: 2000,

            // Alert
            alert_duration_us: 100_000, // 100 ms
            toggle_interval_us: 500,    // ~1 kHz tone

            // Loop
            loop_yield_us: 1000,
            read_failure_policy: ReadFailurePolicy::Retry,
            max_read_retries: 3,
            retry_backoff_us: 2000,
        }
    }
}

/// Errors from loading or validating a [`SystemConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The override text is not valid JSON for this schema.
    Malformed,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config override is malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl SystemConfig {
    /// Reject values that would break the bus or the timing model.
    /// Invalid ranges are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i2c_address > 0x7F {
            return Err(ConfigError::ValidationFailed("i2c_address must be 7-bit"));
        }
        if self.i2c_frequency_hz == 0 || self.i2c_frequency_hz > 1_000_000 {
            return Err(ConfigError::ValidationFailed(
                "i2c_frequency_hz must be within 1..=1_000_000",
            ));
        }
        if self.transaction_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("transaction_timeout_ms must be > 0"));
        }
        if self.settle_ms < MIN_SETTLE_MS {
            return Err(ConfigError::ValidationFailed("settle_ms must be >= 10"));
        }
        if self.sample_period_us == 0 {
            return Err(ConfigError::ValidationFailed("sample_period_us must be > 0"));
        }
        if self.gyro_threshold == 0 {
            return Err(ConfigError::ValidationFailed("gyro_threshold must be > 0"));
        }
        if self.toggle_interval_us == 0 {
            return Err(ConfigError::ValidationFailed("toggle_interval_us must be > 0"));
        }
        if self.alert_duration_us < self.toggle_interval_us {
            return Err(ConfigError::ValidationFailed(
                "alert_duration_us must cover at least one toggle interval",
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the effective configuration: the build-time override when one
    /// is present and valid, the defaults otherwise.
    pub fn load() -> Self {
        match option_env!("MOTION_ALERT_CONFIG") {
            Some(text) => match Self::from_json(text) {
                Ok(config) => {
                    info!("Config: build-time override applied");
                    config
                }
                Err(e) => {
                    warn!("Config: override rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
