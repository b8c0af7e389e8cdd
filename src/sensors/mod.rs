//! Sensor subsystem — the register transport and the IMU driver built on it.

pub mod icm42670;
pub mod register_bus;
