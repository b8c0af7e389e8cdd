//! Alert output drivers and hardware initialisation.

pub mod alert;
pub mod buzzer;
pub mod hw_init;
