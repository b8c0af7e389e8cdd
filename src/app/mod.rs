//! Application core — pure domain logic, zero I/O.
//!
//! Port traits in [`ports`] are the only way the domain reaches hardware,
//! keeping the threshold policy and the scheduler testable without real
//! peripherals.

pub mod events;
pub mod policy;
pub mod ports;
