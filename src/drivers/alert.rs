//! Audible alert pattern engine.
//!
//! Produces a square wave on the buzzer for a bounded time after each
//! trigger.  The scheduler calls `tick()` on every loop iteration, whether
//! or not a sample was taken, so the tone is independent of the sampling
//! period.
//!
//! ```text
//!  trigger(t0)                                  t0 + duration
//!      │                                              │
//!      ▼  ┌──┐  ┌──┐  ┌──┐  ┌──┐        ┌──┐  ┌──┐  ▼
//!  ───────┘  └──┘  └──┘  └──┘  └── ··· ─┘  └──┘  └─────── (Idle)
//!      │◀▶│
//!   toggle interval
//! ```
//!
//! Pure state machine: no pin access, the caller applies the returned level.

use crate::config::SystemConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Idle,
    Active {
        /// When the current alert window opened.
        start_us: u64,
        /// When the level last flipped.
        last_toggle_us: u64,
        /// Current output level.
        level: bool,
    },
}

pub struct AlertActuator {
    state: AlertState,
    duration_us: u64,
    toggle_interval_us: u64,
}

impl AlertActuator {
    pub fn new(duration_us: u32, toggle_interval_us: u32) -> Self {
        Self {
            state: AlertState::Idle,
            duration_us: u64::from(duration_us),
            toggle_interval_us: u64::from(toggle_interval_us),
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.alert_duration_us, config.toggle_interval_us)
    }

    /// Start the alert, or restart its window if already sounding.
    /// The level starts low; the first edge comes one toggle interval later.
    pub fn trigger(&mut self, now_us: u64) {
        self.state = AlertState::Active {
            start_us: now_us,
            last_toggle_us: now_us,
            level: false,
        };
    }

    /// Silence immediately.
    pub fn stop(&mut self) {
        self.state = AlertState::Idle;
    }

    /// Advance the pattern and return the level the pin should have.
    pub fn tick(&mut self, now_us: u64) -> bool {
        let AlertState::Active { start_us, last_toggle_us, level } = &mut self.state else {
            return false;
        };

        if now_us.wrapping_sub(*start_us) >= self.duration_us {
            self.state = AlertState::Idle;
            return false;
        }

        if now_us.wrapping_sub(*last_toggle_us) >= self.toggle_interval_us {
            *level = !*level;
            *last_toggle_us = now_us;
        }
        *level
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AlertState::Active { .. })
    }
}
