//! Angular-rate threshold policy.
//!
//! Axes are checked in X, Y, Z order and the first one whose magnitude is
//! strictly greater than the threshold wins.  There is no ranking by
//! magnitude across axes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// First axis whose raw rate exceeds `threshold`, with its value.
pub fn first_axis_over(gyro: [i16; 3], threshold: u16) -> Option<(Axis, i16)> {
    Axis::ALL
        .into_iter()
        .zip(gyro)
        // unsigned_abs: i16::MIN has no positive i16 counterpart.
        .find(|&(_, value)| value.unsigned_abs() > threshold)
}
