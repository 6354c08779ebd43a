//! Closed numeric intervals and the explicit clamp/wrap helpers every
//! control relies on.

use std::f64::consts::TAU;

use crate::error::{ClimateError, Result};

/// A closed interval `[min, max]` with a mapping to and from normalized
/// progress.
///
/// Neither direction of the mapping clamps. Callers that need a bounded
/// result pass it through [`clamp_unit`] or [`ValueRange::clamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ClimateError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn to_progress(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    pub fn from_progress(&self, progress: f64) -> f64 {
        self.min + progress * self.span()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clamp into `[0, 1]`. NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
