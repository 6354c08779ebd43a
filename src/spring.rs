//! Damped-spring animation.
//!
//! [`spring_step`] advances a unit-mass spring by an exact closed-form
//! solution, so a frame of 16 ms and sixteen frames of 1 ms land in the same
//! place. [`AnimatedProgress`] wraps it into a follower that chases a target
//! value and goes quiet once it has settled.

use crate::error::{ClimateError, Result};

/// Longest span a single tick will simulate, in seconds.
const MAX_TICK_SECONDS: f64 = 0.25;

/// Default distance and speed below which a follower counts as settled.
pub const DEFAULT_SETTLE_EPSILON: f64 = 0.001;

/// Stiffness and damping ratio of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringProfile {
    pub stiffness: f64,
    pub damping_ratio: f64,
}

impl SpringProfile {
    /// Profile used when the owning control is at rest.
    pub const SETTLED: SpringProfile = SpringProfile::new(1500.0, 1.0);
    /// Snappier profile used while the pointer is down.
    pub const DRAGGING: SpringProfile = SpringProfile::new(10_000.0, 1.0);
    /// Bouncy profile for button press feedback.
    pub const PRESS: SpringProfile = SpringProfile::new(400.0, 0.4);

    pub const fn new(stiffness: f64, damping_ratio: f64) -> Self {
        Self {
            stiffness,
            damping_ratio,
        }
    }

    pub fn validate(&self, name: &'static str) -> Result<()> {
        let ok = self.stiffness.is_finite()
            && self.stiffness > 0.0
            && self.damping_ratio.is_finite()
            && self.damping_ratio > 0.0;
        if ok {
            Ok(())
        } else {
            Err(ClimateError::InvalidSpring {
                name,
                stiffness: self.stiffness,
                damping_ratio: self.damping_ratio,
            })
        }
    }
}

/// Advance a unit-mass spring by `dt` seconds.
///
/// Returns the new `(position, velocity)`. The solution is exact for the
/// under-, critically- and over-damped cases.
pub fn spring_step(
    current: f64,
    velocity: f64,
    target: f64,
    dt: f64,
    profile: SpringProfile,
) -> (f64, f64) {
    let omega = profile.stiffness.sqrt();
    let zeta = profile.damping_ratio;
    let x0 = current - target;
    let v0 = velocity;

    let (x, v) = if (zeta - 1.0).abs() < 1e-9 {
        let a = x0;
        let b = v0 + omega * x0;
        let decay = (-omega * dt).exp();
        let x = (a + b * dt) * decay;
        let v = b * decay - omega * x;
        (x, v)
    } else if zeta < 1.0 {
        let damped = omega * (1.0 - zeta * zeta).sqrt();
        let cos_coeff = x0;
        let sin_coeff = (zeta * omega * x0 + v0) / damped;
        let decay = (-zeta * omega * dt).exp();
        let (sin, cos) = (damped * dt).sin_cos();
        let x = decay * (cos_coeff * cos + sin_coeff * sin);
        let v = -zeta * omega * x + decay * damped * (sin_coeff * cos - cos_coeff * sin);
        (x, v)
    } else {
        let root = omega * (zeta * zeta - 1.0).sqrt();
        let gamma_plus = -zeta * omega + root;
        let gamma_minus = -zeta * omega - root;
        let coeff_b = (gamma_minus * x0 - v0) / (gamma_minus - gamma_plus);
        let coeff_a = x0 - coeff_b;
        let e_minus = (gamma_minus * dt).exp();
        let e_plus = (gamma_plus * dt).exp();
        let x = coeff_a * e_minus + coeff_b * e_plus;
        let v = coeff_a * gamma_minus * e_minus + coeff_b * gamma_plus * e_plus;
        (x, v)
    };

    (target + x, v)
}

/// A spring-damped follower of a target scalar.
#[derive(Debug, Clone)]
pub struct AnimatedProgress {
    current: f64,
    target: f64,
    velocity: f64,
    settled: bool,
    settled_profile: SpringProfile,
    dragging_profile: SpringProfile,
    epsilon: f64,
}

impl AnimatedProgress {
    pub fn new(initial: f64, settled_profile: SpringProfile, dragging_profile: SpringProfile) -> Self {
        Self {
            current: initial,
            target: initial,
            velocity: 0.0,
            settled: true,
            settled_profile,
            dragging_profile,
            epsilon: DEFAULT_SETTLE_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn set_target(&mut self, target: f64) {
        if target != self.target {
            self.target = target;
            self.settled = false;
        }
    }

    /// Jump straight to `value` with no animation.
    pub fn snap_to(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Advance one frame. Returns `true` while the follower is still moving.
    pub fn tick(&mut self, dt: f64, dragging: bool) -> bool {
        if self.settled || !dt.is_finite() || dt <= 0.0 {
            return !self.settled;
        }
        let profile = if dragging {
            self.dragging_profile
        } else {
            self.settled_profile
        };
        let (current, velocity) = spring_step(
            self.current,
            self.velocity,
            self.target,
            dt.min(MAX_TICK_SECONDS),
            profile,
        );
        self.current = current;
        self.velocity = velocity;

        if (self.target - self.current).abs() < self.epsilon && self.velocity.abs() < self.epsilon {
            self.current = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
        !self.settled
    }
}
