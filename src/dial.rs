//! Circular temperature dial.
//!
//! The dial arc starts at 6 o'clock and sweeps clockwise, stopping short of a
//! full turn. The uncovered wedge at the bottom is a dead zone: dragging into
//! it pins the dial at full rather than wrapping to empty.

use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::error::{ClimateError, Result};
use crate::gesture::DragPhase;
use crate::range::{clamp_unit, wrap_angle, ValueRange};
use crate::spring::{AnimatedProgress, SpringProfile};

// ============================================================================
// ANGULAR GESTURE MAPPER
// ============================================================================

/// Converts a pointer offset from the dial centre into dial progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularGestureMapper {
    sweep_radians: f64,
}

impl AngularGestureMapper {
    /// `stroke_cap_buffer_degrees` is trimmed from both ends of the arc and
    /// `gap_degrees` is left open at the bottom.
    pub fn new(stroke_cap_buffer_degrees: f64, gap_degrees: f64) -> Result<Self> {
        let sweep_degrees = 360.0 - 2.0 * stroke_cap_buffer_degrees - gap_degrees;
        let valid = stroke_cap_buffer_degrees.is_finite()
            && gap_degrees.is_finite()
            && stroke_cap_buffer_degrees >= 0.0
            && gap_degrees >= 0.0
            && sweep_degrees > 0.0;
        if !valid {
            return Err(ClimateError::InvalidSweep {
                buffer_degrees: stroke_cap_buffer_degrees,
                gap_degrees,
            });
        }
        Ok(Self {
            sweep_radians: sweep_degrees.to_radians(),
        })
    }

    pub fn sweep_radians(&self) -> f64 {
        self.sweep_radians
    }

    /// Progress in `[0, 1]` for a pointer at `(dx, dy)` from the centre,
    /// screen coordinates with y pointing down.
    ///
    /// The centre itself counts as angle 0 (3 o'clock). Pointers in the dead
    /// zone just past 6 o'clock map to near-zero progress.
    pub fn progress(&self, dx: f64, dy: f64) -> f64 {
        if !dx.is_finite() || !dy.is_finite() {
            return 0.0;
        }
        let angle = if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            dy.atan2(dx)
        };
        // Rotating by -π/2 is the same turn as +3π/2 but keeps 6 o'clock at exactly 0.
        let theta = wrap_angle(angle - FRAC_PI_2);
        (theta / self.sweep_radians).min(1.0)
    }

    /// Screen angle of the handle for `progress`.
    pub fn handle_angle(&self, progress: f64) -> f64 {
        FRAC_PI_2 + clamp_unit(progress) * self.sweep_radians
    }

    /// Angular length of the filled arc for `progress`.
    pub fn arc_sweep(&self, progress: f64) -> f64 {
        clamp_unit(progress) * self.sweep_radians
    }
}

// ============================================================================
// ANTI-WRAP GUARD
// ============================================================================

/// Refuses updates that would carry the dial across its dead zone in one step.
///
/// This is a heuristic: it compares the current and candidate values against
/// a band at each end of the range rather than tracking the pointer's path.
/// Near the band edge the handle can feel briefly stuck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardedValueUpdater {
    range: ValueRange,
    band: f64,
}

impl GuardedValueUpdater {
    pub fn new(range: ValueRange, band: f64) -> Result<Self> {
        // Overlapping bands would reject every candidate and freeze the dial.
        if !band.is_finite() || band < 0.0 || band * 2.0 >= range.span() {
            return Err(ClimateError::InvalidGuardBand(band));
        }
        Ok(Self { range, band })
    }

    pub fn band(&self) -> f64 {
        self.band
    }

    fn in_low_band(&self, value: f64) -> bool {
        value < self.range.min() + self.band
    }

    fn in_high_band(&self, value: f64) -> bool {
        value > self.range.max() - self.band
    }

    pub fn admits(&self, current: f64, candidate: f64) -> bool {
        let wraps_down = self.in_low_band(candidate) && self.in_high_band(current);
        let wraps_up = self.in_high_band(candidate) && self.in_low_band(current);
        !(wraps_down || wraps_up)
    }

    /// Write `candidate` into `current` unless it would wrap. Returns whether
    /// the value was taken.
    pub fn apply(&self, current: &mut f64, candidate: f64) -> bool {
        if self.admits(*current, candidate) {
            *current = candidate;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// TEMPERATURE DIAL
// ============================================================================

/// Dial state plus its gesture mapping and animation.
#[derive(Debug, Clone)]
pub struct TemperatureDial {
    range: ValueRange,
    mapper: AngularGestureMapper,
    guard: GuardedValueUpdater,
    temperature: f64,
    phase: DragPhase,
    animation: AnimatedProgress,
}

impl TemperatureDial {
    pub fn new(
        range: ValueRange,
        mapper: AngularGestureMapper,
        guard: GuardedValueUpdater,
        initial: f64,
        settled: SpringProfile,
        dragging: SpringProfile,
    ) -> Self {
        let temperature = range.clamp(initial);
        let animation = AnimatedProgress::new(range.to_progress(temperature), settled, dragging);
        Self {
            range,
            mapper,
            guard,
            temperature,
            phase: DragPhase::Idle,
            animation,
        }
    }

    pub fn with_settle_epsilon(mut self, epsilon: f64) -> Self {
        self.animation = self.animation.with_epsilon(epsilon);
        self
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn mapper(&self) -> &AngularGestureMapper {
        &self.mapper
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn progress(&self) -> f64 {
        self.range.to_progress(self.temperature)
    }

    pub fn animated_progress(&self) -> f64 {
        self.animation.current()
    }

    pub fn animated_temperature(&self) -> f64 {
        self.range.from_progress(self.animation.current())
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_dragging()
    }

    pub fn is_animating(&self) -> bool {
        !self.animation.is_settled()
    }

    pub fn on_drag_start(&mut self) {
        self.phase.begin();
        debug!(temperature = self.temperature, "dial drag started");
    }

    /// Feed the pointer offset from the dial centre. Ignored outside a drag.
    pub fn on_drag_move(&mut self, dx: f64, dy: f64) {
        if !self.phase.is_dragging() {
            return;
        }
        let progress = self.mapper.progress(dx, dy);
        let candidate = self.range.from_progress(progress);
        if self.guard.apply(&mut self.temperature, candidate) {
            self.animation.set_target(self.progress());
        }
    }

    pub fn on_drag_end(&mut self) {
        if self.phase.end(0.0) {
            self.phase.finish();
            debug!(temperature = self.temperature, "dial drag ended");
        }
    }

    pub fn on_frame_tick(&mut self, dt: f64) -> bool {
        self.animation.tick(dt, self.phase.is_dragging())
    }

    /// Programmatic update. Clamped to the range; the anti-wrap guard only
    /// applies to gestures.
    pub fn set_temperature(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.temperature = self.range.clamp(value);
        self.animation.set_target(self.progress());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn mapper() -> AngularGestureMapper {
        AngularGestureMapper::new(13.0, 5.0).unwrap()
    }

    fn guard() -> GuardedValueUpdater {
        GuardedValueUpdater::new(ValueRange::new(40.0, 90.0).unwrap(), 15.0).unwrap()
    }

    fn dial(initial: f64) -> TemperatureDial {
        let range = ValueRange::new(40.0, 90.0).unwrap();
        TemperatureDial::new(
            range,
            mapper(),
            guard(),
            initial,
            SpringProfile::SETTLED,
            SpringProfile::DRAGGING,
        )
    }

    #[test]
    fn sweep_leaves_dead_zone() {
        assert!((mapper().sweep_radians() - 329f64.to_radians()).abs() < 1e-12);
        assert!(AngularGestureMapper::new(180.0, 0.0).is_err());
        assert!(AngularGestureMapper::new(-1.0, 5.0).is_err());
    }

    #[test]
    fn cardinal_directions_map_clockwise_from_bottom() {
        let m = mapper();
        let sweep = m.sweep_radians();
        assert!(m.progress(0.0, 10.0).abs() < 1e-12);
        assert!((m.progress(-10.0, 0.0) - FRAC_PI_2 / sweep).abs() < 1e-12);
        assert!((m.progress(0.0, -10.0) - PI / sweep).abs() < 1e-12);
        assert!((m.progress(10.0, 0.0) - 3.0 * FRAC_PI_2 / sweep).abs() < 1e-12);
    }

    #[test]
    fn dead_zone_pins_to_full() {
        let m = mapper();
        // Just left of 6 o'clock, inside the uncovered wedge.
        let angle = FRAC_PI_2 - 10f64.to_radians();
        assert_eq!(m.progress(angle.cos(), angle.sin()), 1.0);
    }

    #[test]
    fn just_past_bottom_is_near_zero() {
        let m = mapper();
        let angle = FRAC_PI_2 + 1f64.to_radians();
        let p = m.progress(angle.cos(), angle.sin());
        assert!(p > 0.0 && p < 0.01);
    }

    #[test]
    fn centre_and_signed_zeros_are_stable() {
        let m = mapper();
        let expected = 3.0 * FRAC_PI_2 / m.sweep_radians();
        assert!((m.progress(0.0, 0.0) - expected).abs() < 1e-12);
        assert_eq!(m.progress(-0.0, 0.0), m.progress(0.0, 0.0));
        assert_eq!(m.progress(-0.0, -0.0), m.progress(0.0, 0.0));
        assert_eq!(m.progress(f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn handle_angle_inverts_progress() {
        let m = mapper();
        for i in 1..=20 {
            let p = i as f64 / 20.0;
            let a = m.handle_angle(p);
            let back = m.progress(a.cos() * 50.0, a.sin() * 50.0);
            assert!((back - p).abs() < 1e-9, "{p} -> {back}");
        }
    }

    #[test]
    fn guard_rejects_wrap_from_top() {
        let g = guard();
        let mut current = 89.0;
        assert!(!g.apply(&mut current, 41.0));
        assert_eq!(current, 89.0);
    }

    #[test]
    fn guard_accepts_from_middle() {
        let g = guard();
        let mut current = 70.0;
        assert!(g.apply(&mut current, 41.0));
        assert_eq!(current, 41.0);
    }

    #[test]
    fn guard_rejects_wrap_from_bottom() {
        let g = guard();
        let mut current = 42.0;
        assert!(!g.apply(&mut current, 88.0));
        assert_eq!(current, 42.0);
        assert!(g.admits(42.0, 60.0));
        assert!(g.admits(88.0, 80.0));
    }

    #[test]
    fn guard_band_must_be_non_negative() {
        let range = ValueRange::new(40.0, 90.0).unwrap();
        assert!(GuardedValueUpdater::new(range, -1.0).is_err());
        assert!(GuardedValueUpdater::new(range, f64::NAN).is_err());
    }

    #[test]
    fn guard_bands_must_not_overlap() {
        let range = ValueRange::new(40.0, 90.0).unwrap();
        assert!(GuardedValueUpdater::new(range, 25.0).is_err());
        assert!(GuardedValueUpdater::new(range, 30.0).is_err());
        assert!(GuardedValueUpdater::new(range, 24.9).is_ok());
        assert!(GuardedValueUpdater::new(range, 0.0).is_ok());
    }

    #[test]
    fn drag_updates_temperature_and_animation_target() {
        let mut d = dial(74.0);
        d.on_drag_start();
        // 12 o'clock
        d.on_drag_move(0.0, -100.0);
        let expected = 40.0 + 50.0 * (PI / d.mapper().sweep_radians());
        assert!((d.temperature() - expected).abs() < 1e-9);
        assert!(d.is_animating());
        d.on_drag_end();
        assert!(!d.is_dragging());
    }

    #[test]
    fn moves_outside_drag_are_ignored() {
        let mut d = dial(74.0);
        d.on_drag_move(0.0, -100.0);
        assert_eq!(d.temperature(), 74.0);
    }

    #[test]
    fn drag_through_dead_zone_does_not_wrap() {
        let mut d = dial(89.0);
        d.on_drag_start();
        // Just past 6 o'clock would read as near-minimum.
        let angle = FRAC_PI_2 + 2f64.to_radians();
        d.on_drag_move(angle.cos() * 80.0, angle.sin() * 80.0);
        assert_eq!(d.temperature(), 89.0);
    }

    #[test]
    fn programmatic_set_clamps_and_bypasses_guard() {
        let mut d = dial(89.0);
        d.set_temperature(41.0);
        assert_eq!(d.temperature(), 41.0);
        d.set_temperature(200.0);
        assert_eq!(d.temperature(), 90.0);
        d.set_temperature(f64::NAN);
        assert_eq!(d.temperature(), 90.0);
    }

    #[test]
    fn animation_converges_on_new_temperature() {
        let mut d = dial(40.0);
        d.set_temperature(90.0);
        for _ in 0..120 {
            d.on_frame_tick(1.0 / 60.0);
        }
        assert!(!d.is_animating());
        assert!((d.animated_temperature() - 90.0).abs() < 1e-9);
    }
}
