//! Stepped fan-speed slider.

use tracing::debug;

use crate::error::{ClimateError, Result};
use crate::gesture::DragPhase;
use crate::range::clamp_unit;
use crate::spring::{AnimatedProgress, SpringProfile};

/// Products this close to a whole step are treated as sitting on it.
const STEP_SNAP_TOLERANCE: f64 = 1e-9;

// ============================================================================
// TRACK GEOMETRY
// ============================================================================

/// Horizontal track the handle travels along.
///
/// The handle is inset from both ends and is as wide as `handle_diameter`,
/// so its travel is shorter than the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub width: f64,
    pub inset: f64,
    pub handle_diameter: f64,
}

impl TrackGeometry {
    pub fn travel(&self) -> f64 {
        self.width - 2.0 * self.inset - self.handle_diameter
    }

    /// Left edge of the handle for `progress`, relative to the track start.
    pub fn handle_x(&self, progress: f64) -> f64 {
        self.inset + self.travel().max(0.0) * clamp_unit(progress)
    }
}

// ============================================================================
// LINEAR GESTURE MAPPER
// ============================================================================

/// Turns horizontal drag deltas into track progress and snaps on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGestureMapper {
    steps: usize,
}

impl LinearGestureMapper {
    pub fn new(steps: usize) -> Result<Self> {
        if steps < 2 {
            return Err(ClimateError::InvalidStepCount(steps));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    fn intervals(&self) -> f64 {
        (self.steps - 1) as f64
    }

    /// Progress after a drag of `delta` along a track with `travel` length.
    /// A track with no travel leaves progress untouched.
    pub fn drag(&self, progress: f64, delta: f64, travel: f64) -> f64 {
        if travel <= 0.0 || !delta.is_finite() {
            return progress;
        }
        clamp_unit(progress + delta / travel)
    }

    /// Snap to a step in the direction of the throw: up for positive exit
    /// velocity, down otherwise.
    ///
    /// Progress within 1e-9 steps of a step counts as on that step, so
    /// `0.5 + 1e-12` thrown upward stays at 0.5 instead of moving on to the
    /// next step.
    pub fn snap(&self, progress: f64, velocity: f64) -> f64 {
        let intervals = self.intervals();
        let scaled = progress * intervals;
        let nearest = scaled.round();
        let scaled = if (scaled - nearest).abs() < STEP_SNAP_TOLERANCE {
            nearest
        } else {
            scaled
        };
        let step = if velocity > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        };
        clamp_unit(step / intervals)
    }

    /// Zero-based index of the step nearest to `progress`.
    pub fn step_index(&self, progress: f64) -> usize {
        (clamp_unit(progress) * self.intervals()).round() as usize
    }

    pub fn step_progress(&self, index: usize) -> f64 {
        index.min(self.steps - 1) as f64 / self.intervals()
    }
}

// ============================================================================
// FAN SLIDER
// ============================================================================

#[derive(Debug, Clone)]
pub struct FanSlider {
    mapper: LinearGestureMapper,
    track: TrackGeometry,
    target_progress: f64,
    phase: DragPhase,
    animation: AnimatedProgress,
}

impl FanSlider {
    pub fn new(
        mapper: LinearGestureMapper,
        track: TrackGeometry,
        initial_progress: f64,
        settled: SpringProfile,
        dragging: SpringProfile,
    ) -> Self {
        let target_progress = clamp_unit(initial_progress);
        Self {
            mapper,
            track,
            target_progress,
            phase: DragPhase::Idle,
            animation: AnimatedProgress::new(target_progress, settled, dragging),
        }
    }

    pub fn with_settle_epsilon(mut self, epsilon: f64) -> Self {
        self.animation = self.animation.with_epsilon(epsilon);
        self
    }

    pub fn track(&self) -> TrackGeometry {
        self.track
    }

    pub fn steps(&self) -> usize {
        self.mapper.steps()
    }

    pub fn target_progress(&self) -> f64 {
        self.target_progress
    }

    pub fn animated_progress(&self) -> f64 {
        self.animation.current()
    }

    /// Zero-based fan step for the current target.
    pub fn step(&self) -> usize {
        self.mapper.step_index(self.target_progress)
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_dragging()
    }

    pub fn is_animating(&self) -> bool {
        !self.animation.is_settled()
    }

    pub fn set_track_width(&mut self, width: f64) {
        self.track.width = width;
    }

    pub fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    pub fn on_drag_start(&mut self) {
        self.phase.begin();
        debug!(progress = self.target_progress, "fan drag started");
    }

    /// Apply a horizontal drag delta. Ignored outside a drag.
    pub fn on_drag_move(&mut self, delta: f64) {
        if !self.phase.is_dragging() {
            return;
        }
        self.set_target(self.mapper.drag(self.target_progress, delta, self.track.travel()));
    }

    /// Release with exit `velocity`: snap toward the throw and return to idle.
    pub fn on_drag_end(&mut self, velocity: f64) {
        if !self.phase.end(velocity) {
            return;
        }
        if let DragPhase::Releasing { velocity } = self.phase {
            let snapped = self.mapper.snap(self.target_progress, velocity);
            self.set_target(snapped);
            debug!(velocity, progress = snapped, step = self.step() + 1, "fan snapped");
        }
        self.phase.finish();
    }

    pub fn on_frame_tick(&mut self, dt: f64) -> bool {
        self.animation.tick(dt, self.phase.is_dragging())
    }

    /// Programmatic step change (zero-based, clamped to the last step).
    pub fn set_step(&mut self, index: usize) {
        self.set_target(self.mapper.step_progress(index));
    }

    fn set_target(&mut self, progress: f64) {
        self.target_progress = progress;
        self.animation.set_target(progress);
    }
}
