//! Drag state machine and exit-velocity estimation shared by the controls.

use std::collections::VecDeque;

/// How far back the velocity tracker looks, in seconds.
const VELOCITY_WINDOW_SECONDS: f64 = 0.1;

/// Phase of a pointer drag.
///
/// `Releasing` is transient: a control enters it on pointer lift, runs its
/// release-time logic and then calls [`DragPhase::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Releasing {
        velocity: f64,
    },
}

impl DragPhase {
    pub fn begin(&mut self) {
        *self = DragPhase::Dragging;
    }

    /// Move to `Releasing`. Returns `false` if no drag was in progress.
    pub fn end(&mut self, velocity: f64) -> bool {
        match self {
            DragPhase::Dragging => {
                *self = DragPhase::Releasing { velocity };
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self) {
        *self = DragPhase::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragPhase::Dragging)
    }
}

/// Estimates pointer velocity along one axis from recent samples.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, f64)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Record position `x` at `time` seconds. Samples must arrive in time order.
    pub fn add_sample(&mut self, time: f64, x: f64) {
        self.samples.push_back((time, x));
        while let Some(&(oldest, _)) = self.samples.front() {
            if time - oldest > VELOCITY_WINDOW_SECONDS {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Units per second over the retained window.
    pub fn velocity(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(&(t0, x0)), Some(&(t1, x1))) if t1 > t0 => (x1 - x0) / (t1 - t0),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_drag_lifecycle() {
        let mut phase = DragPhase::default();
        assert!(!phase.end(1.0));
        assert_eq!(phase, DragPhase::Idle);

        phase.begin();
        assert!(phase.is_dragging());
        assert!(phase.end(-3.0));
        assert_eq!(phase, DragPhase::Releasing { velocity: -3.0 });
        assert!(!phase.is_dragging());

        phase.finish();
        assert_eq!(phase, DragPhase::Idle);
    }

    #[test]
    fn velocity_uses_recent_window_only() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0.0, 0.0);
        tracker.add_sample(0.5, 500.0);
        tracker.add_sample(0.55, 510.0);
        tracker.add_sample(0.6, 520.0);
        assert!((tracker.velocity() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn velocity_needs_two_samples() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
        tracker.add_sample(1.0, 10.0);
        assert_eq!(tracker.velocity(), 0.0);
        tracker.add_sample(1.0, 20.0);
        assert_eq!(tracker.velocity(), 0.0);
        tracker.reset();
        tracker.add_sample(2.0, 0.0);
        tracker.add_sample(2.05, -5.0);
        assert!(tracker.velocity() < 0.0);
    }
}
