//! Panel state: the dial, the fan slider and the toggle buttons.

use tracing::{debug, trace};

use crate::dial::TemperatureDial;
use crate::layout::HitTarget;
use crate::slider::FanSlider;
use crate::spring::{AnimatedProgress, SpringProfile};
use crate::ClimateCommand;

/// Scale of a toggle button while the pointer holds it down.
pub const PRESSED_SCALE: f64 = 0.95;

// ============================================================================
// TOGGLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateToggle {
    AirConditioning,
    Auto,
    Dry,
    Cool,
    Program,
}

impl ClimateToggle {
    pub const ALL: [ClimateToggle; 5] = [
        ClimateToggle::AirConditioning,
        ClimateToggle::Auto,
        ClimateToggle::Dry,
        ClimateToggle::Cool,
        ClimateToggle::Program,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClimateToggle::AirConditioning => "A/C",
            ClimateToggle::Auto => "Auto",
            ClimateToggle::Dry => "Dry",
            ClimateToggle::Cool => "Cool",
            ClimateToggle::Program => "Program",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// On/off flags for every toggle, each with a press-scale animation.
#[derive(Debug, Clone)]
pub struct ClimateToggles {
    enabled: [bool; 5],
    press: [AnimatedProgress; 5],
}

impl ClimateToggles {
    pub fn new(press_profile: SpringProfile) -> Self {
        let spring = AnimatedProgress::new(1.0, press_profile, press_profile);
        Self {
            enabled: [true; 5],
            press: std::array::from_fn(|_| spring.clone()),
        }
    }

    pub fn is_enabled(&self, toggle: ClimateToggle) -> bool {
        self.enabled[toggle.index()]
    }

    pub fn set(&mut self, toggle: ClimateToggle, on: bool) {
        self.enabled[toggle.index()] = on;
    }

    /// Flip a toggle and return its new state.
    pub fn toggle(&mut self, toggle: ClimateToggle) -> bool {
        let slot = &mut self.enabled[toggle.index()];
        *slot = !*slot;
        debug!(toggle = toggle.label(), enabled = *slot, "toggle flipped");
        *slot
    }

    pub fn press(&mut self, toggle: ClimateToggle) {
        self.press[toggle.index()].set_target(PRESSED_SCALE);
    }

    pub fn release(&mut self, toggle: ClimateToggle) {
        self.press[toggle.index()].set_target(1.0);
    }

    pub fn scale(&self, toggle: ClimateToggle) -> f64 {
        self.press[toggle.index()].current()
    }

    pub fn status_line(&self) -> &'static str {
        if self.is_enabled(ClimateToggle::AirConditioning) {
            "A/C is ON"
        } else {
            "A/C is OFF"
        }
    }

    pub fn on_frame_tick(&mut self, dt: f64) -> bool {
        self.press
            .iter_mut()
            .fold(false, |moving, spring| spring.tick(dt, false) || moving)
    }

    pub fn is_animating(&self) -> bool {
        self.press.iter().any(|spring| !spring.is_settled())
    }
}

// ============================================================================
// CONTROLS
// ============================================================================

/// Everything the panel keeps in memory, driven by host events.
///
/// Only one control is grabbed at a time; whichever [`HitTarget`] received
/// the pointer-down owns the gesture until pointer-up or cancel.
#[derive(Debug, Clone)]
pub struct ClimateControls {
    dial: TemperatureDial,
    fan: FanSlider,
    toggles: ClimateToggles,
    grabbed: Option<HitTarget>,
}

impl ClimateControls {
    pub fn new(dial: TemperatureDial, fan: FanSlider, toggles: ClimateToggles) -> Self {
        Self {
            dial,
            fan,
            toggles,
            grabbed: None,
        }
    }

    pub fn dial(&self) -> &TemperatureDial {
        &self.dial
    }

    pub fn fan(&self) -> &FanSlider {
        &self.fan
    }

    pub fn fan_mut(&mut self) -> &mut FanSlider {
        &mut self.fan
    }

    pub fn toggles(&self) -> &ClimateToggles {
        &self.toggles
    }

    pub fn grabbed(&self) -> Option<HitTarget> {
        self.grabbed
    }

    pub fn pointer_down(&mut self, target: HitTarget) {
        if self.grabbed.is_some() {
            return;
        }
        match target {
            HitTarget::Dial => self.dial.on_drag_start(),
            HitTarget::FanTrack => self.fan.on_drag_start(),
            HitTarget::Toggle(toggle) => self.toggles.press(toggle),
        }
        self.grabbed = Some(target);
    }

    /// Pointer offset from the dial centre while the dial is grabbed.
    pub fn drag_dial(&mut self, dx: f64, dy: f64) {
        if self.grabbed == Some(HitTarget::Dial) {
            self.dial.on_drag_move(dx, dy);
        }
    }

    /// Horizontal pointer delta while the fan track is grabbed.
    pub fn drag_fan(&mut self, delta: f64) {
        if self.grabbed == Some(HitTarget::FanTrack) {
            self.fan.on_drag_move(delta);
        }
    }

    /// Release the grabbed control. A toggle flips only when the pointer is
    /// lifted over the same button it went down on.
    pub fn pointer_up(&mut self, fan_velocity: f64, over: Option<HitTarget>) {
        let Some(target) = self.grabbed.take() else {
            return;
        };
        match target {
            HitTarget::Dial => self.dial.on_drag_end(),
            HitTarget::FanTrack => self.fan.on_drag_end(fan_velocity),
            HitTarget::Toggle(toggle) => {
                self.toggles.release(toggle);
                if over == Some(target) {
                    self.toggles.toggle(toggle);
                }
            }
        }
    }

    /// Abandon the gesture, e.g. when the cursor leaves the window.
    pub fn cancel(&mut self) {
        self.pointer_up(0.0, None);
    }

    pub fn apply(&mut self, command: ClimateCommand) {
        trace!(?command, "applying command");
        match command {
            ClimateCommand::SetTemperature(value) => self.dial.set_temperature(value),
            ClimateCommand::SetFanStep(step) => self.fan.set_step(step),
            ClimateCommand::Toggle(toggle) => {
                self.toggles.toggle(toggle);
            }
            ClimateCommand::SetToggle(toggle, on) => self.toggles.set(toggle, on),
        }
    }

    /// Advance every animation by `dt` seconds. Returns `true` while
    /// anything is still moving.
    pub fn on_frame_tick(&mut self, dt: f64) -> bool {
        let dial = self.dial.on_frame_tick(dt);
        let fan = self.fan.on_frame_tick(dt);
        let toggles = self.toggles.on_frame_tick(dt);
        dial || fan || toggles
    }

    pub fn is_animating(&self) -> bool {
        self.dial.is_animating() || self.fan.is_animating() || self.toggles.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dial::{AngularGestureMapper, GuardedValueUpdater};
    use crate::range::ValueRange;
    use crate::slider::{LinearGestureMapper, TrackGeometry};

    fn controls() -> ClimateControls {
        let range = ValueRange::new(40.0, 90.0).unwrap();
        let dial = TemperatureDial::new(
            range,
            AngularGestureMapper::new(13.0, 5.0).unwrap(),
            GuardedValueUpdater::new(range, 15.0).unwrap(),
            74.0,
            SpringProfile::SETTLED,
            SpringProfile::DRAGGING,
        );
        let fan = FanSlider::new(
            LinearGestureMapper::new(5).unwrap(),
            TrackGeometry {
                width: 236.0,
                inset: 4.0,
                handle_diameter: 28.0,
            },
            0.5,
            SpringProfile::SETTLED,
            SpringProfile::DRAGGING,
        );
        ClimateControls::new(dial, fan, ClimateToggles::new(SpringProfile::PRESS))
    }

    #[test]
    fn toggles_start_enabled_and_flip() {
        let mut toggles = ClimateToggles::new(SpringProfile::PRESS);
        assert!(ClimateToggle::ALL.iter().all(|&t| toggles.is_enabled(t)));
        assert_eq!(toggles.status_line(), "A/C is ON");
        assert!(!toggles.toggle(ClimateToggle::AirConditioning));
        assert_eq!(toggles.status_line(), "A/C is OFF");
        assert!(toggles.is_enabled(ClimateToggle::Dry));
    }

    #[test]
    fn press_animation_shrinks_then_recovers() {
        let mut toggles = ClimateToggles::new(SpringProfile::PRESS);
        toggles.press(ClimateToggle::Cool);
        toggles.on_frame_tick(0.05);
        assert!(toggles.scale(ClimateToggle::Cool) < 1.0);
        assert_eq!(toggles.scale(ClimateToggle::Auto), 1.0);
        toggles.release(ClimateToggle::Cool);
        for _ in 0..240 {
            toggles.on_frame_tick(1.0 / 60.0);
        }
        assert!(!toggles.is_animating());
        assert_eq!(toggles.scale(ClimateToggle::Cool), 1.0);
    }

    #[test]
    fn click_flips_only_when_released_over_button() {
        let mut c = controls();
        let dry = HitTarget::Toggle(ClimateToggle::Dry);
        c.pointer_down(dry);
        c.pointer_up(0.0, Some(dry));
        assert!(!c.toggles().is_enabled(ClimateToggle::Dry));

        c.pointer_down(dry);
        c.pointer_up(0.0, Some(HitTarget::Dial));
        assert!(!c.toggles().is_enabled(ClimateToggle::Dry));
    }

    #[test]
    fn drags_route_to_grabbed_control_only() {
        let mut c = controls();
        c.pointer_down(HitTarget::FanTrack);
        c.drag_dial(0.0, -100.0);
        assert_eq!(c.dial().temperature(), 74.0);
        c.drag_fan(-16.0);
        c.pointer_up(-50.0, Some(HitTarget::FanTrack));
        assert!((c.fan().target_progress() - 0.25).abs() < 1e-12);
        assert_eq!(c.grabbed(), None);
    }

    #[test]
    fn second_pointer_down_is_ignored_while_grabbed() {
        let mut c = controls();
        c.pointer_down(HitTarget::Dial);
        c.pointer_down(HitTarget::FanTrack);
        assert_eq!(c.grabbed(), Some(HitTarget::Dial));
        assert!(c.dial().is_dragging());
        assert!(!c.fan().is_dragging());
        c.cancel();
        assert!(!c.dial().is_dragging());
    }

    #[test]
    fn commands_update_state() {
        let mut c = controls();
        c.apply(ClimateCommand::SetTemperature(60.0));
        c.apply(ClimateCommand::SetFanStep(4));
        c.apply(ClimateCommand::Toggle(ClimateToggle::Program));
        c.apply(ClimateCommand::SetToggle(ClimateToggle::Auto, false));
        assert_eq!(c.dial().temperature(), 60.0);
        assert_eq!(c.fan().step(), 4);
        assert!(!c.toggles().is_enabled(ClimateToggle::Program));
        assert!(!c.toggles().is_enabled(ClimateToggle::Auto));
        assert!(c.is_animating());
        while c.on_frame_tick(1.0 / 60.0) {}
        assert!(!c.is_animating());
    }
}
