//! Where each control sits in the window, and which one a point hits.

use crate::climate::ClimateToggle;
use crate::config::ClimateConfig;

/// Extra vertical reach above and below the fan track for grabbing it.
const TRACK_GRAB_SLOP: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Dial,
    FanTrack,
    Toggle(ClimateToggle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    pub cx: i32,
    pub cy: i32,
    pub r: i32,
    pub thickness: i32,
    pub handle_radius: i32,
}

impl DialLayout {
    /// Radius of the circle the handle centre runs along.
    pub fn handle_track_radius(&self) -> f64 {
        self.r as f64 - self.thickness as f64 / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonLayout {
    pub toggle: ClimateToggle,
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub width: usize,
    pub height: usize,
    pub dial: DialLayout,
    pub status_y: i32,
    pub track: TrackLayout,
    pub step_labels_y: i32,
    pub buttons: Vec<ButtonLayout>,
    pub button_labels_y: i32,
}

impl PanelLayout {
    pub fn new(width: usize, height: usize, config: &ClimateConfig) -> Self {
        let w = width as i32;
        let h = height as i32;

        let dial_cy = h * 27 / 100;
        let dial_r = ((w / 2).min(h / 4) - config.dial_margin).max(config.dial_thickness);
        let dial = DialLayout {
            cx: w / 2,
            cy: dial_cy,
            r: dial_r,
            thickness: config.dial_thickness,
            handle_radius: config.dial_handle_radius,
        };

        let track = TrackLayout {
            x: config.track_margin,
            y: h * 64 / 100,
            width: config.track_width(width) as i32,
            height: config.track_height,
        };

        let count = ClimateToggle::ALL.len() as i32;
        let buttons_cy = h * 85 / 100;
        let buttons = ClimateToggle::ALL
            .iter()
            .enumerate()
            .map(|(i, &toggle)| ButtonLayout {
                toggle,
                cx: (w * (2 * i as i32 + 1)) / (2 * count),
                cy: buttons_cy,
                radius: config.button_radius,
            })
            .collect();

        Self {
            width,
            height,
            dial,
            status_y: dial_cy + dial_r + config.dial_handle_radius + 20,
            track,
            step_labels_y: track.y - 16,
            buttons,
            button_labels_y: buttons_cy + config.button_radius + 16,
        }
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTarget> {
        let dx = x - self.dial.cx as f64;
        let dy = y - self.dial.cy as f64;
        if (dx * dx + dy * dy).sqrt() <= (self.dial.r + self.dial.handle_radius) as f64 {
            return Some(HitTarget::Dial);
        }

        let t = &self.track;
        let in_x = x >= t.x as f64 && x <= (t.x + t.width) as f64;
        let in_y = y >= t.y as f64 - TRACK_GRAB_SLOP && y <= (t.y + t.height) as f64 + TRACK_GRAB_SLOP;
        if in_x && in_y {
            return Some(HitTarget::FanTrack);
        }

        self.buttons
            .iter()
            .find(|b| {
                let bx = x - b.cx as f64;
                let by = y - b.cy as f64;
                (bx * bx + by * by).sqrt() <= b.radius as f64
            })
            .map(|b| HitTarget::Toggle(b.toggle))
    }

    /// Offset of a window point from the dial centre.
    pub fn dial_offset(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.dial.cx as f64, y - self.dial.cy as f64)
    }
}
