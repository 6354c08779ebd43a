//! Panel configuration.
//!
//! [`ClimateConfig`] is built with the `bon` builder; every field has a
//! default matching the stock climate screen. [`ClimateConfig::build_controls`]
//! validates the control parameters and assembles the panel state.

use std::path::PathBuf;

use bon::Builder;

use crate::climate::{ClimateControls, ClimateToggles};
use crate::dial::{AngularGestureMapper, GuardedValueUpdater, TemperatureDial};
use crate::error::{ClimateError, Result};
use crate::range::ValueRange;
use crate::slider::{FanSlider, LinearGestureMapper, TrackGeometry};
use crate::spring::{SpringProfile, DEFAULT_SETTLE_EPSILON};

/// RGB colour for panel elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Builder)]
pub struct ClimateConfig {
    #[builder(default = "Climate".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 420)]
    pub window_width: usize,
    #[builder(default = 640)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Temperature dial
    #[builder(default = (40.0, 90.0))]
    pub temperature_range: (f64, f64),
    #[builder(default = 74.0)]
    pub initial_temperature: f64,
    #[builder(default = 13.0)]
    pub stroke_cap_buffer_degrees: f64,
    #[builder(default = 5.0)]
    pub dial_gap_degrees: f64,
    #[builder(default = 15.0)]
    pub guard_band: f64,
    #[builder(default = 30)]
    pub dial_margin: i32,
    #[builder(default = 36)]
    pub dial_thickness: i32,
    #[builder(default = 18)]
    pub dial_handle_radius: i32,

    // Fan slider
    #[builder(default = 5)]
    pub fan_steps: usize,
    #[builder(default = 0.5)]
    pub initial_fan_progress: f64,
    #[builder(default = 38)]
    pub track_margin: i32,
    #[builder(default = 28)]
    pub track_height: i32,
    #[builder(default = 4.0)]
    pub track_inset: f64,

    // Toggle buttons
    #[builder(default = 28)]
    pub button_radius: i32,

    // Animation
    #[builder(default = SpringProfile::SETTLED)]
    pub settled_spring: SpringProfile,
    #[builder(default = SpringProfile::DRAGGING)]
    pub dragging_spring: SpringProfile,
    #[builder(default = SpringProfile::PRESS)]
    pub press_spring: SpringProfile,
    #[builder(default = DEFAULT_SETTLE_EPSILON)]
    pub settle_epsilon: f64,

    // Text
    pub font_path: Option<PathBuf>,
    #[builder(default = 56.0)]
    pub readout_font_size: f32,
    #[builder(default = 20.0)]
    pub label_font_size: f32,

    // Colors
    #[builder(default = Color::new(0x29, 0x2d, 0x32))]
    pub background_color: Color,
    #[builder(default = Color::new(0x14, 0x15, 0x16))]
    pub track_color: Color,
    #[builder(default = Color::new(0x11, 0xa8, 0xfd))]
    pub accent_color: Color,
    #[builder(default = Color::new(0x2e, 0x32, 0x36))]
    pub handle_color: Color,
    #[builder(default = Color::new(0x1c, 0x1f, 0x22))]
    pub inactive_color: Color,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub text_color: Color,
    #[builder(default = Color::new(0x7f, 0x84, 0x89))]
    pub muted_text_color: Color,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClimateConfig {
    pub fn temperature_range(&self) -> Result<ValueRange> {
        let (min, max) = self.temperature_range;
        ValueRange::new(min, max)
    }

    /// Width of the fan track for a window `window_width` pixels wide.
    pub fn track_width(&self, window_width: usize) -> f64 {
        (window_width as f64 - 2.0 * self.track_margin as f64).max(0.0)
    }

    pub fn track_geometry(&self, window_width: usize) -> TrackGeometry {
        TrackGeometry {
            width: self.track_width(window_width),
            inset: self.track_inset,
            handle_diameter: self.track_height as f64,
        }
    }

    /// Copy with every pixel length multiplied by `factor`, for laying the
    /// panel out on a display with that many physical pixels per logical one.
    pub fn scaled(&self, factor: f64) -> ClimateConfig {
        if !factor.is_finite() || factor <= 0.0 || factor == 1.0 {
            return self.clone();
        }
        let px = |v: i32| (v as f64 * factor).round() as i32;
        ClimateConfig {
            dial_margin: px(self.dial_margin),
            dial_thickness: px(self.dial_thickness),
            dial_handle_radius: px(self.dial_handle_radius),
            track_margin: px(self.track_margin),
            track_height: px(self.track_height),
            track_inset: self.track_inset * factor,
            button_radius: px(self.button_radius),
            readout_font_size: self.readout_font_size * factor as f32,
            label_font_size: self.label_font_size * factor as f32,
            ..self.clone()
        }
    }

    /// Validate the control parameters and build the panel state.
    pub fn build_controls(&self) -> Result<ClimateControls> {
        let range = self.temperature_range()?;
        if !range.contains(self.initial_temperature) {
            return Err(ClimateError::InvalidInitialValue {
                field: "initial temperature",
                value: self.initial_temperature,
                min: range.min(),
                max: range.max(),
            });
        }
        if !(0.0..=1.0).contains(&self.initial_fan_progress) {
            return Err(ClimateError::InvalidInitialValue {
                field: "initial fan progress",
                value: self.initial_fan_progress,
                min: 0.0,
                max: 1.0,
            });
        }
        self.settled_spring.validate("settled")?;
        self.dragging_spring.validate("dragging")?;
        self.press_spring.validate("press")?;

        let mapper = AngularGestureMapper::new(self.stroke_cap_buffer_degrees, self.dial_gap_degrees)?;
        let guard = GuardedValueUpdater::new(range, self.guard_band)?;
        let dial = TemperatureDial::new(
            range,
            mapper,
            guard,
            self.initial_temperature,
            self.settled_spring,
            self.dragging_spring,
        )
        .with_settle_epsilon(self.settle_epsilon);

        let fan = FanSlider::new(
            LinearGestureMapper::new(self.fan_steps)?,
            self.track_geometry(self.window_width),
            self.initial_fan_progress,
            self.settled_spring,
            self.dragging_spring,
        )
        .with_settle_epsilon(self.settle_epsilon);

        Ok(ClimateControls::new(
            dial,
            fan,
            ClimateToggles::new(self.press_spring),
        ))
    }
}
