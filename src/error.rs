//! Error type for panel configuration and the window host.
//!
//! The gesture and animation core never fails: out-of-range input is clamped.
//! Everything here is raised either while validating a `ClimateConfig` or
//! while bringing up the window.

use std::io;
use std::path::PathBuf;

/// Result type alias using ClimateError
pub type Result<T> = std::result::Result<T, ClimateError>;

#[derive(thiserror::Error, Debug)]
pub enum ClimateError {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid value range [{min}, {max}]: min must be finite and below max")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid step count {0}: a stepped slider needs at least 2 steps")]
    InvalidStepCount(usize),

    #[error("Invalid guard band width {0}: must be finite, non-negative and under half the range")]
    InvalidGuardBand(f64),

    #[error("Invalid spring profile '{name}': stiffness {stiffness}, damping ratio {damping_ratio}")]
    InvalidSpring {
        name: &'static str,
        stiffness: f64,
        damping_ratio: f64,
    },

    #[error("Invalid dial sweep: buffer {buffer_degrees} deg and gap {gap_degrees} deg leave no arc")]
    InvalidSweep {
        buffer_degrees: f64,
        gap_degrees: f64,
    },

    #[error("Invalid {field}: {value} is outside [{min}, {max}]")]
    InvalidInitialValue {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    // ============================================================================
    // Font Errors
    // ============================================================================
    #[error("Failed to read font {path}: {source}")]
    FontRead { path: PathBuf, source: io::Error },

    #[error("Font {0} could not be parsed")]
    FontParse(PathBuf),

    // ============================================================================
    // Window Host Errors
    // ============================================================================
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Pixel buffer error: {0}")]
    Pixels(#[from] pixels::Error),
}
