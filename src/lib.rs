//! Climate-control panel: a temperature dial, a stepped fan slider and a row
//! of toggle buttons.
//!
//! The gesture and animation core ([`dial`], [`slider`], [`spring`],
//! [`gesture`]) is plain arithmetic and can be driven from any render loop.
//! [`ClimatePanel`] wraps it in a software-rendered window.

// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod climate;
pub mod config;
pub mod dial;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod range;
pub mod render;
pub mod slider;
pub mod spring;

pub use climate::{ClimateControls, ClimateToggle, ClimateToggles};
pub use config::{ClimateConfig, Color};
pub use error::{ClimateError, Result};
pub use layout::{HitTarget, PanelLayout};
pub use range::ValueRange;
pub use spring::{AnimatedProgress, SpringProfile};

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use tracing::{debug, error, info};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::gesture::VelocityTracker;
use crate::render::{build_scene, load_font, Canvas};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for updating the panel from another thread
#[derive(Debug, Clone, PartialEq)]
pub enum ClimateCommand {
    SetTemperature(f64),
    SetFanStep(usize), // zero-based
    Toggle(ClimateToggle),
    SetToggle(ClimateToggle, bool),
}

/// Main panel struct - the primary public interface
///
/// Config lengths are logical pixels. The window is laid out with them
/// multiplied by the display scale factor.
#[derive(Debug, Clone)]
pub struct ClimatePanel {
    config: ClimateConfig,
    controls: ClimateControls,
}

impl ClimatePanel {
    pub fn new(config: ClimateConfig) -> Result<Self> {
        let controls = config.build_controls()?;
        Ok(Self { config, controls })
    }

    pub fn config(&self) -> &ClimateConfig {
        &self.config
    }

    pub fn controls(&self) -> &ClimateControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ClimateControls {
        &mut self.controls
    }

    /// Open the panel window and block until it is closed.
    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    /// Like [`ClimatePanel::show`], applying commands from `receiver` before
    /// every frame.
    pub fn show_with_commands(&mut self, receiver: Receiver<ClimateCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<ClimateCommand>>) -> Result<()> {
        let config = self.config.clone();
        let font = config.font_path.as_deref().map(load_font).transpose()?;
        if font.is_none() {
            info!("no font configured, labels will not be drawn");
        }

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        // The framebuffer is in physical pixels; lay out with lengths to match.
        let mut scaled = config.scaled(window.scale_factor());
        let layout = PanelLayout::new(size.width as usize, size.height as usize, &scaled);
        let mut host = PanelHost::new(self.controls.clone(), layout);
        host.resize(size.width as usize, size.height as usize, &scaled);
        info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            "climate panel opened"
        );

        let window_clone = window.clone();
        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
        let clock = Instant::now();
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();

        let host_ref = &mut host;
        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    scaled = config.scaled(scale_factor);
                    let (width, height) = (host_ref.layout().width, host_ref.layout().height);
                    host_ref.resize(width, height, &scaled);
                }
                WindowEvent::Resized(new_size) => {
                    let _ = pixels.resize_buffer(new_size.width, new_size.height);
                    let _ = pixels.resize_surface(new_size.width, new_size.height);
                    host_ref.resize(new_size.width as usize, new_size.height as usize, &scaled);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    host_ref.cursor_moved(position.x, position.y, clock.elapsed().as_secs_f64());
                }
                WindowEvent::CursorLeft { .. } => {
                    host_ref.cursor_left();
                }
                WindowEvent::Focused(false) => {
                    host_ref.cancel();
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let now = clock.elapsed().as_secs_f64();
                    match state {
                        ElementState::Pressed => host_ref.pressed(now),
                        ElementState::Released => host_ref.released(now),
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Some(ref receiver) = receiver {
                        while let Ok(command) = receiver.try_recv() {
                            host_ref.controls_mut().apply(command);
                        }
                    }
                    let dt = last_tick.elapsed().as_secs_f64();
                    last_tick = Instant::now();
                    host_ref.frame(dt);

                    let scene = build_scene(host_ref.controls(), host_ref.layout(), &scaled);
                    let (width, height) = (host_ref.layout().width, host_ref.layout().height);
                    let mut canvas = Canvas::new(pixels.frame_mut(), width, height);
                    scene.render(&mut canvas, font.as_ref());
                    if let Err(err) = pixels.render() {
                        error!(%err, "failed to present frame");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
                window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
            }
            _ => {}
        })?;

        self.controls = host.into_controls();
        info!("climate panel closed");
        Ok(())
    }
}

// ============================================================================
// INPUT TRANSLATION
// ============================================================================

/// Turns raw window pointer events into control gestures.
///
/// The dial wants the pointer offset from its centre, the fan slider wants
/// horizontal deltas and an exit velocity; this keeps the cursor history
/// needed for both.
#[derive(Debug, Clone)]
pub struct PanelHost {
    controls: ClimateControls,
    layout: PanelLayout,
    cursor: Option<(f64, f64)>,
    velocity: VelocityTracker,
}

impl PanelHost {
    pub fn new(controls: ClimateControls, layout: PanelLayout) -> Self {
        Self {
            controls,
            layout,
            cursor: None,
            velocity: VelocityTracker::new(),
        }
    }

    pub fn controls(&self) -> &ClimateControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ClimateControls {
        &mut self.controls
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn into_controls(self) -> ClimateControls {
        self.controls
    }

    /// Lay the panel out for a `width` x `height` framebuffer. `config`
    /// lengths must already be in the same pixels, see [`ClimateConfig::scaled`].
    pub fn resize(&mut self, width: usize, height: usize, config: &ClimateConfig) {
        self.layout = PanelLayout::new(width, height, config);
        self.controls.fan_mut().set_track(config.track_geometry(width));
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64, time: f64) {
        let previous = self.cursor.replace((x, y));
        match self.controls.grabbed() {
            Some(HitTarget::Dial) => {
                let (dx, dy) = self.layout.dial_offset(x, y);
                self.controls.drag_dial(dx, dy);
            }
            Some(HitTarget::FanTrack) => {
                if let Some((last_x, _)) = previous {
                    self.controls.drag_fan(x - last_x);
                }
                self.velocity.add_sample(time, x);
            }
            _ => {}
        }
    }

    pub fn pressed(&mut self, time: f64) {
        let Some((x, y)) = self.cursor else {
            return;
        };
        let Some(target) = self.layout.hit_test(x, y) else {
            return;
        };
        if target == HitTarget::FanTrack {
            self.velocity.reset();
            self.velocity.add_sample(time, x);
        }
        self.controls.pointer_down(target);
    }

    pub fn released(&mut self, time: f64) {
        let over = self.cursor.and_then(|(x, y)| self.layout.hit_test(x, y));
        if let Some((x, _)) = self.cursor {
            self.velocity.add_sample(time, x);
        }
        let velocity = self.velocity.velocity();
        self.controls.pointer_up(velocity, over);
        self.velocity.reset();
    }

    pub fn cursor_left(&mut self) {
        self.cursor = None;
        self.cancel();
    }

    pub fn cancel(&mut self) {
        if self.controls.grabbed().is_some() {
            debug!("gesture cancelled");
        }
        self.controls.cancel();
        self.velocity.reset();
    }

    pub fn frame(&mut self, dt: f64) -> bool {
        self.controls.on_frame_tick(dt)
    }
}
