//! Software rendering of the panel into an RGBA frame.
//!
//! Drawing happens in two passes: [`build_scene`] turns the panel state into
//! a list of [`DrawCommand`]s, then [`Scene::render`] rasterises them.

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::climate::{ClimateControls, ClimateToggle};
use crate::config::ClimateConfig;
use crate::error::{ClimateError, Result};
use crate::layout::PanelLayout;

type Rgb = (u8, u8, u8);

/// Thickness of the filled part of the fan track.
const FILL_THICKNESS: f32 = 6.0;
/// Radius of the accent dot in the middle of each handle.
const HANDLE_DOT_RADIUS: i32 = 3;

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = fs::read(path).map_err(|source| ClimateError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| ClimateError::FontParse(path.to_path_buf()))
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Arc {
        cx: i32,
        cy: i32,
        r: i32,
        thickness: i32,
        start_angle: f64,
        arc_span: f64,
        color: Rgb,
    },
    Bar {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        thickness: f32,
        color: Rgb,
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        color: Rgb,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Rgb,
    },
}

#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rasterise every command. Text is skipped when no font is loaded.
    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    r,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => {
                    render_arc(canvas, *cx, *cy, *r, *thickness, *start_angle, *arc_span, *color);
                }
                DrawCommand::Bar {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => {
                    draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *color);
                }
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    draw_circle(canvas, *cx, *cy, *radius, *color);
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame.get(idx..idx + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = mix(color.0, dst[0]);
        dst[1] = mix(color.1, dst[1]);
        dst[2] = mix(color.2, dst[2]);
        dst[3] = 0xff;
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

pub fn build_scene(controls: &ClimateControls, layout: &PanelLayout, config: &ClimateConfig) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color.as_tuple()));
    add_dial(&mut scene, controls, layout, config);
    add_fan_track(&mut scene, controls, layout, config);
    add_toggle_buttons(&mut scene, controls, layout, config);
    scene
}

fn add_dial(scene: &mut Scene, controls: &ClimateControls, layout: &PanelLayout, config: &ClimateConfig) {
    let dial = controls.dial();
    let mapper = dial.mapper();
    let geometry = layout.dial;
    let progress = dial.animated_progress();

    scene.add_command(DrawCommand::Arc {
        cx: geometry.cx,
        cy: geometry.cy,
        r: geometry.r,
        thickness: geometry.thickness,
        start_angle: FRAC_PI_2,
        arc_span: mapper.sweep_radians(),
        color: config.track_color.as_tuple(),
    });
    scene.add_command(DrawCommand::Arc {
        cx: geometry.cx,
        cy: geometry.cy,
        r: geometry.r,
        thickness: geometry.thickness,
        start_angle: FRAC_PI_2,
        arc_span: mapper.arc_sweep(progress),
        color: config.accent_color.as_tuple(),
    });

    let angle = mapper.handle_angle(progress);
    let radius = geometry.handle_track_radius();
    let hx = (geometry.cx as f64 + angle.cos() * radius).round() as i32;
    let hy = (geometry.cy as f64 + angle.sin() * radius).round() as i32;
    add_handle(scene, hx, hy, geometry.handle_radius, config);

    scene.add_command(DrawCommand::Text {
        x: geometry.cx,
        y: geometry.cy,
        text: format!("{:.0}°", dial.animated_temperature()),
        font_size: config.readout_font_size,
        color: config.text_color.as_tuple(),
    });
    scene.add_command(DrawCommand::Text {
        x: geometry.cx,
        y: layout.status_y,
        text: controls.toggles().status_line().to_string(),
        font_size: config.label_font_size,
        color: config.text_color.as_tuple(),
    });
}

fn add_fan_track(scene: &mut Scene, controls: &ClimateControls, layout: &PanelLayout, config: &ClimateConfig) {
    let fan = controls.fan();
    let track = layout.track;
    let geometry = fan.track();
    let half = track.height / 2;
    let cy = track.y + half;
    let handle_cx = |progress: f64| track.x + geometry.handle_x(progress).round() as i32 + half;

    scene.add_command(DrawCommand::Bar {
        x0: track.x + half,
        y0: cy,
        x1: track.x + track.width - half,
        y1: cy,
        thickness: half as f32,
        color: config.track_color.as_tuple(),
    });

    let hx = handle_cx(fan.animated_progress());
    scene.add_command(DrawCommand::Bar {
        x0: track.x + geometry.inset.round() as i32,
        y0: cy,
        x1: hx,
        y1: cy,
        thickness: FILL_THICKNESS,
        color: config.accent_color.as_tuple(),
    });
    add_handle(scene, hx, cy, half, config);

    let steps = fan.steps();
    for i in 0..steps {
        let progress = i as f64 / (steps - 1) as f64;
        let color = if i == fan.step() {
            config.text_color
        } else {
            config.muted_text_color
        };
        scene.add_command(DrawCommand::Text {
            x: handle_cx(progress),
            y: layout.step_labels_y,
            text: format!("{}", i + 1),
            font_size: config.label_font_size,
            color: color.as_tuple(),
        });
    }
}

fn add_toggle_buttons(
    scene: &mut Scene,
    controls: &ClimateControls,
    layout: &PanelLayout,
    config: &ClimateConfig,
) {
    let toggles = controls.toggles();
    for button in &layout.buttons {
        let scale = toggles.scale(button.toggle);
        let radius = (button.radius as f64 * scale).round() as i32;
        let color = if toggles.is_enabled(button.toggle) {
            config.accent_color
        } else {
            config.inactive_color
        };
        scene.add_command(DrawCommand::Circle {
            cx: button.cx,
            cy: button.cy,
            radius,
            color: color.as_tuple(),
        });
        scene.add_command(DrawCommand::Text {
            x: button.cx,
            y: layout.button_labels_y,
            text: button.toggle.label().to_string(),
            font_size: config.label_font_size,
            color: label_color(button.toggle, toggles.is_enabled(button.toggle), config),
        });
    }
}

fn label_color(toggle: ClimateToggle, enabled: bool, config: &ClimateConfig) -> Rgb {
    if enabled && toggle == ClimateToggle::AirConditioning {
        config.text_color.as_tuple()
    } else {
        config.muted_text_color.as_tuple()
    }
}

fn add_handle(scene: &mut Scene, cx: i32, cy: i32, radius: i32, config: &ClimateConfig) {
    scene.add_command(DrawCommand::Circle {
        cx,
        cy,
        radius,
        color: config.handle_color.as_tuple(),
    });
    scene.add_command(DrawCommand::Circle {
        cx,
        cy,
        radius: HANDLE_DOT_RADIUS,
        color: config.accent_color.as_tuple(),
    });
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, thickness: f32, color: Rgb) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: Rgb) {
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(cx + x, cy + y, color, aa as f32);
            }
        }
    }
}

/// Ring segment starting at `start_angle` and running clockwise for
/// `arc_span` radians, outer radius `r`.
#[allow(clippy::too_many_arguments)]
fn render_arc(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    r: i32,
    thickness: i32,
    start_angle: f64,
    arc_span: f64,
    color: Rgb,
) {
    if arc_span <= 0.0 {
        return;
    }
    let outer = r as f64;
    let inner = (r - thickness) as f64;
    let reach = r + 1;
    for y in (cy - reach)..=(cy + reach) {
        for x in (cx - reach)..=(cx + reach) {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < inner - 1.0 || dist > outer + 1.0 {
                continue;
            }
            let offset = crate::range::wrap_angle(dy.atan2(dx) - start_angle);
            if offset > arc_span {
                continue;
            }
            let aa = if dist > outer {
                1.0 - (dist - outer).min(1.0)
            } else if dist < inner {
                1.0 - (inner - dist).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_text(canvas: &mut Canvas, x: i32, y: i32, text: &str, font: &Font, scale: Scale, color: Rgb) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.blend(px, py, color, v);
            });
        }
    }
}
