//! Read-only hand-off to the renderer and UI, plus the simulation controls
//!
//! The renderer receives one `RenderBody` per surviving body per frame, in
//! collection order, already packed with the scalings its shaders expect.

use log::warn;

use super::states::{Body, NVec3, Rgb, SimulationState};

/// Renderer-side gravity factor (`mass * 0.002`)
pub const GRAVITY_VISUAL_FACTOR: f64 = 0.002;
/// Velocity is handed to the renderer divided by this
pub const VELOCITY_DIVISOR: f64 = 8.0;
/// Atmosphere strength multiplier
pub const ATMOSPHERE_STRENGTH_SCALE: f64 = 0.4;
/// Log base used to compress atmosphere falloff
pub const FALLOFF_LOG_BASE: f64 = 7.2;

/// Per-frame sim speed step when slowing down
pub const SLOW_DOWN_FACTOR: f64 = 0.99;
/// Per-frame sim speed step when speeding up
pub const SPEED_UP_FACTOR: f64 = 1.015;

/// One body as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderBody {
    pub position: NVec3, // relative to the camera origin
    pub radius: f64,
    pub gravity: f64,
    pub color: Rgb,
    pub velocity: NVec3,
    pub atmosphere_strength: f64,
    pub atmosphere_falloff: f64, // log-compressed
    pub atmosphere_color: Rgb,
    pub ring_inner: f64,
    pub ring_outer: f64,
}

impl RenderBody {
    pub fn from_body(b: &Body, camera: NVec3) -> Self {
        Self {
            position: b.position - camera,
            radius: b.radius,
            gravity: b.mass() * GRAVITY_VISUAL_FACTOR,
            color: b.color,
            velocity: b.velocity / VELOCITY_DIVISOR,
            atmosphere_strength: b.atmosphere.strength * ATMOSPHERE_STRENGTH_SCALE,
            atmosphere_falloff: (b.atmosphere.falloff.max(0.0) + 0.00001).log(FALLOFF_LOG_BASE),
            atmosphere_color: b.atmosphere_color,
            ring_inner: b.ring_bounds.0,
            ring_outer: b.ring_bounds.1,
        }
    }
}

/// Pack every body for the renderer, relative to `camera`
pub fn snapshot(state: &SimulationState, camera: NVec3) -> Vec<RenderBody> {
    state
        .bodies
        .iter()
        .map(|b| RenderBody::from_body(b, camera))
        .collect()
}

/// Values shown by the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub sim_speed: f64,
    pub body_count: usize,
    pub sim_enabled: bool,
}

pub fn telemetry(state: &SimulationState) -> Telemetry {
    Telemetry {
        sim_speed: state.sim_speed(),
        body_count: state.body_count(),
        sim_enabled: state.sim_enabled,
    }
}

/// `"Sim. Speed: {x}x"`, where the 0.02-scaled speed is rounded to four
/// places relative to its order of magnitude
pub fn speed_label(sim_speed: f64) -> String {
    let exponent = sim_speed.log10().trunc() as i32;
    let magnitude = 10f64.powi(exponent);
    let rounded = (sim_speed * 0.02 / magnitude * 10_000.0).round() / 10_000.0 * magnitude;

    let decimals = (4 - exponent).max(0) as usize;
    let text = format!("{rounded:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    format!("Sim. Speed: {text}x")
}

fn scale_speed(state: &mut SimulationState, factor: f64) {
    let target = state.sim_speed() * factor;
    if let Err(e) = state.set_sim_speed(target) {
        warn!("ignoring speed change: {e}");
    }
}

/// One frame of "slow down" input
pub fn slow_down(state: &mut SimulationState) {
    scale_speed(state, SLOW_DOWN_FACTOR);
}

/// One frame of "speed up" input
pub fn speed_up(state: &mut SimulationState) {
    scale_speed(state, SPEED_UP_FACTOR);
}

pub fn set_enabled(state: &mut SimulationState, enabled: bool) {
    state.sim_enabled = enabled;
}

pub fn toggle_enabled(state: &mut SimulationState) {
    let enabled = !state.sim_enabled;
    set_enabled(state, enabled);
}
