//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`:
//! - run settings (headless or viewer, frame budget),
//! - `Parameters`,
//! - the `SimulationState` with every seed body appended in order,
//! - the per-frame upkeep the seed needs (if any)
//!
//! Besides bodies listed in the file there are two built-in seeds: the
//! ringed "solar" system and a black hole that is continuously fed random
//! orbiting bodies.

use std::time::Duration;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{BodyConfig, ScenarioConfig, SeedConfig};
use crate::error::{Result, SimError};
use super::engine::Simulation;
use super::params::Parameters;
use super::states::{Body, NVec3, Rgb, SimulationState};
use super::vecmath::{normalize_or_zero, perpendicular, rotate};

/// Default sim speed of the solar seed
pub const SOLAR_SIM_SPEED: f64 = 30000.0;

/// Circular-orbit speed constant for random spawns: `v = 68 / sqrt(r)`
pub const ORBIT_SPEED_CONSTANT: f64 = 68.0;

/// Seed-specific maintenance run after each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upkeep {
    None,
    /// Cull bodies beyond `cull_radius` from the origin, then spawn random
    /// bodies until `target_count` are alive
    BlackHole { target_count: usize, cull_radius: f64 },
}

impl Upkeep {
    pub const BLACK_HOLE: Upkeep = Upkeep::BlackHole {
        target_count: 10,
        cull_radius: 600.0,
    };
}

/// A fully-initialized scenario ready to be run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub state: SimulationState,
    pub upkeep: Upkeep,
    pub camera: NVec3, // initial camera origin for the viewer
    pub headless: bool,
    pub frames: u64,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let p_cfg = &cfg.parameters;
        let seed_speed = match cfg.engine.seed {
            SeedConfig::Solar => SOLAR_SIM_SPEED,
            SeedConfig::File | SeedConfig::BlackHole => 1.0,
        };

        // Parameters (runtime) from ParametersConfig
        let recenter_secs = p_cfg.recenter_interval.unwrap_or(1.0);
        if !(recenter_secs > 0.0) || !recenter_secs.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "recenter_interval must be positive, got {recenter_secs}"
            )));
        }
        let parameters = Parameters {
            sim_speed: p_cfg.sim_speed.unwrap_or(seed_speed),
            rng_seed: p_cfg.rng_seed.unwrap_or(42),
            recenter_interval: Duration::from_secs_f64(recenter_secs),
            sim_enabled: p_cfg.sim_enabled.unwrap_or(true),
        };

        // Seed bodies draw from their own stream so the merge stream starts clean
        let mut seed_rng = ChaCha8Rng::seed_from_u64(parameters.rng_seed.wrapping_add(1));
        let (bodies, upkeep, camera) = match cfg.engine.seed {
            SeedConfig::File => {
                let bodies = cfg
                    .bodies
                    .iter()
                    .map(body_from_config)
                    .collect::<Result<Vec<_>>>()?;
                (bodies, Upkeep::None, NVec3::new(0.0, 0.0, -50.0))
            }
            SeedConfig::Solar => (solar_seed(&mut seed_rng)?, Upkeep::None, NVec3::new(-170.0, 190.0, -1500.0)),
            SeedConfig::BlackHole => (black_hole_seed()?, Upkeep::BLACK_HOLE, NVec3::new(0.0, 40.0, -150.0)),
        };

        let mut state = SimulationState::new(parameters.sim_speed)?;
        state.sim_enabled = parameters.sim_enabled;
        for b in bodies {
            state.add_body(b);
        }
        debug!("built {:?} scenario with {} bodies", cfg.engine.seed, state.body_count());

        Ok(Self {
            parameters,
            state,
            upkeep,
            camera,
            headless: cfg.engine.headless.unwrap_or(true),
            frames: cfg.engine.frames.unwrap_or(2000),
        })
    }

    /// Hand the state over to a runtime driver
    pub fn into_simulation(self) -> Simulation {
        Simulation::new(self.state, &self.parameters).with_upkeep(self.upkeep)
    }
}

fn vec3(values: &[f64], field: &str) -> Result<NVec3> {
    match values {
        [x, y, z] if values.iter().all(|c| c.is_finite()) => Ok(NVec3::new(*x, *y, *z)),
        [_, _, _] => Err(SimError::InvalidConfig(format!(
            "`{field}` components must be finite, got {values:?}"
        ))),
        _ => Err(SimError::InvalidConfig(format!(
            "`{field}` needs 3 components, got {}",
            values.len()
        ))),
    }
}

fn rgb(values: &[f32], field: &str) -> Result<Rgb> {
    match values {
        [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
        _ => Err(SimError::InvalidConfig(format!(
            "`{field}` needs 3 components, got {}",
            values.len()
        ))),
    }
}

fn pair(values: &[f64], field: &str) -> Result<(f64, f64)> {
    match values {
        [a, b] => Ok((*a, *b)),
        _ => Err(SimError::InvalidConfig(format!(
            "`{field}` needs 2 components, got {}",
            values.len()
        ))),
    }
}

/// Map one `BodyConfig` to a validated runtime `Body`
pub fn body_from_config(bc: &BodyConfig) -> Result<Body> {
    let position = vec3(&bc.position, "position")?;
    let mut body = Body::new(bc.mass.unwrap_or(1.0), bc.radius.unwrap_or(1.0), position)?;

    match (&bc.momentum, &bc.velocity) {
        (Some(_), Some(_)) => {
            return Err(SimError::InvalidConfig(
                "give either `momentum` or `velocity`, not both".into(),
            ))
        }
        (Some(p), None) => body = body.with_momentum(vec3(p, "momentum")?),
        (None, Some(v)) => body = body.with_velocity(vec3(v, "velocity")?)?,
        (None, None) => {}
    }

    if let Some(c) = &bc.color {
        body = body.with_color(rgb(c, "color")?);
    }
    if let Some(a) = &bc.atmosphere {
        let (strength, falloff) = pair(a, "atmosphere")?;
        body.atmosphere.strength = strength;
        body.atmosphere.falloff = falloff;
    }
    if let Some(c) = &bc.atmosphere_color {
        body.atmosphere_color = rgb(c, "atmosphere_color")?;
    }
    if let Some(r) = &bc.ring_bounds {
        let (inner, outer) = pair(r, "ring_bounds")?;
        body = body.with_rings(inner, outer);
    }
    Ok(body)
}

/// The ringed primary and its six planets
///
/// Planets start at a random height below the orbital plane, drawn from
/// `[0, 700)`, so every run looks slightly different.
pub fn solar_seed<R: Rng>(rng: &mut R) -> Result<Vec<Body>> {
    let mut lower = || NVec3::new(0.0, -rng.random_range(0.0_f64..700.0), 0.0);
    let bare = |mass: f64, radius: f64, color: Rgb, position: NVec3| -> Result<Body> {
        Ok(Body::new(mass, radius, position)?
            .with_color(color)
            .with_atmosphere(0.0, 0.0, Rgb::SKY))
    };

    let primary = Body::new(0.1, 633.0, NVec3::new(0.0, -500.0, 0.0))?
        .with_color(Rgb::new(0.6, 0.55, 0.5))
        .with_atmosphere(12.0, 30.0, Rgb::new(0.78, 0.75, 0.73))
        .with_rings(1000.0, 2000.0);

    let inner = bare(0.0001, 17.0, Rgb::new(0.7, 0.65, 0.55), NVec3::new(0.0, 0.0, -2000.0) + lower())?
        .with_momentum(NVec3::new(0.009, 0.0, 0.0));
    let second = bare(0.00019, 21.0, Rgb::new(0.5, 0.45, 0.42), NVec3::new(0.0, 0.0, -3000.0) + lower())?
        .with_momentum(NVec3::new(0.0083, 0.0, 0.0));
    let hazy = Body::new(0.00015, 20.0, NVec3::new(0.0, 0.0, -4500.0) + lower())?
        .with_color(Rgb::new(0.46, 0.53, 0.6))
        .with_atmosphere(1.0, 0.01, Rgb::SKY)
        .with_momentum(NVec3::new(0.0064, 0.0, 0.0));
    let outer = bare(0.00009, 16.0, Rgb::new(0.48, 0.5, 0.54), NVec3::new(0.0, 0.0, -7000.0) + lower())?
        .with_momentum(NVec3::new(0.005, 0.0, 0.0));

    let blue_position = NVec3::new(14500.0, 0.0, 0.0) + lower();
    let blue = Body::new(0.00069, 68.0, blue_position)?
        .with_color(Rgb::new(0.45, 0.6, 0.8))
        .with_atmosphere(1.0, 1.0, Rgb::new(0.45, 0.6, 0.8))
        .with_momentum(NVec3::new(0.0, 1.0, -1.0) * 0.000707);
    let moon = bare(0.00011, 18.0, Rgb::new(0.45, 0.45, 0.45), blue_position + NVec3::new(300.0, 0.0, 0.0))?
        .with_momentum(NVec3::new(0.0, 1.0, 1.5) * 0.000707);

    Ok(vec![primary, inner, second, hazy, outer, blue, moon])
}

/// A lone, atmosphere-free black hole at the origin
pub fn black_hole_seed() -> Result<Vec<Body>> {
    let hole = Body::new(2000.0, 0.0, NVec3::zeros())?.with_atmosphere(0.0, 0.0, Rgb::SKY);
    Ok(vec![hole])
}

/// A random body on a roughly circular orbit around the origin
///
/// Placed 20–60 units out at a random orientation, moving along the
/// in-plane perpendicular at `68 / sqrt(r)`; heavy spawns (mass > 3) get an
/// atmosphere.
pub fn spawn_random<R: Rng>(rng: &mut R) -> Result<Body> {
    let mass: f64 = rng.random_range(0.5_f64..3.0) * rng.random_range(0.75_f64..2.0) * rng.random_range(0.75_f64..2.0);
    let radius = mass.powf(0.333333) * 1.5;

    let depth: f64 = rng.random_range(-60.0..-20.0);
    let theta: f64 = rng.random_range(-4.0..4.0);
    let psi: f64 = rng.random_range(-1.0..1.0);
    let position = rotate(NVec3::new(0.0, 0.0, depth), theta, psi);

    let velocity = normalize_or_zero(perpendicular(position)) / position.norm().sqrt() * ORBIT_SPEED_CONSTANT;

    let atmo = (mass - 3.0).max(0.0);
    let color = random_hsv(rng, 0.3);
    let tint = random_hsv(rng, 0.0);
    let atmosphere_color = Rgb::new((tint.r + 0.45) / 2.0, (tint.g + 0.6) / 2.0, (tint.b + 0.8) / 2.0);

    Ok(Body::new(mass, radius, position)?
        .with_velocity(velocity)?
        .with_color(color)
        .with_atmosphere(atmo.sqrt() * 0.4, atmo, atmosphere_color))
}

/// Random colour with hue and saturation in `[0, 1]` and value in
/// `[min_value, 1]`
fn random_hsv<R: Rng>(rng: &mut R, min_value: f32) -> Rgb {
    let h: f32 = rng.random_range(0.0..=1.0);
    let s: f32 = rng.random_range(0.0..=1.0);
    let v: f32 = rng.random_range(min_value..=1.0);
    hsv_to_rgb(h, s, v)
}

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}
