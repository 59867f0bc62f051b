//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – which seed to build and how to run it
//! - [`ParametersConfig`] – simulation speed, RNG seed, recentering cadence
//! - [`BodyConfig`]       – initial state for each body (file seed only)
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   seed: file              # file | solar | black_hole
//!   headless: true          # false -> bevy viewer (needs the `viewer` feature)
//!   frames: 2000            # frames to run headless
//!
//! parameters:
//!   sim_speed: 1.0          # time-dilation multiplier
//!   rng_seed: 42            # merge tie-break / spawner seed
//!   recenter_interval: 1.0  # seconds between recenterings
//!   sim_enabled: true
//!
//! bodies:
//!   - position: [ 0.0, 0.0, 0.0 ]
//!     mass: 1.0
//!     radius: 5.0
//!   - position: [ 3.0, 0.0, 0.0 ]
//!     mass: 1.0
//!     radius: 5.0
//!     velocity: [ 0.0, 0.0, 1.0 ]   # or `momentum: [..]`, not both
//!     color: [ 0.6, 0.55, 0.5 ]
//!     atmosphere: [ 12.0, 30.0 ]    # strength, falloff
//!     atmosphere_color: [ 0.78, 0.75, 0.73 ]
//!     ring_bounds: [ 1000.0, 2000.0 ]
//! ```
//!
//! Omitted body fields take the same defaults as a freshly created body.

use serde::Deserialize;

/// Which initial body set to build
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedConfig {
    #[serde(rename = "file")] // bodies listed under `bodies`
    #[default]
    File,

    #[serde(rename = "solar")] // ringed primary with six planets
    Solar,

    #[serde(rename = "black_hole")] // heavy hole kept topped up with random spawns
    BlackHole,
}

/// High-level run configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub seed: SeedConfig,
    pub headless: Option<bool>, // default true
    pub frames: Option<u64>, // headless run length
}

/// Global simulation parameters; every field falls back to the seed's default
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ParametersConfig {
    pub sim_speed: Option<f64>,
    pub rng_seed: Option<u64>,
    pub recenter_interval: Option<f64>, // seconds
    pub sim_enabled: Option<bool>,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub position: Vec<f64>,
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub momentum: Option<Vec<f64>>,
    pub velocity: Option<Vec<f64>>, // converted to momentum, must stay below c
    pub color: Option<Vec<f32>>,
    pub atmosphere: Option<Vec<f64>>, // [strength, falloff]
    pub atmosphere_color: Option<Vec<f32>>,
    pub ring_bounds: Option<Vec<f64>>, // [inner, outer]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}
