//! Numerical and control parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - the global time-dilation multiplier (`sim_speed`),
//! - the seed for the merge tie-break and spawner RNG,
//! - the wall-clock cadence of center-of-mass recentering,
//! - whether integration starts enabled

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub sim_speed: f64, // time-dilation multiplier, > 0
    pub rng_seed: u64, // deterministic seed
    pub recenter_interval: Duration, // wall time between recenterings
    pub sim_enabled: bool, // gate for the integrator
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            sim_speed: 1.0,
            rng_seed: 42,
            recenter_interval: Duration::from_secs(1),
            sim_enabled: true,
        }
    }
}
