//! Force / acceleration contributors for the engine
//!
//! A force term reports, for one target body, the individual pulls of every
//! other body in collection order. `AccelSet` feeds those pulls one at a time
//! through `Body::accelerate`, so the threshold-gated flush is evaluated after
//! each contribution rather than once on their sum.

use super::states::{Body, NVec3, SimulationState};
use super::vecmath::{force_magnitude, normalize_or_zero};

/// Scale applied to every gravitational pull
pub const GRAVITY_SCALE: f64 = 0.04;

/// Trait for acceleration sources acting on one body of the collection
/// Implementations append one contribution per source into `out`
pub trait Acceleration {
    fn contributions(&self, bodies: &[Body], target: usize, out: &mut Vec<NVec3>);
}

/// Ordered collection of acceleration terms
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Set holding only the relativistic gravity field
    pub fn gravity() -> Self {
        Self::new().with(RelativisticGravity::default())
    }

    /// Apply every contribution on body `target`, scaled by `timestep`
    pub fn accelerate_body(&self, bodies: &mut [Body], target: usize, timestep: f64, scratch: &mut Vec<NVec3>) {
        scratch.clear();
        for term in &self.terms {
            term.contributions(bodies, target, scratch);
        }
        let body = &mut bodies[target];
        for a in scratch.iter() {
            body.accelerate(*a, timestep);
        }
    }

    /// One gravity sub-step over the whole collection, in collection order
    pub fn sub_step(&self, state: &mut SimulationState) {
        let timestep = state.sim_speed();
        let mut scratch = Vec::with_capacity(state.bodies.len());
        for i in 0..state.bodies.len() {
            self.accelerate_body(&mut state.bodies, i, timestep, &mut scratch);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::gravity()
    }
}

/// Pairwise gravity with the Schwarzschild-softened two-term law
///
/// Pull on `s` from `o`: `unit(o.pos - s.pos) * force_magnitude(o.pos, s.pos,
/// o.mass, s.mass) * scale`. The target is skipped by index, so a distinct
/// body sitting at the same position still counts (with a zero direction).
pub struct RelativisticGravity {
    pub scale: f64,
}

impl Default for RelativisticGravity {
    fn default() -> Self {
        Self { scale: GRAVITY_SCALE }
    }
}

impl RelativisticGravity {
    /// Pull of `source` on `target`
    pub fn pull(&self, target: &Body, source: &Body) -> NVec3 {
        let normal = normalize_or_zero(source.position - target.position);
        normal * force_magnitude(source.position, target.position, source.mass, target.mass) * self.scale
    }
}

impl Acceleration for RelativisticGravity {
    fn contributions(&self, bodies: &[Body], target: usize, out: &mut Vec<NVec3>) {
        let s = &bodies[target];
        for (j, o) in bodies.iter().enumerate() {
            if j == target {
                continue;
            }
            out.push(self.pull(s, o));
        }
    }
}

/// Net (unbuffered) pull on body `target`, mostly useful for diagnostics
pub fn net_acceleration(set: &AccelSet, bodies: &[Body], target: usize) -> NVec3 {
    let mut out = Vec::new();
    for term in &set.terms {
        term.contributions(bodies, target, &mut out);
    }
    out.iter().fold(NVec3::zeros(), |acc, a| acc + a)
}
