//! Inelastic merging of overlapping bodies
//!
//! Once per frame every ordered pair `(i, j)` is scanned in collection order.
//! When two bodies overlap, `j` is absorbed into `i` if it is lighter than
//! `i` within a small random band. The pass ends at the first absorption:
//! removing `j` shifts every later index, so nothing after it is trusted.
//! Chains of three or more overlaps therefore resolve over several frames,
//! in an order that depends on the collection order.

use log::info;
use rand::Rng;

use super::states::{Body, BodyId, NVec3, SimulationState};

/// Schwarzschild-like factor used by the overlap test (slightly larger than
/// the one in the force law)
pub const MERGE_SCHWARZ_FACTOR: f64 = 0.00201;

/// Half-width of the near-tie band for the mass comparison
pub const TIE_BAND: f64 = 0.01;

/// Outcome of an absorption
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    pub absorber: BodyId,
    pub absorbed: BodyId,
    pub mass: f64,     // absorber mass after the merge
    pub radius: f64,   // absorber radius after the merge
    pub momentum: NVec3,
}

/// Combined merge scale of a pair: `(m_i + m_j) * 0.00201`
pub fn merge_schwarzschild(a: &Body, b: &Body) -> f64 {
    (a.mass + b.mass) * MERGE_SCHWARZ_FACTOR
}

/// `|p_a - p_b| < max(r_a, r_b, schwarz / 2) - min(r_a, r_b) / 2`
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let schwarz = merge_schwarzschild(a, b);
    let reach = a.radius.max(b.radius).max(schwarz * 0.5) - a.radius.min(b.radius) * 0.5;
    a.distance_to(b) < reach
}

/// Fold `absorbed` into `absorber`
///
/// Momentum becomes the mass-weighted mean, masses add. A body whose radius
/// is still above the pair's merge scale also grows by volume and blends its
/// atmosphere falloff (weighted by cross-section, against its old radius).
/// A body at or below that scale keeps its radius.
pub fn absorb(absorber: &mut Body, absorbed: &Body) {
    let schwarz = merge_schwarzschild(absorber, absorbed);
    let total = absorber.mass + absorbed.mass;

    absorber.momentum = (absorbed.momentum * absorbed.mass + absorber.momentum * absorber.mass) / total;
    absorber.mass = total;

    if absorber.radius > schwarz {
        let r2 = absorber.radius * absorber.radius;
        let other_r2 = absorbed.radius * absorbed.radius;
        absorber.atmosphere.falloff =
            (absorber.atmosphere.falloff * r2 + absorbed.atmosphere.falloff * other_r2) / r2;
        absorber.radius = (absorber.radius.powi(3) + absorbed.radius.powi(3)).cbrt();
    }
}

/// Draw the tie-break factor `U ~ [0.99, 1.01]`
fn tie_factor<R: Rng>(rng: &mut R) -> f64 {
    rng.random_range((1.0 - TIE_BAND)..=(1.0 + TIE_BAND))
}

/// One scan over all ordered pairs; absorbs at most one body
///
/// The random factor is only drawn for overlapping pairs, so the number of
/// draws depends on how many overlaps precede the absorption.
pub fn merge_pass<R: Rng>(state: &mut SimulationState, rng: &mut R) -> Option<MergeEvent> {
    let n = state.bodies.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (s, p) = (&state.bodies[i], &state.bodies[j]);
            if !overlaps(s, p) {
                continue;
            }
            if p.mass < s.mass * tie_factor(rng) {
                let absorbed = state.bodies.remove(j);
                // removal shifts everything after j down by one
                let i = if j < i { i - 1 } else { i };
                let absorber = &mut state.bodies[i];
                absorb(absorber, &absorbed);

                let event = MergeEvent {
                    absorber: absorber.id,
                    absorbed: absorbed.id,
                    mass: absorber.mass,
                    radius: absorber.radius,
                    momentum: absorber.momentum,
                };
                info!(
                    "merged body {:?} into {:?}: mass {:.5}, radius {:.3}",
                    event.absorbed, event.absorber, event.mass, event.radius
                );
                return Some(event);
            }
        }
    }
    None
}
