//! Per-frame integration and center-of-mass recentering
//!
//! A frame is two gravity sub-steps with one merge pass between them,
//! followed by a buffered position commit for every surviving body and a
//! velocity refresh for the renderer. Recentering is a separate whole-state
//! operation run on its own cadence, never inside a frame.

use log::debug;
use rand::Rng;

use super::collisions::{merge_pass, MergeEvent};
use super::forces::AccelSet;
use super::states::SimulationState;

/// Gravity sub-steps per frame
pub const SUB_STEPS: usize = 2;

/// Advance the simulation by one rendered frame
///
/// Gravity accumulates twice but merging runs once, between the two
/// sub-steps. Positions move with the velocity cached at the end of the
/// previous frame; velocities are re-derived from momentum last.
pub fn frame_step<R: Rng>(state: &mut SimulationState, forces: &AccelSet, rng: &mut R) -> Option<MergeEvent> {
    // first gravity half
    forces.sub_step(state);

    let merged = merge_pass(state, rng);

    for _ in 1..SUB_STEPS {
        forces.sub_step(state);
    }

    let sim_speed = state.sim_speed();
    for b in state.bodies.iter_mut() {
        b.commit_position(sim_speed);
    }

    refresh_velocities(state);
    merged
}

/// Re-derive every cached velocity from momentum
pub fn refresh_velocities(state: &mut SimulationState) {
    for b in state.bodies.iter_mut() {
        b.refresh_velocity();
    }
}

/// Remove the mass-weighted mean position and momentum from every body
///
/// Relative motion is untouched; only the drift of the whole system is
/// taken out. Buffered acceleration and displacement are left as they are.
pub fn recenter(state: &mut SimulationState) {
    if state.bodies.is_empty() {
        return;
    }
    let com = state.center_of_mass();
    let mean_momentum = state.mean_momentum();

    for b in state.bodies.iter_mut() {
        b.position -= com;
        b.momentum -= mean_momentum;
    }
    refresh_velocities(state);

    debug!(
        "recentered {} bodies: shifted by {:.4?}, momentum drift {:.4?}",
        state.body_count(),
        com.as_slice(),
        mean_momentum.as_slice()
    );
}
