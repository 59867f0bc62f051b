//! Runtime driver tying the frame integrator to the recentering cadence
//!
//! `Simulation` owns the state, the force set and the merge RNG, and runs the
//! two periodic jobs one after the other: a frame on every tick, recentering
//! whenever a full interval of wall time has passed. Because both run from
//! the same `tick`, recentering always sees a state between frames.

use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::collisions::MergeEvent;
use super::forces::AccelSet;
use super::integrator::{frame_step, recenter};
use super::params::Parameters;
use super::scenario::{spawn_random, Upkeep};
use super::states::SimulationState;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub stepped: bool,
    pub merge: Option<MergeEvent>,
    pub recentered: bool,
    pub culled: usize,
    pub spawned: usize,
}

pub struct Simulation {
    pub state: SimulationState,
    pub forces: AccelSet,
    pub upkeep: Upkeep,
    rng: ChaCha8Rng,
    recenter_interval: Duration,
    since_recenter: Duration,
    frames: u64,
}

impl Simulation {
    pub fn new(state: SimulationState, parameters: &Parameters) -> Self {
        Self {
            state,
            forces: AccelSet::gravity(),
            upkeep: Upkeep::None,
            rng: ChaCha8Rng::seed_from_u64(parameters.rng_seed),
            recenter_interval: parameters.recenter_interval,
            since_recenter: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn with_upkeep(mut self, upkeep: Upkeep) -> Self {
        self.upkeep = upkeep;
        self
    }

    /// Restart the merge/spawn random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame if the simulation is enabled
    pub fn step_frame(&mut self) -> Option<MergeEvent> {
        if !self.state.sim_enabled {
            return None;
        }
        self.frames += 1;
        frame_step(&mut self.state, &self.forces, &mut self.rng)
    }

    /// Run the recentering job now
    pub fn recenter(&mut self) {
        recenter(&mut self.state);
        self.since_recenter = Duration::ZERO;
    }

    /// One frame of wall time `elapsed`: integrate, seed upkeep, then
    /// recenter if an interval has elapsed since the last recentering
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        let mut report = TickReport {
            stepped: self.state.sim_enabled,
            ..Default::default()
        };
        report.merge = self.step_frame();

        let (culled, spawned) = self.run_upkeep();
        report.culled = culled;
        report.spawned = spawned;

        self.since_recenter += elapsed;
        if self.since_recenter >= self.recenter_interval {
            recenter(&mut self.state);
            self.since_recenter = carry_over(self.since_recenter, self.recenter_interval);
            report.recentered = true;
        }
        report
    }

    /// Seed-specific maintenance between frames; returns (culled, spawned)
    fn run_upkeep(&mut self) -> (usize, usize) {
        match self.upkeep {
            Upkeep::None => (0, 0),
            Upkeep::BlackHole { target_count, cull_radius } => {
                let before = self.state.body_count();
                self.state.bodies.retain(|b| b.position.norm() <= cull_radius);
                let culled = before - self.state.body_count();
                if culled > 0 {
                    info!("culled {culled} escaped bodies");
                }

                let mut spawned = 0;
                while self.state.body_count() < target_count {
                    match spawn_random(&mut self.rng) {
                        Ok(body) => {
                            let id = self.state.add_body(body);
                            debug!("spawned body {id:?}");
                            spawned += 1;
                        }
                        Err(e) => {
                            warn!("skipping spawn: {e}");
                            break;
                        }
                    }
                }
                (culled, spawned)
            }
        }
    }
}

/// Time left over once every whole `interval` in `accumulated` is spent
///
/// A long stall recenters once rather than replaying every missed interval.
fn carry_over(accumulated: Duration, interval: Duration) -> Duration {
    match accumulated.as_nanos().checked_rem(interval.as_nanos()) {
        Some(rest) => Duration::from_nanos(rest as u64),
        None => Duration::ZERO,
    }
}
