use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::simulation::forces::AccelSet;
use crate::simulation::integrator::frame_step;
use crate::simulation::states::{Body, NVec3, SimulationState};
use crate::error::Result;

/// Helper to build a state of `n` well-separated resting bodies
fn make_state(n: usize) -> Result<SimulationState> {
    let mut state = SimulationState::new(1.0)?;
    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 500.0,
            (i_f * 0.13).cos() * 500.0,
            (i_f * 0.07).sin() * 500.0,
        );
        state.add_body(Body::new(1.0, 0.01, x)?);
    }
    Ok(state)
}

/// Time a single gravity sub-step for growing n
pub fn bench_gravity() -> Result<()> {
    let ns = [50, 100, 200, 400, 800, 1600];
    let forces = AccelSet::gravity();

    for n in ns {
        let mut state = make_state(n)?;

        // Warm up
        forces.sub_step(&mut state);

        let t0 = Instant::now();
        forces.sub_step(&mut state);
        let dt = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, gravity sub-step = {dt:8.6} s");
    }
    Ok(())
}

/// Time whole frames (gravity, merge scan, position commit) for a range of n
/// Prints CSV so the curve can be pasted into a spreadsheet
pub fn bench_frame_curve() -> Result<()> {
    println!("N,frame_ms");
    let forces = AccelSet::gravity();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for n in (100..=1600).step_by(100) {
        // Small n: average over a few frames to smooth noise
        let frames = if n <= 400 { 5 } else { 1 };
        let mut state = make_state(n)?;

        let t0 = Instant::now();
        for _ in 0..frames {
            frame_step(&mut state, &forces, &mut rng);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!("{},{:.6}", n, ms);
    }
    Ok(())
}
