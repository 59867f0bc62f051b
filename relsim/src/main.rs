use relsim::{Scenario, ScenarioConfig};
use relsim::{bench_frame_curve, bench_gravity};
use relsim::simulation::render::{speed_label, telemetry};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

/// Headless runs pace recentering as if frames arrived at 60 fps
const HEADLESS_FRAME_TIME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "solar.yaml")]
    file_name: String,

    /// Override the scenario's headless frame count
    #[arg(long)]
    frames: Option<u64>,

    /// Run the gravity and frame benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn run_headless(scenario: Scenario, frames: u64) {
    let mut sim = scenario.into_simulation();
    info!("running {frames} frames headless with {} bodies", sim.state.body_count());

    for _ in 0..frames {
        let report = sim.tick(HEADLESS_FRAME_TIME);
        if report.recentered {
            let t = telemetry(&sim.state);
            info!(
                "frame {} | {} | bodies: {}",
                sim.frames(),
                speed_label(t.sim_speed),
                t.body_count
            );
        }
    }

    for b in &sim.state.bodies {
        info!(
            "body {:?}: mass {:.5}, radius {:.2}, position {:.2?}",
            b.id,
            b.mass(),
            b.radius,
            b.position.as_slice()
        );
    }
}

#[cfg(feature = "viewer")]
fn run_interactive(scenario: Scenario) -> Result<()> {
    relsim::run_viewer(scenario);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_interactive(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("this build has no viewer; rebuild with `--features viewer` or set `headless: true`")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_frame_curve()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg).context("building scenario")?;

    if scenario.headless {
        let frames = args.frames.unwrap_or(scenario.frames);
        run_headless(scenario, frames);
        Ok(())
    } else {
        run_interactive(scenario)
    }
}
