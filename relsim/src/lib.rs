pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::SimError;

pub use simulation::states::{Atmosphere, Body, BodyId, NVec3, Rgb, SimulationState};
pub use simulation::params::Parameters;
pub use simulation::forces::{AccelSet, Acceleration, RelativisticGravity};
pub use simulation::collisions::{merge_pass, MergeEvent};
pub use simulation::integrator::{frame_step, recenter};
pub use simulation::engine::{Simulation, TickReport};
pub use simulation::scenario::{Scenario, Upkeep};
pub use simulation::render::{snapshot, telemetry, RenderBody, Telemetry};

pub use configuration::config::{BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig, SeedConfig};

#[cfg(feature = "viewer")]
pub use visualization::viewer::run_viewer;

pub use benchmark::benchmark::{bench_frame_curve, bench_gravity};
