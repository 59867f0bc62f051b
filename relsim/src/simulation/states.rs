//! Core state types for the simulation
//!
//! - `Body`: one massive sphere with its physical, visual and buffered
//!   integration state
//! - `SimulationState`: the ordered body collection plus the global
//!   simulation speed and enable flag
//!
//! Collection order is meaningful: it is the rendering order and the merge
//! priority, so bodies are only ever appended or removed, never reordered.

use nalgebra::Vector3;

use super::kinematics::{momentum_for_velocity, velocity_from_momentum};
use crate::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

/// Momentum-relative threshold for flushing buffered acceleration
pub const MOMENTUM_FLUSH_RATIO: f64 = 0.00015;

/// Distance-relative threshold for flushing buffered displacement
pub const POSITION_FLUSH_RATIO: f64 = 0.000001;

/// Displacement per frame per unit velocity at `sim_speed == 1`
pub const POSITION_STEP: f64 = 0.02;

/// Stable identity of a body, assigned when it joins a [`SimulationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BodyId(pub u32);

/// Linear RGB colour consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const GREY: Rgb = Rgb::new(0.5, 0.5, 0.5);
    pub const SKY: Rgb = Rgb::new(0.55, 0.76, 0.9);
}

/// Atmosphere parameters; `falloff` is the only visual value physics touches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub strength: f64,
    pub falloff: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            strength: 1.0,
            falloff: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub position: NVec3,
    pub radius: f64,
    pub(crate) mass: f64,
    pub color: Rgb,
    pub atmosphere: Atmosphere,
    pub atmosphere_color: Rgb,
    pub ring_bounds: (f64, f64), // (inner, outer)
    pub velocity: NVec3, // derived from momentum, refreshed once per frame
    pub(crate) momentum: NVec3,
    accumulated_acceleration: NVec3,
    accumulated_position_delta: NVec3,
}

impl Body {
    /// Create a resting body
    ///
    /// Mass must be strictly positive and the radius non-negative; anything
    /// else is a configuration error.
    ///
    /// ```
    /// use relsim::{Body, NVec3};
    ///
    /// let b = Body::new(1.0, 5.0, NVec3::new(3.0, 0.0, 0.0)).unwrap();
    /// assert_eq!(b.mass(), 1.0);
    /// assert!(Body::new(0.0, 5.0, NVec3::zeros()).is_err());
    /// ```
    pub fn new(mass: f64, radius: f64, position: NVec3) -> Result<Self> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SimError::NonPositiveMass { mass });
        }
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "body radius must be non-negative, got {radius}"
            )));
        }
        Ok(Self {
            id: BodyId::default(),
            position,
            radius,
            mass,
            color: Rgb::GREY,
            atmosphere: Atmosphere::default(),
            atmosphere_color: Rgb::SKY,
            ring_bounds: (0.0, 0.0),
            velocity: NVec3::zeros(),
            momentum: NVec3::zeros(),
            accumulated_acceleration: NVec3::zeros(),
            accumulated_position_delta: NVec3::zeros(),
        })
    }

    pub fn with_momentum(mut self, momentum: NVec3) -> Self {
        self.momentum = momentum;
        self.refresh_velocity();
        self
    }

    /// Set the initial motion from a desired velocity (must be below `c`)
    pub fn with_velocity(mut self, velocity: NVec3) -> Result<Self> {
        self.set_velocity(velocity)?;
        Ok(self)
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_atmosphere(mut self, strength: f64, falloff: f64, color: Rgb) -> Self {
        self.atmosphere = Atmosphere { strength, falloff };
        self.atmosphere_color = color;
        self
    }

    pub fn with_rings(mut self, inner: f64, outer: f64) -> Self {
        self.ring_bounds = (inner, outer);
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn momentum(&self) -> NVec3 {
        self.momentum
    }

    /// Acceleration waiting to be flushed into momentum
    pub fn pending_acceleration(&self) -> NVec3 {
        self.accumulated_acceleration
    }

    /// Displacement waiting to be flushed into position
    pub fn pending_displacement(&self) -> NVec3 {
        self.accumulated_position_delta
    }

    /// Replace momentum with the one matching `velocity`
    pub fn set_velocity(&mut self, velocity: NVec3) -> Result<()> {
        self.momentum = momentum_for_velocity(velocity)?;
        self.refresh_velocity();
        Ok(())
    }

    /// Buffer `acceleration * timestep`; flush into momentum once the buffer
    /// outgrows `|momentum| * 0.00015`
    ///
    /// Small pulls on a fast body are batched rather than applied per call.
    ///
    /// ```
    /// use relsim::{Body, NVec3};
    ///
    /// let mut b = Body::new(1.0, 1.0, NVec3::zeros())
    ///     .unwrap()
    ///     .with_momentum(NVec3::new(10.0, 0.0, 0.0));
    ///
    /// // threshold is 10 * 0.00015 = 0.0015
    /// b.accelerate(NVec3::new(0.0, 0.001, 0.0), 1.0);
    /// assert_eq!(b.momentum(), NVec3::new(10.0, 0.0, 0.0));
    ///
    /// b.accelerate(NVec3::new(0.0, 0.001, 0.0), 1.0);
    /// assert_eq!(b.momentum(), NVec3::new(10.0, 0.002, 0.0));
    /// assert_eq!(b.pending_acceleration(), NVec3::zeros());
    /// ```
    pub fn accelerate(&mut self, acceleration: NVec3, timestep: f64) {
        self.accumulated_acceleration += acceleration * timestep;
        if self.accumulated_acceleration.norm() > self.momentum.norm() * MOMENTUM_FLUSH_RATIO {
            self.momentum += self.accumulated_acceleration;
            self.accumulated_acceleration = NVec3::zeros();
        }
    }

    /// Buffer one frame of motion at the cached velocity; flush into position
    /// once the buffer outgrows `|position| * 0.000001`
    pub fn commit_position(&mut self, sim_speed: f64) {
        self.accumulated_position_delta += self.velocity * POSITION_STEP * sim_speed;
        if self.accumulated_position_delta.norm() > self.position.norm() * POSITION_FLUSH_RATIO {
            self.position += self.accumulated_position_delta;
            self.accumulated_position_delta = NVec3::zeros();
        }
    }

    /// Re-derive the cached velocity from momentum
    pub fn refresh_velocity(&mut self) {
        self.velocity = velocity_from_momentum(self.momentum);
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).norm()
    }
}

/// The single live simulation: ordered bodies plus global controls
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub bodies: Vec<Body>, // insertion order = render order = merge priority
    sim_speed: f64,
    pub sim_enabled: bool,
    next_id: u32,
}

impl SimulationState {
    pub fn new(sim_speed: f64) -> Result<Self> {
        validate_sim_speed(sim_speed)?;
        Ok(Self {
            bodies: Vec::new(),
            sim_speed,
            sim_enabled: true,
            next_id: 0,
        })
    }

    /// Append a body, assign it an id and derive its velocity
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        body.refresh_velocity();
        self.bodies.push(body);
        id
    }

    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn sim_speed(&self) -> f64 {
        self.sim_speed
    }

    pub fn set_sim_speed(&mut self, sim_speed: f64) -> Result<()> {
        validate_sim_speed(sim_speed)?;
        self.sim_speed = sim_speed;
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    /// Mass-weighted mean position; zero for an empty collection
    pub fn center_of_mass(&self) -> NVec3 {
        self.mass_weighted_mean(|b| b.position)
    }

    /// Mass-weighted mean momentum; zero for an empty collection
    pub fn mean_momentum(&self) -> NVec3 {
        self.mass_weighted_mean(|b| b.momentum)
    }

    /// Mass-weighted mean of the cached velocities
    pub fn mean_velocity(&self) -> NVec3 {
        self.mass_weighted_mean(|b| b.velocity)
    }

    fn mass_weighted_mean(&self, f: impl Fn(&Body) -> NVec3) -> NVec3 {
        let total = self.total_mass();
        if total <= 0.0 {
            return NVec3::zeros();
        }
        self.bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + f(b) * b.mass)
            / total
    }
}

fn validate_sim_speed(sim_speed: f64) -> Result<()> {
    if sim_speed > 0.0 && sim_speed.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidSimSpeed { speed: sim_speed })
    }
}
