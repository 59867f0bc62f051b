//! Momentum <-> velocity conversion under the simplified relativistic law
//!
//! Momentum is the integrated quantity; velocity is derived from it on demand
//! so that speeds stay below the light-speed cap `c = 24` however large the
//! momentum grows

use super::states::NVec3;
use super::vecmath::normalize_or_zero;
use crate::error::{Result, SimError};

/// Light-speed cap in simulation units
pub const SPEED_OF_LIGHT: f64 = 24.0;

/// `1 / c^2`, kept at the literal value scenes were tuned with
pub const INV_C2: f64 = 0.00173611111;

/// Largest representable speed below [`SPEED_OF_LIGHT`]
///
/// With the literal [`INV_C2`] the speed law tends to slightly more than 24,
/// so derived speeds are capped here.
pub const MAX_SPEED: f64 = 23.999999999999996;

/// Velocity for a given momentum: `p^ * |p| / hypot(1, |p| / c)`
///
/// Equivalent to `sqrt(|p|^2 / (1 + |p|^2 / c^2))`, but stays finite and
/// below `c` for any finite momentum. Returns zero for zero momentum.
///
/// ```
/// use relsim::simulation::kinematics::velocity_from_momentum;
/// use relsim::NVec3;
///
/// let v = velocity_from_momentum(NVec3::new(1.0e4, 0.0, 0.0));
/// assert!(v.norm() < 24.0);
/// assert!(velocity_from_momentum(NVec3::new(1.0e200, 0.0, 0.0)).norm() < 24.0);
/// assert_eq!(velocity_from_momentum(NVec3::zeros()), NVec3::zeros());
/// ```
pub fn velocity_from_momentum(momentum: NVec3) -> NVec3 {
    // scale first so |p| never squares past f64::MAX
    let scale = momentum.amax();
    if scale == 0.0 {
        return NVec3::zeros();
    }
    let scaled = momentum / scale;
    let scaled_norm = scaled.norm();
    let p = scaled_norm * scale;

    let speed = p / 1.0_f64.hypot(p * INV_C2.sqrt());
    scaled / scaled_norm * speed.min(MAX_SPEED)
}

/// Lorentz factor for a speed, without range checks
fn gamma(speed: f64) -> f64 {
    1.0 / (1.0 - speed * speed * INV_C2).sqrt()
}

/// Momentum that produces `velocity`: `v^ * gamma * |v|`
///
/// Speeds at or above [`SPEED_OF_LIGHT`] are rejected; they would otherwise
/// produce a non-finite momentum.
pub fn momentum_for_velocity(velocity: NVec3) -> Result<NVec3> {
    let speed = velocity.norm();
    if !speed.is_finite() || speed >= SPEED_OF_LIGHT {
        return Err(SimError::Superluminal { speed });
    }
    Ok(normalize_or_zero(velocity) * gamma(speed) * speed)
}
