//! Stateless vector helpers used by the physics engine
//!
//! Holds the fixed-order two-axis rotation used for spawn and camera
//! directions, the in-plane perpendicular used to seed circular orbits,
//! and the two-term gravity law with its Schwarzschild-like softening

use super::states::NVec3;

/// Mass-proportional distance scale, `r_s = m * 0.002`
pub const SCHWARZSCHILD_FACTOR: f64 = 0.002;

/// Floor applied to both denominators of the force law
pub const FORCE_FLOOR: f64 = 0.001;

/// Rotate `v` about X by `psi`, then rotate the result about Y by `theta`
///
/// This is not a general rotation: the axis order is fixed and must stay
/// that way so spawn directions and camera directions agree.
pub fn rotate(v: NVec3, theta: f64, psi: f64) -> NVec3 {
    let (sin_psi, cos_psi) = psi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    // about X
    let a = NVec3::new(
        v.x,
        v.y * cos_psi - v.z * sin_psi,
        v.y * sin_psi + v.z * cos_psi,
    );

    // about Y
    NVec3::new(
        a.x * cos_theta + a.z * sin_theta,
        a.y,
        a.z * cos_theta - a.x * sin_theta,
    )
}

/// In-plane (XZ) perpendicular: `(v.z, 0, -v.x)`
pub fn perpendicular(v: NVec3) -> NVec3 {
    NVec3::new(v.z, 0.0, -v.x)
}

/// Unit vector along `v`, or zero when `v` has no length
pub fn normalize_or_zero(v: NVec3) -> NVec3 {
    let n = v.norm();
    if n > 0.0 && n.is_finite() {
        v / n
    } else {
        NVec3::zeros()
    }
}

/// Schwarzschild-like radius of a single mass
pub fn schwarzschild_radius(mass: f64) -> f64 {
    mass * SCHWARZSCHILD_FACTOR
}

/// Magnitude of the pull body A exerts, as felt at `b`
///
/// `m_a / max((d - r_s)^2, eps) + 3 m_a / max((d - r_s)^3, eps)` with
/// `r_s = (m_a + m_b) * 0.002`. The inverse-cube term is a near-field boost,
/// not a mistake; both terms are needed for parity with existing scenes.
pub fn force_magnitude(a: NVec3, b: NVec3, mass_a: f64, mass_b: f64) -> f64 {
    let dist = (a - b).norm();
    let schwarz = schwarzschild_radius(mass_a + mass_b);
    let gap = dist - schwarz;

    let inverse_square = mass_a / gap.powi(2).max(FORCE_FLOOR);
    let inverse_cube = mass_a / gap.powi(3).max(FORCE_FLOOR) * 3.0;

    inverse_square + inverse_cube
}
