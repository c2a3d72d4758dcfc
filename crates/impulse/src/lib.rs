//! Applies a finite ΔV to a Keplerian state through sub-stepped Gaussian
//! variational equations, with the thrust direction resolved in the
//! radial-transverse-out-of-plane frame of the target orbit.

use ldr_core::vector::{self, Vector3};
use ldr_kepler::KeplerState;

/// Radial-transverse-out-of-plane frame of an orbiting body.
#[derive(Debug, Clone, Copy)]
pub struct RtoFrame {
    /// Outward radial unit vector.
    pub radial: Vector3,
    /// In-plane, prograde-leaning unit vector.
    pub transverse: Vector3,
    /// Orbit-normal unit vector.
    pub out_of_plane: Vector3,
}

impl RtoFrame {
    /// Build the frame from a Cartesian position/velocity pair.
    pub fn from_state(position: &Vector3, velocity: &Vector3) -> Self {
        let radial = vector::unit(position);
        let out_of_plane = vector::unit(&vector::cross(&radial, velocity));
        let transverse = vector::cross(&out_of_plane, &radial);
        Self {
            radial,
            transverse,
            out_of_plane,
        }
    }

    /// Project an ECI direction onto the frame axes.
    #[inline]
    pub fn project(&self, direction: &Vector3) -> (f64, f64, f64) {
        (
            vector::dot(direction, &self.radial),
            vector::dot(direction, &self.transverse),
            vector::dot(direction, &self.out_of_plane),
        )
    }
}

/// Mutate `state` as if an impulsive ΔV of magnitude `delta_v` were applied
/// along the ECI unit vector `direction`.
///
/// The ΔV is delivered in sub-steps of at most `max_step`; the remaining-ΔV
/// counter is decremented by the fixed `max_step` on every pass, so the step
/// grid never shifts with the residual. The true anomaly is left stale
/// relative to the updated `(e, M)`; callers re-solve after return.
pub fn apply_impulse(
    state: &mut KeplerState,
    position: &Vector3,
    velocity: &Vector3,
    direction: &Vector3,
    delta_v: f64,
    max_step: f64,
    mu: f64,
) {
    let frame = RtoFrame::from_state(position, velocity);
    let (f_radial, f_transverse, f_normal) = frame.project(direction);

    let mut remaining = delta_v;
    while remaining > 0.0 {
        let dv = remaining.min(max_step);
        gauss_step(state, f_radial, f_transverse, f_normal, dv, mu);
        remaining -= max_step;
    }
}

/// One Gaussian variational update for an impulse `dv` with the given RTO
/// direction components, evaluated at the current element values.
fn gauss_step(
    state: &mut KeplerState,
    f_radial: f64,
    f_transverse: f64,
    f_normal: f64,
    dv: f64,
    mu: f64,
) {
    let a = state.semi_major_axis;
    let e = state.eccentricity;
    let nu = state.true_anomaly;
    let n = state.mean_motion(mu);
    let root = (1.0 - e * e).sqrt();
    let shape = (a / mu).sqrt();
    let (sin_nu, cos_nu) = nu.sin_cos();
    let q = 1.0 + e * cos_nu;
    let (sin_lat, cos_lat) = (state.arg_perigee + nu).sin_cos();

    let da = 2.0 * a / root * shape * (e * sin_nu * f_radial + q * f_transverse) * dv;
    let de = root
        * shape
        * (sin_nu * f_radial + ((e + 2.0 * cos_nu + e * cos_nu * cos_nu) / q) * f_transverse)
        * dv;
    let di = root * shape * cos_lat / q * f_normal * dv;
    let draan = root * shape * sin_lat / (q * state.inclination.sin()) * f_normal * dv;
    let dargp = root * shape / e
        * (-cos_nu * f_radial + ((2.0 + e * cos_nu) / q) * sin_nu * f_transverse)
        * dv
        - state.inclination.cos() * draan;
    let dmean = n
        + (1.0 - e * e) / (n * a * e)
            * ((cos_nu - 2.0 * e / q) * f_radial - ((2.0 + e * cos_nu) / q) * sin_nu * f_transverse)
            * dv;

    state.semi_major_axis += da;
    state.eccentricity += de;
    state.inclination += di;
    state.raan += draan;
    state.arg_perigee += dargp;
    state.mean_anomaly += dmean;
}
