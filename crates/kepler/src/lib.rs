//! Keplerian element kernels: anomaly conversion, Kepler→Cartesian state, and
//! secular J2 propagation.
//!
//! The kernels never allocate and never fail; hyperbolic or degenerate inputs
//! are the caller's responsibility to filter.

use ldr_core::constants;
use ldr_core::vector::Vector3;

/// Central-body gravity model shared by every propagation kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    /// Gravitational parameter (m³/s²).
    pub mu: f64,
    /// Second zonal harmonic (dimensionless).
    pub j2: f64,
    /// Equatorial radius (m).
    pub equatorial_radius: f64,
}

impl Default for GravityModel {
    fn default() -> Self {
        Self {
            mu: constants::EARTH_MU_M3_S2,
            j2: constants::EARTH_J2,
            equatorial_radius: constants::EARTH_EQUATORIAL_RADIUS_M,
        }
    }
}

/// Osculating Keplerian elements of one orbiting object, SI units and radians.
///
/// `true_anomaly` is always derived from `(eccentricity, mean_anomaly)`; any
/// mutation of those two must be followed by [`KeplerState::resolve_true_anomaly`]
/// before the state is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerState {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_perigee: f64,
    pub mean_anomaly: f64,
    pub true_anomaly: f64,
}

/// Solve Kepler's equation `E - e·sin E = M` and return the true anomaly.
///
/// Five Newton steps from `E = 0` are sufficient across the `e < ~0.3`
/// fragment population; larger eccentricities must be filtered upstream.
pub fn true_anomaly_from_mean(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let mut ecc_anomaly = 0.0_f64;
    for _ in 0..5 {
        let residual = ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly;
        let slope = 1.0 - eccentricity * ecc_anomaly.cos();
        ecc_anomaly -= residual / slope;
    }
    let factor = ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt();
    2.0 * (factor * (ecc_anomaly / 2.0).tan()).atan()
}

impl KeplerState {
    /// Mean motion `n = sqrt(mu/a³)` (rad/s).
    #[inline]
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Re-derive the true anomaly from the current `(e, M)` pair.
    #[inline]
    pub fn resolve_true_anomaly(&mut self) {
        self.true_anomaly = true_anomaly_from_mean(self.eccentricity, self.mean_anomaly);
    }

    /// Periapsis radius `a(1 - e)` (m).
    #[inline]
    pub fn periapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apoapsis radius `a(1 + e)` (m).
    #[inline]
    pub fn apoapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Whether the orbit is a valid bound ellipse. NaN elements fail the test.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.eccentricity >= 0.0 && self.eccentricity < 1.0 && self.semi_major_axis > 0.0
    }

    /// Perifocal-to-ECI state conversion, written into caller-provided buffers.
    pub fn to_cartesian(&self, mu: f64, position: &mut Vector3, velocity: &mut Vector3) {
        let e = self.eccentricity;
        let (sin_nu, cos_nu) = self.true_anomaly.sin_cos();
        let semi_latus = self.semi_major_axis * (1.0 - e * e);
        let radius = semi_latus / (1.0 + e * cos_nu);
        let angular_momentum = (mu * semi_latus).sqrt();

        let x_pf = radius * cos_nu;
        let y_pf = radius * sin_nu;
        let vx_pf = -(mu / angular_momentum) * sin_nu;
        let vy_pf = (mu / angular_momentum) * (e + cos_nu);

        let (sin_raan, cos_raan) = self.raan.sin_cos();
        let (sin_inc, cos_inc) = self.inclination.sin_cos();
        let (sin_argp, cos_argp) = self.arg_perigee.sin_cos();

        let r11 = cos_raan * cos_argp - sin_raan * sin_argp * cos_inc;
        let r12 = -cos_raan * sin_argp - sin_raan * cos_argp * cos_inc;
        let r21 = sin_raan * cos_argp + cos_raan * sin_argp * cos_inc;
        let r22 = -sin_raan * sin_argp + cos_raan * cos_argp * cos_inc;
        let r31 = sin_argp * sin_inc;
        let r32 = cos_argp * sin_inc;

        position[0] = r11 * x_pf + r12 * y_pf;
        position[1] = r21 * x_pf + r22 * y_pf;
        position[2] = r31 * x_pf + r32 * y_pf;
        velocity[0] = r11 * vx_pf + r12 * vy_pf;
        velocity[1] = r21 * vx_pf + r22 * vy_pf;
        velocity[2] = r31 * vx_pf + r32 * vy_pf;
    }

    /// Secular J2 propagation from `t_ref` to `t`.
    ///
    /// Only the secular drift of `Ω`, `ω`, and `M` is modeled; `a`, `e`, and
    /// `i` are held constant and short-periodic terms are omitted.
    pub fn propagate_j2(&mut self, model: &GravityModel, t_ref: f64, t: f64) {
        let dt = t - t_ref;
        let n = self.mean_motion(model.mu);
        let e2 = self.eccentricity * self.eccentricity;
        let denom = self.semi_major_axis * self.semi_major_axis * (1.0 - e2) * (1.0 - e2);
        let re2 = model.equatorial_radius * model.equatorial_radius;
        let (sin_inc, cos_inc) = self.inclination.sin_cos();

        self.raan -= 1.5 * n * re2 * model.j2 * cos_inc / denom * dt;
        self.arg_perigee += 0.75 * n * re2 * model.j2 * (4.0 - 5.0 * sin_inc * sin_inc) / denom * dt;
        self.mean_anomaly += n * dt;
        self.resolve_true_anomaly();
    }
}
