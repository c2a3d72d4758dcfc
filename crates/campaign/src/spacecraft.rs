//! The laser platform's orbital state and pulse bookkeeping.

use ldr_core::vector::Vector3;
use ldr_kepler::{GravityModel, KeplerState};

/// Laser platform state: one Kepler set plus its cached Cartesian state.
#[derive(Debug, Clone)]
pub struct Spacecraft {
    pub state: KeplerState,
    pub position: Vector3,
    pub velocity: Vector3,
    /// Simulation time of the most recent pulse train (s).
    pub last_pulse_time: f64,
}

impl Spacecraft {
    /// Seed a circular orbit one offset above the collision shell, phased and
    /// oriented at the given angles.
    pub fn seed(
        gravity: &GravityModel,
        collision_altitude: f64,
        offset_altitude: f64,
        inclination: f64,
        raan: f64,
        mean_anomaly: f64,
    ) -> Self {
        let mut state = KeplerState {
            semi_major_axis: gravity.equatorial_radius + collision_altitude + offset_altitude,
            eccentricity: 0.0,
            inclination,
            raan,
            arg_perigee: 0.0,
            mean_anomaly,
            true_anomaly: 0.0,
        };
        state.resolve_true_anomaly();
        Self {
            state,
            position: [0.0; 3],
            velocity: [0.0; 3],
            last_pulse_time: 0.0,
        }
    }

    /// Refresh the cached Cartesian state from the current elements.
    pub fn refresh_cartesian(&mut self, mu: f64) {
        let mut position = [0.0; 3];
        let mut velocity = [0.0; 3];
        self.state.to_cartesian(mu, &mut position, &mut velocity);
        self.position = position;
        self.velocity = velocity;
    }
}
