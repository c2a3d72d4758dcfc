//! Per-fragment simulation state.

use ldr_catalog::FragmentRecord;
use ldr_kepler::KeplerState;

/// One tracked debris fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Stable catalogue index, preserved across compaction.
    pub id: usize,
    pub state: KeplerState,
    /// Mass (kg).
    pub mass: f64,
    /// Area-to-mass ratio (m²/kg).
    pub area_to_mass: f64,
    /// The laser has fired on this fragment; it is never targeted again.
    pub shot: bool,
    /// The orbit has decayed below the removal altitude or left the elliptic
    /// regime; the fragment is inert from here on.
    pub removed: bool,
}

impl Fragment {
    /// Build a fragment from a catalogue row, resolving the true anomaly.
    pub fn from_record(id: usize, record: &FragmentRecord) -> Self {
        let mut state = KeplerState {
            semi_major_axis: record.a,
            eccentricity: record.e,
            inclination: record.i,
            raan: record.long_asc,
            arg_perigee: record.arg_peri,
            mean_anomaly: record.mean_anom,
            true_anomaly: 0.0,
        };
        state.resolve_true_anomaly();
        Self {
            id,
            state,
            mass: record.mass,
            area_to_mass: record.area_to_mass,
            shot: false,
            removed: false,
        }
    }

    /// Removal decision on the current elements: perigee or apogee beneath
    /// the removal altitude, or the orbit is no longer a bound ellipse.
    pub fn decayed(&self, equatorial_radius: f64, removal_altitude: f64) -> bool {
        if !self.state.is_bound() {
            return true;
        }
        let perigee_altitude = self.state.periapsis_radius() - equatorial_radius;
        let apogee_altitude = self.state.apoapsis_radius() - equatorial_radius;
        perigee_altitude < removal_altitude || apogee_altitude < removal_altitude
    }
}
