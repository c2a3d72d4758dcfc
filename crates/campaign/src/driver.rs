//! The epoch-driven campaign loop: parallel propagation, visibility
//! resolution, targeting, and event-driven time advance.

use ldr_core::vector::{self, Vector3};
use ldr_kepler::GravityModel;
use ldr_visibility::ViewGeometry;
use log::{debug, info};
use rayon::prelude::*;

use crate::bisection;
use crate::fragment::Fragment;
use crate::spacecraft::Spacecraft;

/// Every knob of a single campaign run, SI units and radians.
#[derive(Debug, Clone)]
pub struct CampaignParams {
    pub gravity: GravityModel,
    /// Catalogue name tag selecting the collision's fragments.
    pub fragment_tag: String,
    /// Collision altitude (m).
    pub collision_altitude: f64,
    /// Platform altitude above the collision shell (m).
    pub offset_altitude: f64,
    /// Fragment cap after filtering.
    pub max_fragments: usize,
    /// Campaign start, seconds after the collision epoch.
    pub campaign_start: f64,
    /// Removal fraction at which the campaign halts.
    pub target_fraction: f64,
    /// Impulse sub-step (m/s).
    pub max_dv_step: f64,
    /// Full field-of-view cone angle (rad).
    pub field_of_view: f64,
    /// Maximum slant range (m).
    pub range_max: f64,
    /// Maximum illumination incidence (rad).
    pub incidence_max: f64,
    /// Ablation dwell per engagement (s).
    pub ablation_time: f64,
    /// Scan dwell per epoch (s).
    pub scan_time: f64,
    /// Laser cooldown after a pulse train (s).
    pub cooldown_time: f64,
    /// Laser fluence on target (J/m²).
    pub fluence: f64,
    /// Momentum coupling coefficient (N·s/J).
    pub coupling: f64,
    /// Pulse repetition rate (Hz).
    pub pulse_rate: f64,
    /// Removal altitude (m).
    pub removal_altitude: f64,
    /// Simulated-time cap (s).
    pub time_cap: f64,
    /// Bisection tolerance on visibility-window edges (s).
    pub bisect_tol: f64,
    /// Compaction stride in integer removal percentage; 0 disables compaction.
    pub compact_percent: u32,
}

impl CampaignParams {
    /// Scan-plus-ablation dwell required to service one fragment.
    #[inline]
    pub fn dwell(&self) -> f64 {
        self.scan_time + self.ablation_time
    }

    /// Visibility geometry derived from the limits and altitudes.
    pub fn view_geometry(&self) -> ViewGeometry {
        ViewGeometry {
            range_max: self.range_max,
            incidence_max: self.incidence_max,
            field_of_view: self.field_of_view,
            equatorial_radius: self.gravity.equatorial_radius,
            collision_altitude: self.collision_altitude,
            offset_altitude: self.offset_altitude,
        }
    }

    /// Retrograde ΔV imparted by one full ablation pass on a fragment with
    /// the given area-to-mass ratio.
    #[inline]
    pub fn shot_delta_v(&self, area_to_mass: f64) -> f64 {
        self.fluence * self.coupling * self.pulse_rate * area_to_mass * self.ablation_time
    }
}

/// How the clock advances out of an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochEvent {
    /// A fragment was serviced; the advance includes a second dwell and the
    /// laser cooldown.
    ShotFired,
    /// Nothing was serviceable; the advance is one dwell.
    ScanOnly,
}

/// One laser firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Simulation time of the pulse train (s).
    pub time: f64,
    /// Catalogue id of the fragment serviced.
    pub fragment: usize,
}

/// Recorded result of a finished campaign.
#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    /// Elapsed seconds since campaign start, one entry per epoch.
    pub elapsed: Vec<f64>,
    /// Cumulative removed fraction, parallel to `elapsed`.
    pub removed_fraction: Vec<f64>,
    pub shots: Vec<Shot>,
    pub fragments_total: usize,
    pub fragments_removed: usize,
    /// Simulated seconds from campaign start to termination.
    pub time_required: f64,
    /// Working set remaining at termination (post-compaction).
    pub fragments: Vec<Fragment>,
}

impl CampaignOutcome {
    /// Final removed fraction; zero when nothing passed the filters.
    pub fn final_fraction(&self) -> f64 {
        if self.fragments_total == 0 {
            0.0
        } else {
            self.fragments_removed as f64 / self.fragments_total as f64
        }
    }
}

/// The campaign driver. Owns every per-fragment array; inner kernels only
/// ever see views over single objects.
pub struct Campaign {
    params: CampaignParams,
    geometry: ViewGeometry,
    spacecraft: Spacecraft,
    fragments: Vec<Fragment>,
    positions: Vec<Vector3>,
    velocities: Vec<Vector3>,
    in_view: Vec<bool>,
    total: usize,
    removed: usize,
    /// Simulation clock (s).
    clock: f64,
    /// Epoch at which every element set was last made consistent (s).
    state_epoch: f64,
    /// Integer removal percentage at the last compaction.
    compaction_mark: u32,
    elapsed: Vec<f64>,
    fraction: Vec<f64>,
    shots: Vec<Shot>,
}

impl Campaign {
    /// Assemble a driver over an already-filtered, already-seeded population
    /// whose elements are consistent at the campaign start.
    pub fn new(params: CampaignParams, spacecraft: Spacecraft, fragments: Vec<Fragment>) -> Self {
        let count = fragments.len();
        let start = params.campaign_start;
        Self {
            geometry: params.view_geometry(),
            spacecraft,
            positions: vec![[0.0; 3]; count],
            velocities: vec![[0.0; 3]; count],
            in_view: vec![false; count],
            total: count,
            removed: 0,
            clock: start,
            state_epoch: start,
            compaction_mark: 0,
            elapsed: Vec::new(),
            fraction: Vec::new(),
            shots: Vec::new(),
            fragments,
            params,
        }
    }

    /// Run to the target removal fraction or the simulated-time cap.
    pub fn run(mut self) -> CampaignOutcome {
        let dwell = self.params.dwell();
        let start = self.params.campaign_start;
        info!(
            "campaign start: {} fragments, target {:.1}%",
            self.total,
            self.params.target_fraction * 100.0
        );
        if self.total > 0 {
            loop {
                self.elapsed.push(self.clock - start);
                self.step(dwell);
                self.fraction.push(self.current_fraction());
                self.maybe_compact();
                if self.finished(start) {
                    break;
                }
            }
        }
        info!(
            "campaign end: {}/{} removed after {:.2} days, {} pulses",
            self.removed,
            self.total,
            (self.clock - start) / 86_400.0,
            self.shots.len()
        );
        CampaignOutcome {
            elapsed: self.elapsed,
            removed_fraction: self.fraction,
            shots: self.shots,
            fragments_total: self.total,
            fragments_removed: self.removed,
            time_required: self.clock - start,
            fragments: self.fragments,
        }
    }

    fn current_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.removed as f64 / self.total as f64
        }
    }

    fn finished(&self, start: f64) -> bool {
        self.current_fraction() >= self.params.target_fraction
            || self.clock - start >= self.params.time_cap
    }

    /// One epoch: propagate everything one dwell ahead, evaluate visibility,
    /// scan for a target, and advance the clock by the resulting event.
    fn step(&mut self, dwell: f64) -> EpochEvent {
        let t_eval = self.clock + dwell;
        let epoch = self.state_epoch;

        self.spacecraft
            .state
            .propagate_j2(&self.params.gravity, epoch, t_eval);
        self.spacecraft.refresh_cartesian(self.params.gravity.mu);

        // Data-parallel phase: each index owns a disjoint slot in every array.
        let gravity = self.params.gravity;
        let geometry = self.geometry;
        let platform_position = self.spacecraft.position;
        let platform_velocity = self.spacecraft.velocity;
        self.fragments
            .par_iter_mut()
            .zip(self.positions.par_iter_mut())
            .zip(self.velocities.par_iter_mut())
            .zip(self.in_view.par_iter_mut())
            .for_each(|(((fragment, position), velocity), seen)| {
                if fragment.removed {
                    *seen = false;
                    return;
                }
                fragment.state.propagate_j2(&gravity, epoch, t_eval);
                fragment.state.to_cartesian(gravity.mu, position, velocity);
                *seen = geometry.in_view(
                    &platform_position,
                    &platform_velocity,
                    position,
                    velocity,
                );
            });
        self.state_epoch = t_eval;
        self.clock = t_eval;

        let event = self.acquire_and_fire(dwell);
        if event == EpochEvent::ShotFired {
            self.clock += dwell + self.params.cooldown_time;
        }
        event
    }

    /// Ascending-index scan for the first fragment whose true visibility
    /// window covers a full dwell. At most one shot per epoch.
    fn acquire_and_fire(&mut self, dwell: f64) -> EpochEvent {
        let t = self.clock;
        for index in 0..self.fragments.len() {
            let fragment = &self.fragments[index];
            if fragment.removed || fragment.shot || !self.in_view[index] {
                continue;
            }
            let platform_state = self.spacecraft.state;
            let fragment_state = fragment.state;
            let entry = bisection::transition_time(
                &platform_state,
                &fragment_state,
                t,
                t - dwell,
                t,
                &self.params.gravity,
                &self.geometry,
                self.params.bisect_tol,
            );
            let exit = bisection::transition_time(
                &platform_state,
                &fragment_state,
                t,
                t,
                t + dwell,
                &self.params.gravity,
                &self.geometry,
                self.params.bisect_tol,
            );
            if exit - entry < dwell {
                continue;
            }
            self.fire(index, t);
            return EpochEvent::ShotFired;
        }
        EpochEvent::ScanOnly
    }

    /// Fire the laser at one fragment: retrograde impulse, removal decision,
    /// pulse bookkeeping.
    fn fire(&mut self, index: usize, t: f64) {
        let delta_v = self.params.shot_delta_v(self.fragments[index].area_to_mass);
        let position = self.positions[index];
        let velocity = self.velocities[index];
        let direction = vector::scale(&vector::unit(&velocity), -1.0);

        let fragment = &mut self.fragments[index];
        ldr_impulse::apply_impulse(
            &mut fragment.state,
            &position,
            &velocity,
            &direction,
            delta_v,
            self.params.max_dv_step,
            self.params.gravity.mu,
        );
        // The impulse leaves ν stale relative to the new (e, M).
        fragment.state.resolve_true_anomaly();
        fragment.shot = true;
        if fragment.decayed(
            self.params.gravity.equatorial_radius,
            self.params.removal_altitude,
        ) {
            fragment.removed = true;
            self.removed += 1;
        }
        let id = fragment.id;
        let removed = fragment.removed;
        self.spacecraft.last_pulse_time = t;
        self.shots.push(Shot { time: t, fragment: id });
        debug!(
            "pulse at t={:.1}s on fragment {id}: dv={delta_v:.3} m/s, {}",
            t,
            if removed { "removed" } else { "degraded" }
        );
    }

    /// Drop shot entries from every per-fragment array once the integer
    /// removal percentage has climbed one compaction stride.
    fn maybe_compact(&mut self) {
        let stride = self.params.compact_percent;
        if stride == 0 {
            return;
        }
        let percent = (self.current_fraction() * 100.0).floor() as u32;
        if percent < self.compaction_mark + stride {
            return;
        }
        self.compaction_mark = percent;
        let mask: Vec<bool> = self.fragments.iter().map(|fragment| !fragment.shot).collect();
        retain_masked(&mut self.fragments, &mask);
        retain_masked(&mut self.positions, &mask);
        retain_masked(&mut self.velocities, &mask);
        retain_masked(&mut self.in_view, &mask);
        debug!(
            "compacted working set to {} fragments at {percent}%",
            self.fragments.len()
        );
    }
}

/// Keep only the entries whose mask slot is true, preserving order.
fn retain_masked<T>(items: &mut Vec<T>, mask: &[bool]) {
    let mut keep = mask.iter().copied();
    items.retain(|_| keep.next().unwrap_or(false));
}
