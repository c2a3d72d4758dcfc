//! Catalogue filtering, spacecraft seeding, and end-to-end campaign runs.

use ldr_catalog::FragmentRecord;
use log::info;
use rayon::prelude::*;

use crate::driver::{Campaign, CampaignOutcome, CampaignParams};
use crate::fragment::Fragment;
use crate::spacecraft::Spacecraft;

/// Fragments at or above this equivalent diameter are not serviceable targets.
pub const MAX_TARGET_DIAMETER_M: f64 = 0.1;

/// Filter the catalogue down to the serviceable fragment population.
///
/// Keeps rows whose name matches the configured tag, whose equivalent
/// diameter is below [`MAX_TARGET_DIAMETER_M`], whose orbit is a proper
/// ellipse, and whose perigee and apogee both clear the removal altitude
/// (fragments already decaying naturally are dropped). The population is
/// capped at the configured maximum.
pub fn filter_population(records: &[FragmentRecord], params: &CampaignParams) -> Vec<Fragment> {
    let radius_floor = params.gravity.equatorial_radius + params.removal_altitude;
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.name == params.fragment_tag)
        .filter(|(_, record)| record.d_eq < MAX_TARGET_DIAMETER_M)
        .filter(|(_, record)| record.e > 0.0 && record.e < 1.0)
        .filter(|(_, record)| {
            record.a * (1.0 - record.e) > radius_floor && record.a * (1.0 + record.e) > radius_floor
        })
        .take(params.max_fragments)
        .map(|(id, record)| Fragment::from_record(id, record))
        .collect()
}

/// Seed the laser platform from the initial population statistics: a circular
/// orbit one offset above the collision shell, phased and oriented at the
/// population means.
pub fn seed_spacecraft(params: &CampaignParams, fragments: &[Fragment]) -> Spacecraft {
    let count = fragments.len().max(1) as f64;
    let mut inclination = 0.0;
    let mut raan = 0.0;
    let mut mean_anomaly = 0.0;
    for fragment in fragments {
        inclination += fragment.state.inclination;
        raan += fragment.state.raan;
        mean_anomaly += fragment.state.mean_anomaly;
    }
    Spacecraft::seed(
        &params.gravity,
        params.collision_altitude,
        params.offset_altitude,
        inclination / count,
        raan / count,
        mean_anomaly / count,
    )
}

/// Run one configuration end to end: filter the catalogue, let the cloud
/// spread to the campaign start, then hand over to the epoch driver.
pub fn run_campaign(records: &[FragmentRecord], params: &CampaignParams) -> CampaignOutcome {
    let mut fragments = filter_population(records, params);
    info!(
        "{} of {} catalogue rows pass the population filters",
        fragments.len(),
        records.len()
    );
    if fragments.is_empty() {
        return CampaignOutcome {
            elapsed: Vec::new(),
            removed_fraction: Vec::new(),
            shots: Vec::new(),
            fragments_total: 0,
            fragments_removed: 0,
            time_required: 0.0,
            fragments: Vec::new(),
        };
    }

    // Platform angles come from the population at the collision epoch.
    let mut spacecraft = seed_spacecraft(params, &fragments);

    let gravity = params.gravity;
    let start = params.campaign_start;
    fragments
        .par_iter_mut()
        .for_each(|fragment| fragment.state.propagate_j2(&gravity, 0.0, start));
    spacecraft.state.propagate_j2(&gravity, 0.0, start);

    Campaign::new(params.clone(), spacecraft, fragments).run()
}
