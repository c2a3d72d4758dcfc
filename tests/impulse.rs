use approx::assert_relative_eq;
use laser_debris_removal::constants::EARTH_MU_M3_S2;
use laser_debris_removal::impulse::{apply_impulse, RtoFrame};
use laser_debris_removal::kepler::KeplerState;
use laser_debris_removal::vector;

fn leo_state(e: f64, argp: f64, mean_anom: f64) -> KeplerState {
    let mut state = KeplerState {
        semi_major_axis: 6_878_137.0,
        eccentricity: e,
        inclination: 0.9,
        raan: 1.2,
        arg_perigee: argp,
        mean_anomaly: mean_anom,
        true_anomaly: 0.0,
    };
    state.resolve_true_anomaly();
    state
}

fn cartesian(state: &KeplerState) -> ([f64; 3], [f64; 3]) {
    let mut position = [0.0; 3];
    let mut velocity = [0.0; 3];
    state.to_cartesian(EARTH_MU_M3_S2, &mut position, &mut velocity);
    (position, velocity)
}

#[test]
fn rto_frame_is_orthonormal() {
    let state = leo_state(0.05, 0.4, 0.8);
    let (position, velocity) = cartesian(&state);
    let frame = RtoFrame::from_state(&position, &velocity);

    assert_relative_eq!(vector::norm(&frame.radial), 1.0, epsilon = 1e-12);
    assert_relative_eq!(vector::norm(&frame.transverse), 1.0, epsilon = 1e-12);
    assert_relative_eq!(vector::norm(&frame.out_of_plane), 1.0, epsilon = 1e-12);
    assert!(vector::dot(&frame.radial, &frame.transverse).abs() < 1e-12);
    assert!(vector::dot(&frame.radial, &frame.out_of_plane).abs() < 1e-12);
    assert!(vector::dot(&frame.transverse, &frame.out_of_plane).abs() < 1e-12);
    // The transverse axis leans prograde.
    assert!(vector::dot(&frame.transverse, &velocity) > 0.0);
}

#[test]
fn tangential_impulse_semi_major_axis_gain_matches_analytic() {
    let mut state = leo_state(0.05, 0.4, 0.8);
    let (position, velocity) = cartesian(&state);
    let frame = RtoFrame::from_state(&position, &velocity);
    let a_before = state.semi_major_axis;
    let e = state.eccentricity;
    let nu = state.true_anomaly;
    let n = state.mean_motion(EARTH_MU_M3_S2);

    let delta_v = 1e-3;
    apply_impulse(
        &mut state,
        &position,
        &velocity,
        &frame.transverse,
        delta_v,
        1e-4,
        EARTH_MU_M3_S2,
    );

    let expected = 2.0 * delta_v * (1.0 + e * nu.cos()) / (n * (1.0 - e * e).sqrt());
    let actual = state.semi_major_axis - a_before;
    assert_relative_eq!(actual, expected, max_relative = 0.01);
}

#[test]
fn retrograde_impulse_lowers_orbit() {
    let mut state = leo_state(0.02, 1.1, 2.2);
    let (position, velocity) = cartesian(&state);
    let retrograde = vector::scale(&vector::unit(&velocity), -1.0);
    let a_before = state.semi_major_axis;

    apply_impulse(
        &mut state,
        &position,
        &velocity,
        &retrograde,
        5.0,
        0.01,
        EARTH_MU_M3_S2,
    );
    assert!(state.semi_major_axis < a_before);
}

#[test]
fn sub_step_grid_agrees_with_single_step() {
    let coarse = {
        let mut state = leo_state(0.05, 0.4, 0.8);
        let (position, velocity) = cartesian(&state);
        let frame = RtoFrame::from_state(&position, &velocity);
        apply_impulse(
            &mut state,
            &position,
            &velocity,
            &frame.transverse,
            5e-3,
            5e-3,
            EARTH_MU_M3_S2,
        );
        state.semi_major_axis
    };
    let fine = {
        let mut state = leo_state(0.05, 0.4, 0.8);
        let (position, velocity) = cartesian(&state);
        let frame = RtoFrame::from_state(&position, &velocity);
        apply_impulse(
            &mut state,
            &position,
            &velocity,
            &frame.transverse,
            5e-3,
            2.5e-4,
            EARTH_MU_M3_S2,
        );
        state.semi_major_axis
    };
    assert_relative_eq!(coarse, fine, max_relative = 1e-6);
}

#[test]
fn normal_impulse_at_zero_latitude_tilts_plane_without_node_drift() {
    // At omega + nu = 0 the node term vanishes identically.
    let mut state = leo_state(0.05, 0.0, 0.0);
    let (position, velocity) = cartesian(&state);
    let frame = RtoFrame::from_state(&position, &velocity);
    let raan_before = state.raan;
    let inclination_before = state.inclination;

    apply_impulse(
        &mut state,
        &position,
        &velocity,
        &frame.out_of_plane,
        1e-2,
        1e-3,
        EARTH_MU_M3_S2,
    );
    assert_eq!(state.raan, raan_before);
    assert!(state.inclination > inclination_before);
}
