//! Resolves the time at which the composite visibility predicate flips
//! inside a bracketing interval.

use ldr_kepler::{GravityModel, KeplerState};
use ldr_visibility::ViewGeometry;

/// Evaluate the composite predicate at `t`, re-propagating both bodies from
/// their cached reference states at `t_ref`.
fn in_view_at(
    platform_ref: &KeplerState,
    fragment_ref: &KeplerState,
    t_ref: f64,
    t: f64,
    gravity: &GravityModel,
    geometry: &ViewGeometry,
) -> bool {
    let mut platform = *platform_ref;
    let mut fragment = *fragment_ref;
    platform.propagate_j2(gravity, t_ref, t);
    fragment.propagate_j2(gravity, t_ref, t);

    let mut platform_position = [0.0; 3];
    let mut platform_velocity = [0.0; 3];
    let mut fragment_position = [0.0; 3];
    let mut fragment_velocity = [0.0; 3];
    platform.to_cartesian(gravity.mu, &mut platform_position, &mut platform_velocity);
    fragment.to_cartesian(gravity.mu, &mut fragment_position, &mut fragment_velocity);

    geometry.in_view(
        &platform_position,
        &platform_velocity,
        &fragment_position,
        &fragment_velocity,
    )
}

/// Find the predicate transition inside `[t_left, t_right]`, one endpoint of
/// which must be the reference epoch `t_ref`.
///
/// Propagation always restarts from the reference states, never
/// incrementally, so the result carries no accumulated stepping error. When
/// the predicate agrees at both endpoints the outer endpoint is returned: a
/// window narrower than the bracket is conservatively discarded.
pub fn transition_time(
    platform: &KeplerState,
    fragment: &KeplerState,
    t_ref: f64,
    mut t_left: f64,
    mut t_right: f64,
    gravity: &GravityModel,
    geometry: &ViewGeometry,
    tolerance: f64,
) -> f64 {
    let left_value = in_view_at(platform, fragment, t_ref, t_left, gravity, geometry);
    let right_value = in_view_at(platform, fragment, t_ref, t_right, gravity, geometry);
    if left_value == right_value {
        return if t_left == t_ref { t_right } else { t_left };
    }

    while t_right - t_left > tolerance {
        let midpoint = 0.5 * (t_left + t_right);
        let mid_value = in_view_at(platform, fragment, t_ref, midpoint, gravity, geometry);
        if mid_value == left_value {
            t_left = midpoint;
        } else {
            t_right = midpoint;
        }
    }
    0.5 * (t_left + t_right)
}
