use approx::assert_relative_eq;
use laser_debris_removal::vector;
use laser_debris_removal::visibility::ViewGeometry;

const EARTH_RADIUS: f64 = 6_378_137.0;
const COLLISION_ALTITUDE: f64 = 800_000.0;
const OFFSET_ALTITUDE: f64 = 50_000.0;

fn geometry(range_max: f64, incidence_max: f64, field_of_view: f64) -> ViewGeometry {
    ViewGeometry {
        range_max,
        incidence_max,
        field_of_view,
        equatorial_radius: EARTH_RADIUS,
        collision_altitude: COLLISION_ALTITUDE,
        offset_altitude: OFFSET_ALTITUDE,
    }
}

/// Platform on the +x axis moving along +y, and the point where its canted
/// boresight grazes the collision shell.
fn platform_and_tangent_point() -> ([f64; 3], [f64; 3], [f64; 3]) {
    let shell = EARTH_RADIUS + COLLISION_ALTITUDE;
    let platform_position = [shell + OFFSET_ALTITUDE, 0.0, 0.0];
    let platform_velocity = [0.0, 7_450.0, 0.0];
    let cant = (shell / (shell + OFFSET_ALTITUDE)).acos();
    let tangent_point = [shell * cant.cos(), -shell * cant.sin(), 0.0];
    (platform_position, platform_velocity, tangent_point)
}

#[test]
fn range_predicate_flips_exactly_once_moving_outward() {
    let g = geometry(100_000.0, 3.2, 7.0);
    let mut flips = 0;
    let mut previous = g.within_range(&[0.0, 0.0, 0.0]);
    let mut distance = 1_000.0;
    while distance < 300_000.0 {
        let current = g.within_range(&[distance, 0.0, 0.0]);
        if current != previous {
            flips += 1;
        }
        previous = current;
        distance += 1_000.0;
    }
    assert_eq!(flips, 1);
}

#[test]
fn incidence_accepts_head_on_rejects_broadside() {
    let g = geometry(1e9, 0.5, 7.0);
    let fragment_velocity = [0.0, 7_500.0, 0.0];
    // Platform ahead along the fragment's track: the separation parallels the
    // velocity.
    assert!(g.within_incidence(&fragment_velocity, &[0.0, 100_000.0, 0.0]));
    // Platform abeam: ninety degrees off.
    assert!(!g.within_incidence(&fragment_velocity, &[100_000.0, 0.0, 0.0]));
}

#[test]
fn boresight_grazes_the_collision_shell() {
    let g = geometry(1e9, 3.2, 0.1);
    let (platform_position, platform_velocity, tangent_point) = platform_and_tangent_point();
    let boresight = g.boresight(&platform_position, &platform_velocity);

    // Rodrigues rotation preserves magnitude.
    assert_relative_eq!(
        vector::norm(&boresight),
        vector::norm(&platform_velocity),
        max_relative = 1e-12
    );

    let separation = vector::sub(&platform_position, &tangent_point);
    let toward_fragment = vector::scale(&separation, -1.0);
    assert!(vector::angle_between(&boresight, &toward_fragment) < 1e-6);
}

#[test]
fn fov_contains_shell_graze_rejects_forward_target() {
    let g = geometry(1e9, 3.2, 0.1);
    let (platform_position, platform_velocity, tangent_point) = platform_and_tangent_point();

    let separation = vector::sub(&platform_position, &tangent_point);
    assert!(g.within_fov(&platform_position, &platform_velocity, &separation));

    // A target the same distance ahead of the platform sits far outside the
    // retrograde cone.
    let ahead = vector::add(
        &platform_position,
        &[0.0, vector::norm(&separation), 0.0],
    );
    let separation_ahead = vector::sub(&platform_position, &ahead);
    assert!(!g.within_fov(&platform_position, &platform_velocity, &separation_ahead));
}

#[test]
fn composite_predicate_requires_all_three_conditions() {
    let (platform_position, platform_velocity, tangent_point) = platform_and_tangent_point();
    let separation = vector::sub(&platform_position, &tangent_point);
    // The fragment flies up its own line of sight towards the platform.
    let fragment_velocity = vector::scale(&vector::unit(&separation), 7_450.0);

    let pass = geometry(1e9, 0.5, 0.1);
    assert!(pass.in_view(
        &platform_position,
        &platform_velocity,
        &tangent_point,
        &fragment_velocity
    ));

    let short_range = geometry(100_000.0, 0.5, 0.1);
    assert!(!short_range.in_view(
        &platform_position,
        &platform_velocity,
        &tangent_point,
        &fragment_velocity
    ));

    let tight_incidence = geometry(1e9, 1e-3, 0.1);
    let broadside_velocity = [0.0, 0.0, 7_450.0];
    assert!(!tight_incidence.in_view(
        &platform_position,
        &platform_velocity,
        &tangent_point,
        &broadside_velocity
    ));

    let tight_fov = geometry(1e9, 0.5, 1e-4);
    let nudged = vector::add(&tangent_point, &[0.0, 0.0, 50_000.0]);
    let nudged_velocity = vector::scale(
        &vector::unit(&vector::sub(&platform_position, &nudged)),
        7_450.0,
    );
    assert!(!tight_fov.in_view(
        &platform_position,
        &platform_velocity,
        &nudged,
        &nudged_velocity
    ));
}
