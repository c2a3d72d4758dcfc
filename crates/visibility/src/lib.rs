//! Geometric visibility tests between the laser platform and a fragment.
//!
//! Three conditions gate a laser engagement: slant range, illumination
//! incidence, and containment in the instrument's field-of-view cone. All
//! three operate on Cartesian states; the composite predicate is their AND.

use ldr_core::vector::{self, Vector3};

/// Visibility limits plus the constants that fix the boresight cant angle.
#[derive(Debug, Clone, Copy)]
pub struct ViewGeometry {
    /// Maximum slant range (m).
    pub range_max: f64,
    /// Maximum angle between fragment velocity and the line of sight (rad).
    pub incidence_max: f64,
    /// Full field-of-view cone angle (rad).
    pub field_of_view: f64,
    /// Earth equatorial radius (m).
    pub equatorial_radius: f64,
    /// Fragment cloud altitude (m).
    pub collision_altitude: f64,
    /// Platform altitude above the cloud (m).
    pub offset_altitude: f64,
}

impl ViewGeometry {
    /// Nominal laser pointing: the anti-velocity direction canted down so the
    /// boresight grazes the fragment cloud shell behind the platform.
    pub fn boresight(&self, platform_position: &Vector3, platform_velocity: &Vector3) -> Vector3 {
        let anti_velocity = vector::scale(platform_velocity, -1.0);
        let shell_radius = self.equatorial_radius + self.collision_altitude;
        let cant = (shell_radius / (shell_radius + self.offset_altitude)).acos();
        let axis = vector::unit(&vector::cross(platform_position, &anti_velocity));
        vector::rotate_about(&anti_velocity, &axis, cant)
    }

    /// Slant-range test on the platform-to-fragment separation `p = r_sc - r_d`.
    #[inline]
    pub fn within_range(&self, separation: &Vector3) -> bool {
        vector::norm(separation) < self.range_max
    }

    /// Near-head-on illumination: the fragment flies towards the platform.
    #[inline]
    pub fn within_incidence(&self, fragment_velocity: &Vector3, separation: &Vector3) -> bool {
        vector::angle_between(fragment_velocity, separation) < self.incidence_max
    }

    /// Containment of the fragment direction in the boresight cone.
    pub fn within_fov(
        &self,
        platform_position: &Vector3,
        platform_velocity: &Vector3,
        separation: &Vector3,
    ) -> bool {
        let boresight = self.boresight(platform_position, platform_velocity);
        let toward_fragment = vector::scale(separation, -1.0);
        vector::angle_between(&boresight, &toward_fragment) < 0.5 * self.field_of_view
    }

    /// Composite predicate: range AND incidence AND field of view.
    pub fn in_view(
        &self,
        platform_position: &Vector3,
        platform_velocity: &Vector3,
        fragment_position: &Vector3,
        fragment_velocity: &Vector3,
    ) -> bool {
        let separation = vector::sub(platform_position, fragment_position);
        self.within_range(&separation)
            && self.within_incidence(fragment_velocity, &separation)
            && self.within_fov(platform_position, platform_velocity, &separation)
    }
}
