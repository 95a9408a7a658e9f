use bevy::prelude::*;
use std::f32::consts::TAU;
use viewer_constants::camera::OrbitLimits;

/// Camera position around the orbit target in spherical coordinates.
/// `polar` is measured from +Y, `azimuth` around +Y starting at +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                polar: 0.0,
                azimuth: 0.0,
            };
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let ring = self.polar.sin() * self.radius;
        Vec3::new(
            ring * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            ring * self.azimuth.cos(),
        )
    }
}

/// Orbit camera state: damped rotation around a target with bounded zoom.
///
/// Input only accumulates pending deltas; `update` applies them, clamps the
/// result to the configured limits and writes the camera transform. With
/// damping enabled each update applies `damping_factor` of the pending
/// rotation and pan, then decays what is left by `1 - damping_factor`, so
/// motion eases out over the following frames. Zoom is applied in full.
#[derive(Component, Debug, Clone)]
pub struct OrbitController {
    pub target: Vec3,
    pub limits: OrbitLimits,
    spherical: Option<Spherical>,
    polar_delta: f32,
    azimuth_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitController {
    pub fn new(target: Vec3, limits: OrbitLimits) -> Self {
        Self {
            target,
            limits,
            spherical: None,
            polar_delta: 0.0,
            azimuth_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Current spherical position, once the first update has run.
    pub fn spherical(&self) -> Option<Spherical> {
        self.spherical
    }

    pub fn distance(&self) -> Option<f32> {
        self.spherical.map(|s| s.radius)
    }

    /// Rotate from a pointer drag in pixels. A drag across the full viewport
    /// height turns the camera one full revolution.
    pub fn rotate(&mut self, delta_px: Vec2, viewport_height: f32) {
        if !self.limits.enable_rotate || viewport_height <= 0.0 {
            return;
        }
        let per_pixel = TAU / viewport_height * self.limits.rotate_speed;
        self.azimuth_delta -= delta_px.x * per_pixel;
        self.polar_delta -= delta_px.y * per_pixel;
    }

    /// Rotate by explicit angles in radians.
    pub fn rotate_by(&mut self, azimuth: f32, polar: f32) {
        if !self.limits.enable_rotate {
            return;
        }
        self.azimuth_delta += azimuth;
        self.polar_delta += polar;
    }

    /// Multiplier applied per wheel notch.
    pub fn zoom_step(&self) -> f32 {
        0.95_f32.powf(self.limits.zoom_speed)
    }

    /// Move towards the target; `factor` < 1 shrinks the orbit radius.
    pub fn dolly_in(&mut self, factor: f32) {
        if self.limits.enable_zoom && factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if self.limits.enable_zoom && factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Mouse wheel; positive notches zoom in.
    pub fn wheel(&mut self, notches: f32) {
        if notches == 0.0 {
            return;
        }
        let step = self.zoom_step().powf(notches.abs());
        if notches > 0.0 {
            self.dolly_in(step);
        } else {
            self.dolly_out(step);
        }
    }

    /// Two-finger pinch; fingers moving apart zoom in.
    pub fn pinch(&mut self, previous_distance: f32, current_distance: f32) {
        if previous_distance <= 0.0 || current_distance <= 0.0 {
            return;
        }
        let ratio = (current_distance / previous_distance).powf(self.limits.zoom_speed);
        self.dolly_out(ratio);
    }

    /// Screen-space pan from a pointer drag, scaled so the point under the
    /// cursor at target depth follows the pointer.
    pub fn pan(
        &mut self,
        delta_px: Vec2,
        viewport_height: f32,
        vertical_fov: f32,
        camera_rotation: Quat,
    ) {
        if !self.limits.enable_pan || viewport_height <= 0.0 {
            return;
        }
        let Some(spherical) = self.spherical else {
            return;
        };
        let target_distance = spherical.radius * (vertical_fov * 0.5).tan();
        let world_per_pixel = 2.0 * target_distance / viewport_height * self.limits.pan_speed;
        let right = camera_rotation * Vec3::X;
        let up = camera_rotation * Vec3::Y;
        self.pan_offset += -right * delta_px.x * world_per_pixel + up * delta_px.y * world_per_pixel;
    }

    /// Apply pending input, clamp to limits and place the camera.
    /// Returns true while the camera is still moving.
    pub fn update(&mut self, transform: &mut Transform) -> bool {
        let limits = self.limits;
        let mut spherical = self
            .spherical
            .unwrap_or_else(|| Spherical::from_offset(transform.translation - self.target));

        let step = if limits.damping_factor > 0.0 {
            limits.damping_factor
        } else {
            1.0
        };

        spherical.azimuth += self.azimuth_delta * step;
        spherical.polar += self.polar_delta * step;
        spherical.polar = spherical
            .polar
            .clamp(limits.min_polar_angle, limits.max_polar_angle);
        spherical.radius =
            (spherical.radius * self.scale).clamp(limits.min_distance, limits.max_distance);
        self.target += self.pan_offset * step;

        let previous = transform.translation;
        transform.translation = self.target + spherical.to_offset();
        *transform = transform.looking_at(self.target, view_up(spherical));
        self.spherical = Some(spherical);

        if limits.damping_factor > 0.0 {
            let decay = 1.0 - limits.damping_factor;
            self.azimuth_delta *= decay;
            self.polar_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.azimuth_delta = 0.0;
            self.polar_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous.distance_squared(transform.translation) > 1e-10
    }
}

/// Up vector for `looking_at`. At the poles world +Y is parallel to the view
/// direction, so the horizontal direction of the current azimuth stands in.
fn view_up(spherical: Spherical) -> Vec3 {
    if spherical.polar.sin().abs() > 1e-4 {
        return Vec3::Y;
    }
    let towards_camera = Vec3::new(spherical.azimuth.sin(), 0.0, spherical.azimuth.cos());
    if spherical.polar.cos() > 0.0 {
        -towards_camera
    } else {
        towards_camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use viewer_constants::camera::{INITIAL_POSITION, ORBIT_LIMITS, ORBIT_TARGET};

    fn controller() -> (OrbitController, Transform) {
        (
            OrbitController::new(ORBIT_TARGET, ORBIT_LIMITS),
            Transform::from_translation(INITIAL_POSITION),
        )
    }

    #[test]
    fn spherical_round_trip_of_axis_offsets() {
        let s = Spherical::from_offset(Vec3::new(0.0, 0.0, 5.0));
        assert!((s.radius - 5.0).abs() < 1e-6);
        assert!((s.polar - PI / 2.0).abs() < 1e-6);
        assert!(s.azimuth.abs() < 1e-6);
        assert!((s.to_offset() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn first_update_pushes_camera_out_to_min_distance() {
        let (mut orbit, mut transform) = controller();
        orbit.update(&mut transform);
        assert!((transform.translation.length() - 15.0).abs() < 1e-4);
        assert!((orbit.distance().unwrap() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_never_leaves_distance_bounds() {
        let (mut orbit, mut transform) = controller();
        let pattern = [3.0, -7.0, 12.0, 40.0, -80.0, 1.0, -1.0, 25.0, -3.5, 100.0];
        for round in 0..50 {
            let notches = pattern[round % pattern.len()];
            orbit.wheel(notches);
            if round % 3 == 0 {
                orbit.pinch(10.0, 10.0 + round as f32);
            }
            orbit.update(&mut transform);
            let distance = transform.translation.distance(orbit.target);
            assert!(
                (15.0 - 1e-3..=50.0 + 1e-3).contains(&distance),
                "distance {distance} out of bounds after round {round}"
            );
        }
    }

    #[test]
    fn zoom_in_reaches_min_and_zoom_out_reaches_max() {
        let (mut orbit, mut transform) = controller();
        orbit.wheel(500.0);
        orbit.update(&mut transform);
        assert!((orbit.distance().unwrap() - 15.0).abs() < 1e-4);

        orbit.wheel(-500.0);
        orbit.update(&mut transform);
        assert!((orbit.distance().unwrap() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn full_polar_range_is_accepted() {
        let limits = OrbitLimits {
            damping_factor: 0.0,
            ..ORBIT_LIMITS
        };
        let mut orbit = OrbitController::new(Vec3::ZERO, limits);
        let mut transform = Transform::from_xyz(0.0, 0.0, 20.0);
        orbit.update(&mut transform);

        for target_polar in [0.0, 0.3, PI / 2.0, 2.5, PI] {
            let current = orbit.spherical().unwrap().polar;
            orbit.rotate_by(0.0, target_polar - current);
            orbit.update(&mut transform);
            let polar = orbit.spherical().unwrap().polar;
            assert!(
                (polar - target_polar).abs() < 1e-5,
                "polar {polar} != {target_polar}"
            );
            assert!(transform.translation.is_finite());
            assert!(transform.rotation.is_finite());
        }
    }

    #[test]
    fn polar_is_clamped_only_beyond_half_turn() {
        let limits = OrbitLimits {
            damping_factor: 0.0,
            ..ORBIT_LIMITS
        };
        let mut orbit = OrbitController::new(Vec3::ZERO, limits);
        let mut transform = Transform::from_xyz(0.0, 0.0, 20.0);
        orbit.rotate_by(0.0, 10.0);
        orbit.update(&mut transform);
        assert!((orbit.spherical().unwrap().polar - PI).abs() < 1e-6);

        orbit.rotate_by(0.0, -20.0);
        orbit.update(&mut transform);
        assert!(orbit.spherical().unwrap().polar.abs() < 1e-6);
    }

    #[test]
    fn damped_rotation_eases_towards_full_angle() {
        let (mut orbit, mut transform) = controller();
        orbit.update(&mut transform);
        let start = orbit.spherical().unwrap().azimuth;

        orbit.rotate_by(1.0, 0.0);
        orbit.update(&mut transform);
        let after_one = orbit.spherical().unwrap().azimuth - start;
        assert!((after_one - 0.04).abs() < 1e-5);

        for _ in 0..1000 {
            orbit.update(&mut transform);
        }
        let total = orbit.spherical().unwrap().azimuth - start;
        assert!((total - 1.0).abs() < 1e-3, "total rotation {total}");
        assert!(!orbit.update(&mut transform));
    }

    #[test]
    fn camera_keeps_looking_at_target() {
        let (mut orbit, mut transform) = controller();
        orbit.rotate(Vec2::new(120.0, -45.0), 800.0);
        for _ in 0..30 {
            orbit.update(&mut transform);
        }
        let forward = transform.forward();
        let to_target = (orbit.target - transform.translation).normalize();
        assert!(forward.dot(to_target) > 0.9999);
    }

    #[test]
    fn pan_moves_target_sideways() {
        let limits = OrbitLimits {
            damping_factor: 0.0,
            ..ORBIT_LIMITS
        };
        let mut orbit = OrbitController::new(Vec3::ZERO, limits);
        let mut transform = Transform::from_xyz(0.0, 0.0, 20.0);
        orbit.update(&mut transform);

        orbit.pan(Vec2::new(100.0, 0.0), 800.0, 75f32.to_radians(), transform.rotation);
        orbit.update(&mut transform);
        assert!(orbit.target.x < 0.0);
        assert!(orbit.target.y.abs() < 1e-5);
        assert!((orbit.distance().unwrap() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn disabled_rotation_ignores_drag() {
        let limits = OrbitLimits {
            enable_rotate: false,
            damping_factor: 0.0,
            ..ORBIT_LIMITS
        };
        let mut orbit = OrbitController::new(Vec3::ZERO, limits);
        let mut transform = Transform::from_xyz(0.0, 0.0, 20.0);
        orbit.update(&mut transform);
        let before = orbit.spherical().unwrap();
        orbit.rotate(Vec2::new(300.0, 300.0), 800.0);
        orbit.update(&mut transform);
        assert_eq!(orbit.spherical().unwrap(), before);
    }
}
