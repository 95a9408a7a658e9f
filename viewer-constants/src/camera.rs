use bevy::math::Vec3;

/// Initial camera position. Sits inside the minimum orbit distance; the first
/// orbit update pushes it out to `ORBIT_LIMITS.min_distance`.
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Point the orbit rotates around.
pub const ORBIT_TARGET: Vec3 = Vec3::ZERO;

pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

/// Orbit control limits: damped rotation, bounded zoom and the full polar range.
pub const ORBIT_LIMITS: OrbitLimits = OrbitLimits {
    damping_factor: 0.04,
    min_distance: 15.0,
    max_distance: 50.0,
    min_polar_angle: 0.0,
    max_polar_angle: std::f32::consts::PI,
    enable_rotate: true,
    enable_zoom: true,
    enable_pan: true,
    rotate_speed: 1.0,
    zoom_speed: 1.0,
    pan_speed: 1.0,
};
