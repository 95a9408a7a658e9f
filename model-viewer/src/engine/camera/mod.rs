//! Orbit camera for model inspection.
//!
//! Damped rotation around a fixed target, bounded zoom, full polar range and
//! screen-space panning, driven by mouse and touch input.

/// Orbit state and the clamping/damping math.
pub mod orbit_controller;

/// Input systems that feed the controller and apply it to the camera.
pub mod orbit_input;

/// Camera entity with its projection, environment and effects.
pub mod viewer_camera;
