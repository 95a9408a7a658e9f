//! Viewer engine: camera, scene content, model loading, shadows and
//! post-processing, wired together in `core::app_setup`.

/// Orbit camera and the viewer camera entity.
pub mod camera;

/// App construction, lifecycle state and reset handling.
pub mod core;

/// Model load pipeline and presentation.
pub mod loading;

/// Post-processing stack and custom fullscreen passes.
pub mod render;

/// Lights, environment, fog and ground helpers.
pub mod scene;

/// Baked contact and accumulative shadows.
pub mod shadows;

/// Diagnostics and adaptive quality.
pub mod systems;
