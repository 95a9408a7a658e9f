//! Static scene content: lights, environment and fog, ground helpers.

/// Generated sky cubemaps, backdrop and distance fog on the camera.
pub mod environment;

/// Ground grid and axes line meshes.
pub mod helpers;

/// Ambient, spot and directional lights with their shadow map sizes.
pub mod lighting;
