//! Post-processing on the viewer camera.
//!
//! Bloom and depth of field are Bevy's own passes, configured as camera
//! components. Chromatic aberration, vignette and film grain are custom
//! fullscreen passes threaded between them so the graph runs the stages in
//! declaration order.

/// Generic single-texture fullscreen pass: plugin, pipeline and view node.
pub mod fullscreen_effect;

/// Effect stack, camera components and graph ordering.
pub mod post_processing;
