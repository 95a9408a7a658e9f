//! Fixed view configuration for the model viewer.
//!
//! Every value here is a literal the viewer is mounted with. Nothing is
//! mutated at runtime; a remount reads the same constants again.

pub mod camera;
pub mod environment;
pub mod helpers;
pub mod lighting;
pub mod path;
pub mod post_processing;
pub mod quality;
pub mod shadows;
pub mod ui;
