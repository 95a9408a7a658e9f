//! Model loading and presentation.
//!
//! Explicit `Idle → Loading → Ready | Failed` pipeline for the bundled glTF
//! model, the placeholder/model/error presentation that follows it, and the
//! world-space geometry gathered for shadow baking.

/// Triangle extraction from the spawned model scene.
pub mod geometry;

/// Load request, polling and retry.
pub mod model_loader;

/// Placeholder, model root and error panel swapping.
pub mod presentation;
