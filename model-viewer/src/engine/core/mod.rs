//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, mount/remount
//! transitions and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the viewer plugins, schedules and
/// platform-specific configuration.
pub mod app_setup;

/// Application state machine and model loading state.
///
/// `Mounting → Running` on start, `Running → Mounting` on reset.
pub mod app_state;

/// Reset handling: page reload on the web, full re-mount natively.
pub mod reset;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
