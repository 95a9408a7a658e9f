//! Runtime diagnostics and quality control.

/// Steps MSAA down under sustained low frame rates and back up on recovery.
pub mod adaptive_quality;

/// FPS overlay (native) and FPS notifications to the host page.
pub mod fps_tracking;
