/// Smoothed FPS below which quality is stepped down.
pub const LOW_FPS_FLOOR: f32 = 30.0;

/// Smoothed FPS at which a lowered quality level is stepped back up.
pub const RECOVERED_FPS: f32 = 55.0;

/// Seconds FPS must stay past a threshold before quality changes.
pub const SUSTAIN_SECS: f32 = 2.0;

/// Interval between FPS notifications to the host page.
pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;
