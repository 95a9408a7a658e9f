use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use viewer_constants::quality::{LOW_FPS_FLOOR, RECOVERED_FPS, SUSTAIN_SECS};

use crate::engine::camera::viewer_camera::ViewerCamera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityStep {
    Lower,
    Raise,
    Hold,
}

/// Hysteresis on smoothed FPS: a step is only issued once FPS has stayed past
/// a threshold for `sustain_secs`, then the timer starts over.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityGovernor {
    pub low_fps: f32,
    pub recovered_fps: f32,
    pub sustain_secs: f32,
    below_for: f32,
    above_for: f32,
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new(LOW_FPS_FLOOR, RECOVERED_FPS, SUSTAIN_SECS)
    }
}

impl QualityGovernor {
    pub fn new(low_fps: f32, recovered_fps: f32, sustain_secs: f32) -> Self {
        Self {
            low_fps,
            recovered_fps,
            sustain_secs,
            below_for: 0.0,
            above_for: 0.0,
        }
    }

    pub fn observe(&mut self, fps: f32, delta_secs: f32) -> QualityStep {
        if fps < self.low_fps {
            self.below_for += delta_secs;
            self.above_for = 0.0;
        } else if fps >= self.recovered_fps {
            self.above_for += delta_secs;
            self.below_for = 0.0;
        } else {
            self.below_for = 0.0;
            self.above_for = 0.0;
        }

        if self.below_for >= self.sustain_secs {
            self.below_for = 0.0;
            QualityStep::Lower
        } else if self.above_for >= self.sustain_secs {
            self.above_for = 0.0;
            QualityStep::Raise
        } else {
            QualityStep::Hold
        }
    }
}

fn sample_count(msaa: Msaa) -> u32 {
    msaa.samples()
}

pub fn lower_msaa(current: Msaa) -> Option<Msaa> {
    match current {
        Msaa::Sample8 => Some(Msaa::Sample4),
        Msaa::Sample4 => Some(Msaa::Sample2),
        Msaa::Sample2 => Some(Msaa::Off),
        Msaa::Off => None,
    }
}

/// Next level up, never past `ceiling`.
pub fn raise_msaa(current: Msaa, ceiling: Msaa) -> Option<Msaa> {
    let next = match current {
        Msaa::Off => Msaa::Sample2,
        Msaa::Sample2 => Msaa::Sample4,
        Msaa::Sample4 => Msaa::Sample8,
        Msaa::Sample8 => return None,
    };
    (sample_count(next) <= sample_count(ceiling)).then_some(next)
}

/// Quality controller state; `ceiling` is the level the camera was mounted with.
#[derive(Resource, Debug, Clone)]
pub struct AdaptiveQuality {
    pub governor: QualityGovernor,
    pub ceiling: Msaa,
}

impl Default for AdaptiveQuality {
    fn default() -> Self {
        Self {
            governor: QualityGovernor::default(),
            ceiling: Msaa::Sample4,
        }
    }
}

pub fn adapt_quality(
    time: Res<Time>,
    diagnostics: Res<DiagnosticsStore>,
    mut quality: ResMut<AdaptiveQuality>,
    mut cameras: Query<&mut Msaa, With<ViewerCamera>>,
) {
    let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };

    let ceiling = quality.ceiling;
    let step = quality.governor.observe(fps as f32, time.delta_secs());
    for mut msaa in &mut cameras {
        let next = match step {
            QualityStep::Lower => lower_msaa(*msaa),
            QualityStep::Raise => raise_msaa(*msaa, ceiling),
            QualityStep::Hold => None,
        };
        if let Some(next) = next {
            info!(
                "Adaptive quality: {:.1} fps, MSAA {}x → {}x",
                fps,
                msaa.samples(),
                next.samples()
            );
            *msaa = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustained_low_fps_lowers_once_per_window() {
        let mut governor = QualityGovernor::new(30.0, 55.0, 2.0);
        assert_eq!(governor.observe(20.0, 1.0), QualityStep::Hold);
        assert_eq!(governor.observe(20.0, 1.0), QualityStep::Lower);
        assert_eq!(governor.observe(20.0, 1.0), QualityStep::Hold);
    }

    #[test]
    fn brief_dips_are_ignored() {
        let mut governor = QualityGovernor::new(30.0, 55.0, 2.0);
        assert_eq!(governor.observe(20.0, 1.5), QualityStep::Hold);
        assert_eq!(governor.observe(45.0, 0.1), QualityStep::Hold);
        assert_eq!(governor.observe(20.0, 1.5), QualityStep::Hold);
    }

    #[test]
    fn recovery_raises_after_window() {
        let mut governor = QualityGovernor::new(30.0, 55.0, 2.0);
        assert_eq!(governor.observe(60.0, 1.0), QualityStep::Hold);
        assert_eq!(governor.observe(60.0, 1.0), QualityStep::Raise);
    }

    #[test]
    fn msaa_steps_stop_at_bounds() {
        assert_eq!(lower_msaa(Msaa::Sample4), Some(Msaa::Sample2));
        assert_eq!(lower_msaa(Msaa::Off), None);
        assert_eq!(raise_msaa(Msaa::Sample2, Msaa::Sample4), Some(Msaa::Sample4));
        assert_eq!(raise_msaa(Msaa::Sample4, Msaa::Sample4), None);
        assert_eq!(raise_msaa(Msaa::Off, Msaa::Off), None);
    }
}
