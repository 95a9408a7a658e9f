use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use viewer_constants::shadows::{
    ACCUMULATIVE_SHADOWS, AccumulativeShadowSettings, RANDOMIZED_LIGHT, RandomizedLightSettings,
};

use super::contact_shadows::shadow_material;
use super::shadow_canvas::ShadowCanvas;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::geometry::ModelGeometry;

/// Hemisphere samples below this elevation are redrawn.
const MIN_HEMISPHERE_ELEVATION: f32 = 0.05;

/// One jittered light sample: the direction light travels and its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub direction: Vec3,
    pub weight: f32,
}

/// Running average of occlusion over randomized light samples.
#[derive(Debug, Clone)]
pub struct ShadowAccumulator {
    settings: AccumulativeShadowSettings,
    light: RandomizedLightSettings,
    occlusion: ShadowCanvas,
    scratch: ShadowCanvas,
    total_weight: f32,
    frames_done: u32,
    rng: SmallRng,
}

impl ShadowAccumulator {
    pub fn new(settings: AccumulativeShadowSettings, light: RandomizedLightSettings) -> Self {
        let canvas = ShadowCanvas::new(settings.resolution, settings.position.xz(), settings.scale);
        Self {
            settings,
            light,
            scratch: canvas.clone(),
            occlusion: canvas,
            total_weight: 0.0,
            frames_done: 0,
            rng: SmallRng::seed_from_u64(light.seed),
        }
    }

    /// Drop everything accumulated and restart the sample sequence.
    pub fn reset(&mut self) {
        self.occlusion.clear();
        self.total_weight = 0.0;
        self.frames_done = 0;
        self.rng = SmallRng::seed_from_u64(self.light.seed);
    }

    pub fn frames_done(&self) -> u32 {
        self.frames_done
    }

    pub fn is_complete(&self) -> bool {
        self.frames_done >= self.settings.frames
    }

    /// Draw a light sample: from the upper hemisphere with probability
    /// `ambient`, otherwise from a point jittered within `radius` of the light.
    pub fn sample_light(&mut self) -> Option<LightSample> {
        if self.rng.r#gen::<f32>() < self.light.ambient {
            let toward_light = loop {
                let v = self.unit_ball_point();
                let len = v.length();
                if len > 1e-3 && v.y / len >= MIN_HEMISPHERE_ELEVATION {
                    break v / len;
                }
            };
            return Some(LightSample {
                direction: -toward_light,
                weight: self.light.ambient,
            });
        }

        let origin = self.light.position + self.unit_ball_point() * self.light.radius;
        let direction = (self.settings.position - origin).normalize_or_zero();
        // Light at or below the catcher throws no shadow onto it.
        if direction.y >= -1e-3 {
            return None;
        }
        Some(LightSample {
            direction,
            weight: self.light.intensity,
        })
    }

    fn unit_ball_point(&mut self) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            if v.length_squared() <= 1.0 {
                return v;
            }
        }
    }

    /// Accumulate one frame's worth of light samples.
    pub fn accumulate_frame(&mut self, triangles: &[[Vec3; 3]]) {
        if self.is_complete() {
            return;
        }
        for _ in 0..self.light.amount {
            let Some(sample) = self.sample_light() else {
                continue;
            };
            self.scratch.clear();
            project_occluders(&mut self.scratch, triangles, sample.direction, self.settings.position.y);
            self.occlusion.add_weighted(&self.scratch, sample.weight);
            self.total_weight += sample.weight;
        }
        self.frames_done += 1;
    }

    pub fn to_image(&self) -> Image {
        let settings = self.settings;
        let total = self.total_weight;
        self.occlusion.to_image(settings.color, |occlusion| {
            shadow_alpha(lightness(occlusion, total), settings.alpha_test, settings.opacity)
        })
    }
}

fn lightness(occlusion: f32, total_weight: f32) -> f32 {
    if total_weight <= 0.0 {
        return 1.0;
    }
    (1.0 - occlusion / total_weight).clamp(0.0, 1.0)
}

/// Texels brighter than `alpha_test` are fully transparent; darker ones
/// ramp linearly to `opacity`.
pub fn shadow_alpha(lightness: f32, alpha_test: f32, opacity: f32) -> f32 {
    if alpha_test <= 0.0 {
        return 0.0;
    }
    (1.0 - lightness / alpha_test).max(0.0) * opacity
}

/// Project every triangle along `direction` onto the plane `y = ground` and
/// mark the covered texels. Vertices under the plane stay where they are.
fn project_occluders(canvas: &mut ShadowCanvas, triangles: &[[Vec3; 3]], direction: Vec3, ground: f32) {
    let project = |v: Vec3| {
        let t = ((ground - v.y) / direction.y).max(0.0);
        (v + direction * t).xz()
    };
    for [a, b, c] in triangles {
        if a.y.max(b.y).max(c.y) < ground {
            continue;
        }
        canvas.fill_triangle(project(*a), project(*b), project(*c), 1.0);
    }
}

/// Ground square receiving the accumulated soft shadow.
#[derive(Component)]
pub struct AccumulativeShadowCatcher {
    accumulator: ShadowAccumulator,
    image: Handle<Image>,
    baked_revision: u64,
}

pub fn spawn_accumulative_shadows(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
) {
    let settings = ACCUMULATIVE_SHADOWS;
    let accumulator = ShadowAccumulator::new(settings, RANDOMIZED_LIGHT);
    let image = images.add(accumulator.to_image());

    commands.spawn((
        Name::new("Accumulative Shadows"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(settings.scale, settings.scale))),
        MeshMaterial3d(materials.add(shadow_material(image.clone()))),
        Transform::from_translation(settings.position),
        NotShadowCaster,
        NotShadowReceiver,
        AccumulativeShadowCatcher {
            accumulator,
            image,
            baked_revision: 0,
        },
        StateScoped(AppState::Running),
    ));
}

/// Restart on new geometry, then accumulate one frame per update when
/// temporal, or every frame at once otherwise.
pub fn update_accumulative_shadows(
    geometry: Res<ModelGeometry>,
    mut catchers: Query<&mut AccumulativeShadowCatcher>,
    mut images: ResMut<Assets<Image>>,
) {
    if geometry.is_empty() {
        return;
    }

    for mut catcher in &mut catchers {
        if catcher.baked_revision != geometry.revision {
            catcher.accumulator.reset();
            catcher.baked_revision = geometry.revision;
        }
        if catcher.accumulator.is_complete() {
            continue;
        }

        if catcher.accumulator.settings.temporal {
            catcher.accumulator.accumulate_frame(&geometry.triangles);
        } else {
            while !catcher.accumulator.is_complete() {
                catcher.accumulator.accumulate_frame(&geometry.triangles);
            }
        }

        if let Some(image) = images.get_mut(&catcher.image) {
            *image = catcher.accumulator.to_image();
        }
        if catcher.accumulator.is_complete() {
            info!(
                "Accumulative shadows settled after {} frames",
                catcher.accumulator.frames_done()
            );
        }
    }
}
