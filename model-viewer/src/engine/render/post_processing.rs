use bevy::core_pipeline::bloom::{Bloom, BloomPrefilter};
use bevy::core_pipeline::core_3d::graph::{Core3d, Node3d};
use bevy::core_pipeline::dof::{DepthOfField, DepthOfFieldMode};
use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy::render::RenderApp;
use bevy::render::extract_component::ExtractComponent;
use bevy::render::render_graph::{InternedRenderLabel, RenderGraphApp, RenderLabel};
use bevy::render::render_resource::ShaderType;
use viewer_constants::camera::{FAR, NEAR};
use viewer_constants::path::{
    CHROMATIC_ABERRATION_SHADER_PATH, FILM_GRAIN_SHADER_PATH, VIGNETTE_SHADER_PATH,
};
use viewer_constants::post_processing::{
    BLOOM, BloomSettings, CHROMATIC_ABERRATION, ChromaticAberrationSettings, DEPTH_OF_FIELD,
    DepthOfFieldSettings, MULTISAMPLING, NOISE, NoiseSettings, VIGNETTE, VignetteSettings,
};

use super::fullscreen_effect::{FullscreenEffect, FullscreenEffectPlugin};

/// Pixels of bokeh diameter per unit of bokeh scale.
const BOKEH_DIAMETER_PER_SCALE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostEffect {
    Bloom,
    ChromaticAberration,
    Vignette,
    DepthOfField,
    Noise,
}

impl PostEffect {
    /// Render graph node that applies the effect.
    fn pass(self) -> InternedRenderLabel {
        match self {
            PostEffect::Bloom => Node3d::Bloom.intern(),
            PostEffect::ChromaticAberration => ChromaticAberrationLabel.intern(),
            PostEffect::Vignette => VignetteLabel.intern(),
            PostEffect::DepthOfField => Node3d::DepthOfField.intern(),
            PostEffect::Noise => FilmGrainLabel.intern(),
        }
    }

    /// Position among the passes Bevy wires itself ahead of tonemapping.
    /// Those keep their relative order whatever the stack says.
    fn builtin_rank(self) -> Option<u8> {
        match self {
            PostEffect::Bloom => Some(0),
            PostEffect::DepthOfField => Some(1),
            _ => None,
        }
    }
}

/// Graph nodes owned and already ordered by Bevy's core pipeline.
fn is_builtin_pass(label: InternedRenderLabel) -> bool {
    [
        Node3d::EndMainPass.intern(),
        Node3d::Bloom.intern(),
        Node3d::DepthOfField.intern(),
        Node3d::Tonemapping.intern(),
        Node3d::EndMainPassPostProcessing.intern(),
    ]
    .contains(&label)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StackOrderError {
    #[error("{0:?} appears more than once in the post-processing stack")]
    Duplicate(PostEffect),

    #[error("{later:?} is declared before {earlier:?}, but the renderer always runs {earlier:?} first")]
    FixedOrder {
        earlier: PostEffect,
        later: PostEffect,
    },
}

/// Ordered post-processing stages. Stages apply in sequence and effects
/// within a stage in declaration order.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PostProcessStack {
    pub stages: Vec<Vec<PostEffect>>,
    pub multisampling: u32,
}

impl Default for PostProcessStack {
    fn default() -> Self {
        Self {
            stages: vec![
                vec![
                    PostEffect::Bloom,
                    PostEffect::ChromaticAberration,
                    PostEffect::Vignette,
                ],
                vec![PostEffect::DepthOfField, PostEffect::Noise],
            ],
            multisampling: MULTISAMPLING,
        }
    }
}

impl PostProcessStack {
    pub fn effects(&self) -> impl Iterator<Item = PostEffect> + '_ {
        self.stages.iter().flatten().copied()
    }

    pub fn contains(&self, effect: PostEffect) -> bool {
        self.effects().any(|e| e == effect)
    }

    /// Every pass from the end of the main pass to the end of
    /// post-processing, in the order the frame runs them.
    ///
    /// Bevy tonemaps right after its last built-in effect, so tonemapping
    /// lands after the last declared built-in and effects declared later run
    /// on the tonemapped image.
    pub fn pass_chain(&self) -> Result<Vec<InternedRenderLabel>, StackOrderError> {
        let effects: Vec<PostEffect> = self.effects().collect();

        for (index, effect) in effects.iter().enumerate() {
            if effects[..index].contains(effect) {
                return Err(StackOrderError::Duplicate(*effect));
            }
        }
        let builtins: Vec<PostEffect> = effects
            .iter()
            .copied()
            .filter(|e| e.builtin_rank().is_some())
            .collect();
        for pair in builtins.windows(2) {
            if pair[0].builtin_rank() > pair[1].builtin_rank() {
                return Err(StackOrderError::FixedOrder {
                    earlier: pair[1],
                    later: pair[0],
                });
            }
        }

        let tonemap_at = effects
            .iter()
            .rposition(|e| e.builtin_rank().is_some())
            .map_or(0, |index| index + 1);

        let mut chain = vec![Node3d::EndMainPass.intern()];
        for (index, effect) in effects.iter().enumerate() {
            if index == tonemap_at {
                chain.push(Node3d::Tonemapping.intern());
            }
            chain.push(effect.pass());
        }
        if tonemap_at == effects.len() {
            chain.push(Node3d::Tonemapping.intern());
        }
        chain.push(Node3d::EndMainPassPostProcessing.intern());
        Ok(chain)
    }

    /// Edges to add on top of Bevy's own. Links between two built-in passes
    /// are skipped since Bevy already orders them the same way.
    pub fn graph_edges(
        &self,
    ) -> Result<Vec<(InternedRenderLabel, InternedRenderLabel)>, StackOrderError> {
        Ok(self
            .pass_chain()?
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .filter(|(from, to)| !(is_builtin_pass(*from) && is_builtin_pass(*to)))
            .collect())
    }
}

/// Lateral colour split. Red samples at `+offset`, blue at `-offset`, in UV units.
#[derive(Component, Default, Clone, Copy, ExtractComponent, ShaderType)]
pub struct ChromaticAberrationEffect {
    pub offset: Vec2,
    _padding: Vec2,
}

impl ChromaticAberrationEffect {
    pub fn new(settings: &ChromaticAberrationSettings) -> Self {
        Self {
            offset: settings.offset,
            _padding: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Default, RenderLabel)]
pub struct ChromaticAberrationLabel;

impl FullscreenEffect for ChromaticAberrationEffect {
    type Label = ChromaticAberrationLabel;
    const SHADER_PATH: &'static str = CHROMATIC_ABERRATION_SHADER_PATH;
    const NAME: &'static str = "chromatic_aberration_pass";
}

/// Vignette pass uniform. Padded to 16 bytes for uniform buffer layout.
#[derive(Component, Default, Clone, Copy, ExtractComponent, ShaderType)]
pub struct VignetteEffect {
    pub darkness: f32,
    pub offset: f32,
    _padding: Vec2,
}

impl VignetteEffect {
    pub fn new(settings: &VignetteSettings) -> Self {
        Self {
            darkness: settings.darkness,
            offset: settings.offset,
            _padding: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Default, RenderLabel)]
pub struct VignetteLabel;

impl FullscreenEffect for VignetteEffect {
    type Label = VignetteLabel;
    const SHADER_PATH: &'static str = VIGNETTE_SHADER_PATH;
    const NAME: &'static str = "vignette_pass";
}

/// Screen-blended animated noise.
#[derive(Component, Default, Clone, Copy, ExtractComponent, ShaderType)]
pub struct FilmGrainEffect {
    pub opacity: f32,
    pub seed: f32,
    _padding: Vec2,
}

impl FilmGrainEffect {
    pub fn new(settings: &NoiseSettings) -> Self {
        Self {
            opacity: settings.opacity,
            seed: 0.0,
            _padding: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Default, RenderLabel)]
pub struct FilmGrainLabel;

impl FullscreenEffect for FilmGrainEffect {
    type Label = FilmGrainLabel;
    const SHADER_PATH: &'static str = FILM_GRAIN_SHADER_PATH;
    const NAME: &'static str = "film_grain_pass";
}

pub struct PostProcessPlugin;

impl Plugin for PostProcessPlugin {
    fn build(&self, app: &mut App) {
        let stack = PostProcessStack::default();
        app.add_plugins((
            FullscreenEffectPlugin::<ChromaticAberrationEffect>::default(),
            FullscreenEffectPlugin::<VignetteEffect>::default(),
            FullscreenEffectPlugin::<FilmGrainEffect>::default(),
        ));
        if stack.contains(PostEffect::Noise) {
            app.add_systems(Update, animate_film_grain);
        }

        match stack.graph_edges() {
            Ok(edges) => {
                if let Some(render_app) = app.get_sub_app_mut(RenderApp) {
                    for (from, to) in edges {
                        render_app.add_render_graph_edge(Core3d, from, to);
                    }
                }
            }
            Err(error) => error!("Post-processing stack left unwired: {error}"),
        }

        app.insert_resource(stack);
    }
}

pub fn bloom(settings: &BloomSettings) -> Bloom {
    Bloom {
        intensity: settings.intensity,
        prefilter: BloomPrefilter {
            threshold: settings.luminance_threshold,
            threshold_softness: settings.luminance_smoothing,
        },
        ..Bloom::NATURAL
    }
}

/// Focus and range are fractions of the camera depth range; the aperture
/// narrows as the in-focus range widens.
pub fn depth_of_field(settings: &DepthOfFieldSettings) -> DepthOfField {
    let depth_range = FAR - NEAR;
    DepthOfField {
        mode: DepthOfFieldMode::Bokeh,
        focal_distance: NEAR + settings.focus_distance * depth_range,
        aperture_f_stops: 1.0 / settings.focal_length.max(f32::EPSILON),
        max_circle_of_confusion_diameter: settings.bokeh_scale * BOKEH_DIAMETER_PER_SCALE,
        ..default()
    }
}

/// Requested sample count, capped at what every backend supports.
pub fn msaa_for_samples(samples: u32) -> Msaa {
    match samples {
        0 | 1 => Msaa::Off,
        2 | 3 => Msaa::Sample2,
        _ => Msaa::Sample4,
    }
}

/// Attach every effect in the stack to the camera.
pub fn insert_post_processing(camera: &mut EntityCommands, stack: &PostProcessStack) {
    camera.insert(msaa_for_samples(stack.multisampling));
    for effect in stack.effects() {
        match effect {
            PostEffect::Bloom => camera.insert(bloom(&BLOOM)),
            PostEffect::ChromaticAberration => {
                camera.insert(ChromaticAberrationEffect::new(&CHROMATIC_ABERRATION))
            }
            PostEffect::Vignette => camera.insert(VignetteEffect::new(&VIGNETTE)),
            PostEffect::DepthOfField => camera.insert(depth_of_field(&DEPTH_OF_FIELD)),
            PostEffect::Noise => camera.insert(FilmGrainEffect::new(&NOISE)),
        };
    }
}

/// Fresh grain pattern every frame.
pub fn animate_film_grain(time: Res<Time>, mut grains: Query<&mut FilmGrainEffect>) {
    let seed = time.elapsed_secs_wrapped() % 1000.0;
    for mut grain in &mut grains {
        grain.seed = seed;
    }
}
