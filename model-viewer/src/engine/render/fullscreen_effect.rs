use std::marker::PhantomData;

use bevy::{
    core_pipeline::{
        core_3d::graph::Core3d, fullscreen_vertex_shader::fullscreen_shader_vertex_state,
    },
    ecs::query::QueryItem,
    prelude::*,
    render::{
        RenderApp,
        extract_component::{
            ComponentUniforms, DynamicUniformIndex, ExtractComponent, ExtractComponentPlugin,
            UniformComponentPlugin,
        },
        render_graph::{
            NodeRunError, RenderGraphApp, RenderGraphContext, RenderLabel, ViewNode, ViewNodeRunner,
        },
        render_resource::{
            binding_types::{sampler, texture_2d, uniform_buffer},
            encase::internal::WriteInto,
            *,
        },
        renderer::{RenderContext, RenderDevice},
        view::ViewTarget,
    },
};

/// Camera component driving a single-texture fullscreen fragment pass.
///
/// The shader at `SHADER_PATH` sees the view colour at binding 0, a sampler at
/// binding 1 and the component as a uniform at binding 2, and exposes a
/// `fragment` entry point.
pub trait FullscreenEffect:
    Component + ExtractComponent<Out = Self> + ShaderType + WriteInto + Clone
{
    type Label: RenderLabel + Default;
    const SHADER_PATH: &'static str;
    const NAME: &'static str;
}

/// Registers the effect's extraction, uniforms, pipeline and graph node.
/// Graph edges are left to the caller so several effects can be chained.
pub struct FullscreenEffectPlugin<T>(PhantomData<fn() -> T>);

impl<T> Default for FullscreenEffectPlugin<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FullscreenEffect> Plugin for FullscreenEffectPlugin<T> {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractComponentPlugin::<T>::default(),
            UniformComponentPlugin::<T>::default(),
        ));

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .add_render_graph_node::<ViewNodeRunner<FullscreenEffectNode<T>>>(Core3d, T::Label::default());
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app.init_resource::<FullscreenEffectPipeline<T>>();
    }
}

struct FullscreenEffectNode<T>(PhantomData<fn() -> T>);

impl<T> Default for FullscreenEffectNode<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FullscreenEffect> ViewNode for FullscreenEffectNode<T> {
    type ViewQuery = (&'static ViewTarget, &'static DynamicUniformIndex<T>);

    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (view_target, settings_index): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let effect_pipeline = world.resource::<FullscreenEffectPipeline<T>>();
        let pipeline_cache = world.resource::<PipelineCache>();

        let pipeline_id = if view_target.is_hdr() {
            effect_pipeline.hdr_pipeline_id
        } else {
            effect_pipeline.ldr_pipeline_id
        };
        let Some(pipeline) = pipeline_cache.get_render_pipeline(pipeline_id) else {
            return Ok(());
        };

        let settings_uniforms = world.resource::<ComponentUniforms<T>>();
        let Some(settings_binding) = settings_uniforms.uniforms().binding() else {
            return Ok(());
        };

        let post_process = view_target.post_process_write();

        let bind_group = render_context.render_device().create_bind_group(
            T::NAME,
            &effect_pipeline.layout,
            &BindGroupEntries::sequential((
                post_process.source,
                &effect_pipeline.sampler,
                settings_binding.clone(),
            )),
        );

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some(T::NAME),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: post_process.destination,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[settings_index.index()]);
        render_pass.draw(0..3, 0..1);

        Ok(())
    }
}

struct FullscreenEffectPipeline<T> {
    layout: BindGroupLayout,
    sampler: Sampler,
    hdr_pipeline_id: CachedRenderPipelineId,
    ldr_pipeline_id: CachedRenderPipelineId,
    marker: PhantomData<fn() -> T>,
}

impl<T: FullscreenEffect> Resource for FullscreenEffectPipeline<T> {}

impl<T: FullscreenEffect> FromWorld for FullscreenEffectPipeline<T> {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            T::NAME,
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_2d(TextureSampleType::Float { filterable: false }),
                    sampler(SamplerBindingType::NonFiltering),
                    uniform_buffer::<T>(true),
                ),
            ),
        );

        let sampler = render_device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            ..default()
        });

        let shader: Handle<Shader> = world.load_asset(T::SHADER_PATH);

        let mut queue = |format: TextureFormat| {
            world
                .resource_mut::<PipelineCache>()
                .queue_render_pipeline(RenderPipelineDescriptor {
                    label: Some(T::NAME.into()),
                    layout: vec![layout.clone()],
                    vertex: fullscreen_shader_vertex_state(),
                    fragment: Some(FragmentState {
                        shader: shader.clone(),
                        shader_defs: vec![],
                        entry_point: "fragment".into(),
                        targets: vec![Some(ColorTargetState {
                            format,
                            blend: None,
                            write_mask: ColorWrites::ALL,
                        })],
                    }),
                    primitive: PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: MultisampleState::default(),
                    push_constant_ranges: vec![],
                    zero_initialize_workgroup_memory: false,
                })
        };
        let hdr_pipeline_id = queue(ViewTarget::TEXTURE_FORMAT_HDR);
        let ldr_pipeline_id = queue(TextureFormat::bevy_default());

        Self {
            layout,
            sampler,
            hdr_pipeline_id,
            ldr_pipeline_id,
            marker: PhantomData,
        }
    }
}
