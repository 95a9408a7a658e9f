use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::transform::TransformSystem;
use viewer_constants::environment::BACKGROUND_COLOR;

use crate::engine::camera::orbit_input::{orbit_camera_input, update_orbit_camera};
use crate::engine::camera::viewer_camera::spawn_viewer_camera;
use crate::engine::core::app_state::{
    AppState, ModelLoadState, ResetSceneRequested, RetryModelLoad, transition_to_running,
};
use crate::engine::core::reset::handle_reset_requests;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::geometry::{ModelGeometry, gather_model_geometry, reset_model_geometry};
use crate::engine::loading::model_loader::{
    poll_model_load, request_model, reset_model_state, retry_model_load,
};
use crate::engine::loading::presentation::present_model;
use crate::engine::render::post_processing::PostProcessPlugin;
use crate::engine::scene::helpers::spawn_helpers;
use crate::engine::scene::lighting::spawn_lights;
use crate::engine::shadows::accumulative_shadows::update_accumulative_shadows;
use crate::engine::shadows::contact_shadows::update_contact_shadows;
use crate::engine::shadows::spawn_shadow_catchers;
use crate::engine::systems::adaptive_quality::{AdaptiveQuality, adapt_quality};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::button_hover_colors;
use crate::ui::load_error_panel::retry_button_system;
use crate::ui::reset_panel::{reset_button_system, spawn_reset_panel};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{
    fps_text_update_system, spawn_fps_overlay, toggle_fps_overlay,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .enable_state_scoped_entities::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(PostProcessPlugin)
        .add_plugins(WebRpcPlugin);

    app.insert_resource(ClearColor(BACKGROUND_COLOR))
        .init_resource::<ModelLoadState>()
        .init_resource::<ModelGeometry>()
        .init_resource::<AdaptiveQuality>()
        .add_event::<ResetSceneRequested>()
        .add_event::<RetryModelLoad>();

    // Mount: the whole scene tree is rebuilt every time this state is entered.
    app.add_systems(
        OnEnter(AppState::Mounting),
        (
            (reset_model_state, reset_model_geometry),
            (
                spawn_viewer_camera,
                spawn_lights,
                spawn_helpers,
                spawn_shadow_catchers,
                spawn_reset_panel,
            ),
            transition_to_running,
        )
            .chain(),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(OnEnter(AppState::Mounting), spawn_fps_overlay);
    }

    let model_systems = (
        retry_button_system,
        retry_model_load,
        request_model,
        poll_model_load,
        present_model.run_if(resource_changed::<ModelLoadState>),
    )
        .chain();

    let runtime_systems = (
        (orbit_camera_input, update_orbit_camera).chain(),
        (reset_button_system, handle_reset_requests).chain(),
        button_hover_colors,
        update_contact_shadows,
        update_accumulative_shadows,
        adapt_quality,
        fps_notification_system,
    );

    app.add_systems(
        Update,
        (model_systems, runtime_systems).run_if(in_state(AppState::Running)),
    )
    .add_systems(
        PostUpdate,
        gather_model_geometry
            .after(TransformSystem::TransformPropagate)
            .run_if(in_state(AppState::Running)),
    );

    // FPS overlay only exists on native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            (toggle_fps_overlay, fps_text_update_system).run_if(in_state(AppState::Running)),
        );
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        level: Level::INFO,
        filter: "info,wgpu=error,naga=warn".into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
