use bevy::prelude::*;
use viewer_constants::camera::{FAR, FOV_DEGREES, INITIAL_POSITION, NEAR, ORBIT_LIMITS, ORBIT_TARGET};
use viewer_constants::environment::{ENVIRONMENT, FOG_VOLUMES};

use super::orbit_controller::OrbitController;
use crate::engine::core::app_state::AppState;
use crate::engine::render::post_processing::{
    PostProcessStack, insert_post_processing, msaa_for_samples,
};
use crate::engine::scene::environment::{EnvironmentMaps, attach_fog_volumes, insert_environment};
use crate::engine::systems::adaptive_quality::AdaptiveQuality;

#[derive(Component)]
pub struct ViewerCamera;

pub fn perspective() -> PerspectiveProjection {
    PerspectiveProjection {
        fov: FOV_DEGREES.to_radians(),
        near: NEAR,
        far: FAR,
        ..default()
    }
}

/// HDR perspective camera with orbit controls, environment lighting, fog and
/// the post-processing stack.
pub fn spawn_viewer_camera(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    stack: Res<PostProcessStack>,
) {
    let environment = EnvironmentMaps::generate(&mut images, ENVIRONMENT.preset);

    let mut camera = commands.spawn((
        Name::new("Viewer Camera"),
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(perspective()),
        Transform::from_translation(INITIAL_POSITION).looking_at(ORBIT_TARGET, Vec3::Y),
        OrbitController::new(ORBIT_TARGET, ORBIT_LIMITS),
        ViewerCamera,
        StateScoped(AppState::Running),
    ));

    insert_environment(&mut camera, &environment, &ENVIRONMENT);
    attach_fog_volumes(&mut camera, &FOG_VOLUMES);
    insert_post_processing(&mut camera, &stack);

    commands.insert_resource(AdaptiveQuality {
        ceiling: msaa_for_samples(stack.multisampling),
        ..default()
    });
}
