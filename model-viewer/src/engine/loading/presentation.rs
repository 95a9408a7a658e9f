use bevy::prelude::*;
use viewer_constants::helpers::{MODEL_ROTATION, PLACEHOLDER_COLOR};

use super::geometry::on_model_instance_ready;
use crate::engine::core::app_state::{AppState, ModelLoadState};
use crate::ui::load_error_panel::{LoadErrorPanel, spawn_load_error_panel};

/// Hot-pink box shown while the model is unresolved.
#[derive(Component)]
pub struct ModelPlaceholder;

/// Root of the spawned model scene.
#[derive(Component)]
pub struct LoadedModel;

/// Keep the model subtree in sync with `ModelLoadState`: placeholder while
/// unresolved, the model once ready, the error panel on failure.
pub fn present_model(
    mut commands: Commands,
    state: Res<ModelLoadState>,
    placeholders: Query<Entity, With<ModelPlaceholder>>,
    models: Query<Entity, With<LoadedModel>>,
    error_panels: Query<Entity, With<LoadErrorPanel>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    match &*state {
        ModelLoadState::Idle | ModelLoadState::Loading(_) => {
            despawn_all(&mut commands, &models);
            despawn_all(&mut commands, &error_panels);
            if placeholders.is_empty() {
                spawn_placeholder(&mut commands, &mut meshes, &mut materials);
            }
        }
        ModelLoadState::Ready(scene) => {
            despawn_all(&mut commands, &placeholders);
            despawn_all(&mut commands, &error_panels);
            if models.is_empty() {
                spawn_model(&mut commands, scene.clone());
            }
        }
        ModelLoadState::Failed(error) => {
            despawn_all(&mut commands, &placeholders);
            despawn_all(&mut commands, &models);
            if error_panels.is_empty() {
                spawn_load_error_panel(&mut commands, error);
            }
        }
    }
}

fn despawn_all<F: bevy::ecs::query::QueryFilter>(
    commands: &mut Commands,
    query: &Query<Entity, F>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn spawn_placeholder(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::default())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: PLACEHOLDER_COLOR,
            ..default()
        })),
        Transform::IDENTITY,
        ModelPlaceholder,
        StateScoped(AppState::Running),
    ));
}

fn spawn_model(commands: &mut Commands, scene: Handle<Scene>) {
    let [x, y, z] = MODEL_ROTATION;
    commands
        .spawn((
            SceneRoot(scene),
            Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, x, y, z)),
            LoadedModel,
            StateScoped(AppState::Running),
        ))
        .observe(on_model_instance_ready);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::loading::geometry::ModelGeometry;
    use crate::error::ModelLoadError;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<ModelGeometry>()
            .init_resource::<ModelLoadState>()
            .add_systems(
                Update,
                present_model.run_if(resource_changed::<ModelLoadState>),
            );
        app
    }

    fn count<C: Component>(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<C>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn placeholder_first_then_model() {
        let mut app = app();
        app.update();
        assert_eq!(count::<ModelPlaceholder>(&mut app), 1);
        assert_eq!(count::<LoadedModel>(&mut app), 0);

        app.insert_resource(ModelLoadState::Loading(Handle::default()));
        app.update();
        assert_eq!(count::<ModelPlaceholder>(&mut app), 1);

        app.insert_resource(ModelLoadState::Ready(Handle::default()));
        app.update();
        assert_eq!(count::<ModelPlaceholder>(&mut app), 0);
        assert_eq!(count::<LoadedModel>(&mut app), 1);

        let root = app
            .world_mut()
            .query_filtered::<&Transform, With<LoadedModel>>()
            .single(app.world())
            .unwrap();
        let (x, y, z) = root.rotation.to_euler(EulerRot::XYZ);
        let expected = Quat::from_euler(EulerRot::XYZ, 80.0, 0.0, 0.0);
        assert!(root.rotation.angle_between(expected) < 1e-4, "{x} {y} {z}");
    }

    #[test]
    fn failure_replaces_placeholder_with_error_panel() {
        let mut app = app();
        app.update();
        app.insert_resource(ModelLoadState::Failed(ModelLoadError::Unreachable {
            path: "models/missing.glb".into(),
            reason: "not found".into(),
        }));
        app.update();

        assert_eq!(count::<ModelPlaceholder>(&mut app), 0);
        assert_eq!(count::<LoadedModel>(&mut app), 0);
        assert_eq!(count::<LoadErrorPanel>(&mut app), 1);
    }

    #[test]
    fn retry_brings_placeholder_back() {
        let mut app = app();
        app.insert_resource(ModelLoadState::Failed(ModelLoadError::Invalid {
            path: "models/model.glb".into(),
            reason: "bad magic".into(),
        }));
        app.update();
        assert_eq!(count::<LoadErrorPanel>(&mut app), 1);

        app.insert_resource(ModelLoadState::Idle);
        app.update();
        assert_eq!(count::<LoadErrorPanel>(&mut app), 0);
        assert_eq!(count::<ModelPlaceholder>(&mut app), 1);
    }
}
