use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use viewer_constants::path::MODEL_PATH;

use crate::engine::core::app_state::{ModelLoadState, RetryModelLoad};
use crate::error::ModelLoadError;

/// Issue the model load whenever nothing is in flight.
pub fn request_model(asset_server: Res<AssetServer>, mut state: ResMut<ModelLoadState>) {
    if !matches!(*state, ModelLoadState::Idle) {
        return;
    }
    info!("Loading model from: {}", MODEL_PATH);
    *state = ModelLoadState::Loading(asset_server.load(MODEL_PATH));
}

/// Resolve an in-flight load into `Ready` or `Failed`.
pub fn poll_model_load(
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut state: ResMut<ModelLoadState>,
) {
    let ModelLoadState::Loading(handle) = &*state else {
        return;
    };
    let path = handle
        .path()
        .map(ToString::to_string)
        .unwrap_or_else(|| MODEL_PATH.to_string());

    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle) {
        let error = ModelLoadError::from_asset_error(&path, &error);
        error!("✗ {error}");
        *state = ModelLoadState::Failed(error);
        return;
    }

    if let Some(RecursiveDependencyLoadState::Failed(error)) =
        asset_server.get_recursive_dependency_load_state(handle)
    {
        let error = ModelLoadError::from_asset_error(&path, &error);
        error!("✗ {error}");
        *state = ModelLoadState::Failed(error);
        return;
    }

    if !asset_server.is_loaded_with_dependencies(handle) {
        return;
    }

    let Some(gltf) = gltfs.get(handle) else {
        return;
    };

    *state = match root_scene(gltf.default_scene.as_ref(), &gltf.scenes, &path) {
        Ok(scene) => {
            info!("✓ Model loaded ({} scene(s))", gltf.scenes.len());
            ModelLoadState::Ready(scene)
        }
        Err(error) => {
            error!("✗ {error}");
            ModelLoadState::Failed(error)
        }
    };
}

/// The document's default scene, falling back to its first scene.
pub fn root_scene(
    default_scene: Option<&Handle<Scene>>,
    scenes: &[Handle<Scene>],
    path: &str,
) -> Result<Handle<Scene>, ModelLoadError> {
    default_scene
        .or_else(|| scenes.first())
        .cloned()
        .ok_or_else(|| ModelLoadError::Invalid {
            path: path.to_string(),
            reason: "document contains no scenes".to_string(),
        })
}

/// Drop a failed load and start over. Dropping the handle lets the asset
/// server forget the failed path, so the next request reads it again.
pub fn retry_model_load(
    mut requests: EventReader<RetryModelLoad>,
    mut state: ResMut<ModelLoadState>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if matches!(*state, ModelLoadState::Failed(_)) {
        info!("Retrying model load");
        *state = ModelLoadState::Idle;
    }
}

/// A fresh mount starts with nothing loaded.
pub fn reset_model_state(mut state: ResMut<ModelLoadState>) {
    *state = ModelLoadState::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::gltf::GltfPlugin;
    use std::time::Duration;

    fn failed() -> ModelLoadState {
        ModelLoadState::Failed(ModelLoadError::Unreachable {
            path: MODEL_PATH.into(),
            reason: "404".into(),
        })
    }

    fn retry_app(initial: ModelLoadState) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(initial)
            .add_event::<RetryModelLoad>()
            .add_systems(Update, retry_model_load);
        app
    }

    #[test]
    fn retry_returns_failed_load_to_idle() {
        let mut app = retry_app(failed());
        app.world_mut().send_event(RetryModelLoad);
        app.update();
        assert!(matches!(
            app.world().resource::<ModelLoadState>(),
            ModelLoadState::Idle
        ));
    }

    #[test]
    fn retry_ignored_while_ready() {
        let mut app = retry_app(ModelLoadState::Ready(Handle::default()));
        app.world_mut().send_event(RetryModelLoad);
        app.update();
        assert!(matches!(
            app.world().resource::<ModelLoadState>(),
            ModelLoadState::Ready(_)
        ));
    }

    #[test]
    fn failed_state_waits_for_retry() {
        let mut app = retry_app(failed());
        app.update();
        app.update();
        assert!(matches!(
            app.world().resource::<ModelLoadState>(),
            ModelLoadState::Failed(_)
        ));
    }

    #[test]
    fn default_scene_wins_over_first_scene() {
        let first = Handle::<Scene>::weak_from_u128(1);
        let marked = Handle::<Scene>::weak_from_u128(2);
        let scenes = [first.clone(), marked.clone()];

        assert_eq!(root_scene(Some(&marked), &scenes, MODEL_PATH), Ok(marked));
        assert_eq!(root_scene(None, &scenes, MODEL_PATH), Ok(first));
    }

    #[test]
    fn document_without_scenes_is_invalid() {
        let error = root_scene(None, &[], MODEL_PATH).unwrap_err();
        assert_eq!(
            error,
            ModelLoadError::Invalid {
                path: MODEL_PATH.into(),
                reason: "document contains no scenes".into(),
            }
        );
    }

    #[test]
    fn missing_model_file_fails_as_unreachable() {
        let missing = "models/does_not_exist.glb";
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), GltfPlugin::default()))
            .add_systems(Update, poll_model_load);
        app.finish();
        app.cleanup();

        let handle = app.world().resource::<AssetServer>().load::<Gltf>(missing);
        app.insert_resource(ModelLoadState::Loading(handle));

        for _ in 0..400 {
            app.update();
            if !matches!(
                app.world().resource::<ModelLoadState>(),
                ModelLoadState::Loading(_)
            ) {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        match app.world().resource::<ModelLoadState>() {
            ModelLoadState::Failed(ModelLoadError::Unreachable { path, .. }) => {
                assert_eq!(path, missing);
            }
            other => panic!("expected an unreachable failure, got {other:?}"),
        }
    }
}
