use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::error::ModelLoadError;

/// Viewer lifecycle. `Mounting` spawns the whole scene tree, `Running` owns it.
/// Leaving `Running` despawns every entity scoped to it, which is how a reset
/// discards all viewer state.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Mounting,
    Running,
}

/// Explicit replacement for deferred rendering: the model subtree is drawn
/// according to this variant.
#[derive(Resource, Debug, Clone, Default)]
pub enum ModelLoadState {
    /// Nothing requested yet; the next frame issues the load.
    #[default]
    Idle,
    /// Waiting on the glTF document and everything it references.
    Loading(Handle<Gltf>),
    /// Root scene of the parsed document.
    Ready(Handle<Scene>),
    Failed(ModelLoadError),
}

impl ModelLoadState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading(_) => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// Placeholder geometry stands in for the model in these states.
    pub fn shows_placeholder(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading(_))
    }
}

/// Full-state reset, triggered by the "Reset Scene" button or the host page.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetSceneRequested;

/// Issue the model load again after a failure.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RetryModelLoad;

#[derive(Component)]
pub struct FpsText;

/// Finish mounting once the scene tree has been spawned.
pub fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("→ Viewer mounted, transitioning to Running state");
    next_state.set(AppState::Running);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_only_while_unresolved() {
        assert!(ModelLoadState::Idle.shows_placeholder());
        assert!(ModelLoadState::Loading(Handle::default()).shows_placeholder());
        assert!(!ModelLoadState::Ready(Handle::default()).shows_placeholder());
        let failed = ModelLoadState::Failed(ModelLoadError::Invalid {
            path: "models/model.glb".into(),
            reason: "truncated".into(),
        });
        assert!(!failed.shows_placeholder());
        assert_eq!(failed.label(), "failed");
    }
}
