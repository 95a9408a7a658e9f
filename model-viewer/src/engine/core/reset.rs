use bevy::prelude::*;

use super::app_state::{AppState, ResetSceneRequested};

/// Reset always discards all viewer state. In the browser that is a page
/// reload; elsewhere the viewer is re-mounted from scratch by leaving
/// `Running`, which despawns every `StateScoped(AppState::Running)` entity.
pub fn handle_reset_requests(
    mut requests: EventReader<ResetSceneRequested>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    {
        match reload_page() {
            Ok(()) => return,
            Err(e) => warn!("Page reload failed ({e}), re-mounting in place"),
        }
    }

    info!("Reset requested, re-mounting viewer");
    next_state.set(AppState::Mounting);
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, thiserror::Error)]
enum PageReloadError {
    #[error("no browser window")]
    NoWindow,
    #[error("location.reload rejected: {0}")]
    Rejected(String),
}

#[cfg(target_arch = "wasm32")]
fn reload_page() -> Result<(), PageReloadError> {
    let window = web_sys::window().ok_or(PageReloadError::NoWindow)?;
    window
        .location()
        .reload()
        .map_err(|e| PageReloadError::Rejected(format!("{e:?}")))
}
