use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use viewer_constants::quality::FPS_NOTIFY_INTERVAL_SECS;

use crate::engine::core::app_state::{AppState, FpsText};
use crate::rpc::web_rpc::WebRpcInterface;

pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    if current_time - *last_send_time >= FPS_NOTIFY_INTERVAL_SECS {
        if let Some(value) = smoothed_fps(&diagnostics) {
            rpc_interface.send_notification(
                "fps_update",
                serde_json::json!({
                    "fps": value as f32
                }),
            );
            *last_send_time = current_time;
        }
    }
}

/// Hidden FPS readout in the top-right corner.
pub fn spawn_fps_overlay(mut commands: Commands) {
    commands.spawn((
        Text::new("FPS: --"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            right: Val::Px(10.0),
            ..default()
        },
        Visibility::Hidden,
        FpsText,
        StateScoped(AppState::Running),
    ));
}

pub fn toggle_fps_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    mut overlays: Query<&mut Visibility, With<FpsText>>,
) {
    if !keys.just_pressed(KeyCode::F3) {
        return;
    }
    for mut visibility in &mut overlays {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Visible,
            _ => Visibility::Hidden,
        };
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f3_toggles_overlay() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(Update, toggle_fps_overlay);
        let overlay = app.world_mut().spawn((Visibility::Hidden, FpsText)).id();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::F3);
        app.update();
        assert_eq!(app.world().get::<Visibility>(overlay), Some(&Visibility::Visible));

        // Held key does not toggle again.
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().clear();
        app.update();
        assert_eq!(app.world().get::<Visibility>(overlay), Some(&Visibility::Visible));

        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(KeyCode::F3);
        keys.press(KeyCode::F3);
        app.update();
        assert_eq!(app.world().get::<Visibility>(overlay), Some(&Visibility::Hidden));
    }
}
