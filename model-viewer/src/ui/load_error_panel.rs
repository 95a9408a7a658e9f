use bevy::prelude::*;
use viewer_constants::ui::{PANEL_Z_INDEX, RETRY_LABEL};

use super::{panel_node, spawn_button};
use crate::engine::core::app_state::{AppState, RetryModelLoad};
use crate::error::ModelLoadError;

/// Full-viewport container centring the error panel.
#[derive(Component)]
pub struct LoadErrorPanel;

#[derive(Component)]
pub struct RetryButton;

pub fn error_message(error: &ModelLoadError) -> String {
    format!("Could not display the model.\n{error}")
}

pub fn spawn_load_error_panel(commands: &mut Commands, error: &ModelLoadError) {
    let message = error_message(error);

    commands
        .spawn((
            LoadErrorPanel,
            Name::new("Load Error"),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            ZIndex(PANEL_Z_INDEX),
            StateScoped(AppState::Running),
        ))
        .with_children(|root| {
            root.spawn(panel_node()).with_children(|panel| {
                panel.spawn((
                    Text::new(message),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    TextLayout::new_with_justify(JustifyText::Center),
                ));
                spawn_button(panel, RETRY_LABEL, RetryButton);
            });
        });
}

pub fn retry_button_system(
    buttons: Query<&Interaction, (Changed<Interaction>, With<RetryButton>)>,
    mut retries: EventWriter<RetryModelLoad>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            retries.write(RetryModelLoad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_failing_asset() {
        let error = ModelLoadError::Unreachable {
            path: "models/model.glb".into(),
            reason: "404".into(),
        };
        assert!(error_message(&error).contains("models/model.glb"));
    }

    #[test]
    fn panel_offers_retry() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<RetryModelLoad>()
            .add_systems(Update, retry_button_system);
        {
            let mut commands = app.world_mut().commands();
            spawn_load_error_panel(
                &mut commands,
                &ModelLoadError::Invalid {
                    path: "models/model.glb".into(),
                    reason: "bad magic".into(),
                },
            );
        }
        app.world_mut().flush();

        let retry = app
            .world_mut()
            .query_filtered::<Entity, With<RetryButton>>()
            .single(app.world())
            .unwrap();
        app.world_mut().entity_mut(retry).insert(Interaction::Pressed);
        app.update();

        let events = app.world().resource::<Events<RetryModelLoad>>();
        assert_eq!(events.get_cursor().read(events).count(), 1);
    }
}
