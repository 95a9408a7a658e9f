use bevy::prelude::*;
use viewer_constants::ui::{PANEL_OFFSET_PX, PANEL_Z_INDEX, RESET_LABEL};

use super::{panel_node, spawn_button};
use crate::engine::core::app_state::{AppState, ResetSceneRequested};

#[derive(Component)]
pub struct ResetPanel;

#[derive(Component)]
pub struct ResetButton;

pub fn spawn_reset_panel(mut commands: Commands) {
    let (mut node, background, radius, interaction) = panel_node();
    node.position_type = PositionType::Absolute;
    node.top = Val::Px(PANEL_OFFSET_PX);
    node.left = Val::Px(PANEL_OFFSET_PX);

    commands
        .spawn((
            ResetPanel,
            Name::new("Reset Panel"),
            node,
            background,
            radius,
            interaction,
            ZIndex(PANEL_Z_INDEX),
            StateScoped(AppState::Running),
        ))
        .with_children(|panel| {
            spawn_button(panel, RESET_LABEL, ResetButton);
        });
}

pub fn reset_button_system(
    buttons: Query<&Interaction, (Changed<Interaction>, With<ResetButton>)>,
    mut requests: EventWriter<ResetSceneRequested>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            info!("Reset Scene pressed");
            requests.write(ResetSceneRequested);
        }
    }
}
