//! On-screen controls layered over the viewport.
//!
//! The reset panel is always present while running; the load error panel only
//! while the model is in the failed state.

/// Centred error message with a Retry button.
pub mod load_error_panel;

/// Top-left "Reset Scene" control.
pub mod reset_panel;

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use viewer_constants::ui::{
    BUTTON_BACKGROUND, BUTTON_FONT_SIZE, BUTTON_HOVER_BACKGROUND, BUTTON_TEXT_COLOR,
    PANEL_BACKGROUND, PANEL_PADDING_PX, PANEL_RADIUS_PX,
};

/// Translucent dark panel shared by the overlays. The panel tracks its own
/// `Interaction` so pointer input over its padding counts as UI input.
pub fn panel_node() -> (Node, BackgroundColor, BorderRadius, Interaction) {
    (
        Node {
            padding: UiRect::all(Val::Px(PANEL_PADDING_PX)),
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(8.0),
            ..default()
        },
        BackgroundColor(PANEL_BACKGROUND),
        BorderRadius::all(Val::Px(PANEL_RADIUS_PX)),
        Interaction::None,
    )
}

/// Spawn a labelled button carrying `marker` under `parent`.
pub fn spawn_button(parent: &mut ChildSpawnerCommands, label: &str, marker: impl Bundle) {
    parent
        .spawn((
            marker,
            Button,
            Name::new(format!("{label} Button")),
            BackgroundColor(BUTTON_BACKGROUND),
            BorderRadius::all(Val::Px(3.0)),
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: BUTTON_FONT_SIZE,
                    ..default()
                },
                TextColor(BUTTON_TEXT_COLOR),
            ));
        });
}

/// Hover feedback for every overlay button.
pub fn button_hover_colors(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut background) in &mut buttons {
        *background = match interaction {
            Interaction::Hovered | Interaction::Pressed => BackgroundColor(BUTTON_HOVER_BACKGROUND),
            Interaction::None => BackgroundColor(BUTTON_BACKGROUND),
        };
    }
}
