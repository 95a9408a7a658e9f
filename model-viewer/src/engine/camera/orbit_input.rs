use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::orbit_controller::OrbitController;

/// Feed pointer input into the orbit controller.
///
/// Left drag rotates, right drag pans, the wheel zooms. One finger rotates,
/// two fingers pinch-zoom. Input is dropped while the pointer is over an
/// overlay panel or button so clicking "Reset Scene" does not also spin the
/// camera.
pub fn orbit_camera_input(
    mut camera_query: Query<(&mut OrbitController, &Transform, &Projection)>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    interactions: Query<&Interaction>,
    mut last_pinch_distance: Local<Option<f32>>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    if interactions.iter().any(|i| *i != Interaction::None) {
        *last_pinch_distance = None;
        return;
    }

    let Ok((mut orbit, transform, projection)) = camera_query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport_height = window.height();
    let fov = match projection {
        Projection::Perspective(perspective) => perspective.fov,
        _ => std::f32::consts::FRAC_PI_4,
    };

    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.rotate(mouse_delta, viewport_height);
        } else if mouse_button.pressed(MouseButton::Right) {
            orbit.pan(mouse_delta, viewport_height, fov, transform.rotation);
        }
    }

    if scroll_accum.abs() > f32::EPSILON {
        orbit.wheel(scroll_accum);
    }

    let active: Vec<_> = touches.iter().collect();
    match active.as_slice() {
        [finger] => {
            *last_pinch_distance = None;
            orbit.rotate(finger.delta(), viewport_height);
        }
        [first, second] => {
            let distance = first.position().distance(second.position());
            if let Some(previous) = *last_pinch_distance {
                orbit.pinch(previous, distance);
            }
            *last_pinch_distance = Some(distance);
        }
        _ => *last_pinch_distance = None,
    }
}

/// Apply pending orbit motion to the camera transform every frame so damping
/// keeps easing after input stops.
pub fn update_orbit_camera(mut camera_query: Query<(&mut OrbitController, &mut Transform)>) {
    for (mut orbit, mut transform) in &mut camera_query {
        orbit.update(&mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::InputPlugin;
    use bevy::window::WindowResolution;
    use viewer_constants::camera::{ORBIT_LIMITS, ORBIT_TARGET};

    fn app_with_camera() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, InputPlugin))
            .add_systems(Update, (orbit_camera_input, update_orbit_camera).chain());
        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(800.0, 600.0),
                ..default()
            },
            PrimaryWindow,
        ));
        let camera = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 0.0, 5.0),
                Projection::Perspective(PerspectiveProjection::default()),
                OrbitController::new(ORBIT_TARGET, ORBIT_LIMITS),
            ))
            .id();
        (app, camera)
    }

    #[test]
    fn wheel_zoom_stays_within_bounds() {
        let (mut app, camera) = app_with_camera();
        let window = app
            .world_mut()
            .query_filtered::<Entity, With<PrimaryWindow>>()
            .single(app.world())
            .unwrap();

        for y in [40.0, -400.0, 3.0, 250.0] {
            app.world_mut().send_event(MouseWheel {
                unit: MouseScrollUnit::Line,
                x: 0.0,
                y,
                window,
            });
            app.update();
            let translation = app.world().get::<Transform>(camera).unwrap().translation;
            let distance = translation.distance(ORBIT_TARGET);
            assert!((15.0 - 1e-3..=50.0 + 1e-3).contains(&distance));
        }
    }

    #[test]
    fn ui_hover_blocks_camera_input() {
        let (mut app, camera) = app_with_camera();
        app.update();
        let before = app.world().get::<OrbitController>(camera).unwrap().distance();

        app.world_mut().spawn(Interaction::Hovered);
        let window = app
            .world_mut()
            .query_filtered::<Entity, With<PrimaryWindow>>()
            .single(app.world())
            .unwrap();
        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: -100.0,
            window,
        });
        app.update();

        let after = app.world().get::<OrbitController>(camera).unwrap().distance();
        assert_eq!(before, after);
    }

    #[test]
    fn drag_over_panel_padding_does_not_orbit() {
        let (mut app, camera) = app_with_camera();
        app.update();
        let before = app.world().get::<OrbitController>(camera).unwrap().spherical();

        let panel = app.world_mut().spawn(crate::ui::panel_node()).id();
        *app.world_mut().get_mut::<Interaction>(panel).unwrap() = Interaction::Hovered;
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.world_mut().send_event(MouseMotion {
            delta: Vec2::new(120.0, 40.0),
        });
        app.update();

        let after = app.world().get::<OrbitController>(camera).unwrap().spherical();
        assert_eq!(before, after);
    }
}
