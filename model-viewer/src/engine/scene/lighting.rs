use bevy::pbr::{DirectionalLightShadowMap, PointLightShadowMap};
use bevy::prelude::*;
use viewer_constants::lighting::{
    AMBIENT_INTENSITY, DIRECTIONAL_LIGHT, DirectionalLightSettings, SPOT_LIGHT, SpotLightSettings,
};

use crate::engine::core::app_state::AppState;

/// Ambient brightness per unit of viewer intensity, in cd/m².
const AMBIENT_BRIGHTNESS_SCALE: f32 = 400.0;

/// Reach of the spot light; comfortably past the orbit target.
const SPOT_LIGHT_RANGE: f32 = 60.0;

pub fn ambient_light(intensity: f32) -> AmbientLight {
    AmbientLight {
        color: Color::WHITE,
        brightness: intensity * AMBIENT_BRIGHTNESS_SCALE,
        ..default()
    }
}

/// Cone with a soft edge: the inner angle shrinks as the penumbra grows.
pub fn spot_light(settings: &SpotLightSettings) -> SpotLight {
    SpotLight {
        range: SPOT_LIGHT_RANGE,
        outer_angle: settings.angle,
        inner_angle: settings.angle * (1.0 - settings.penumbra.clamp(0.0, 1.0)),
        shadows_enabled: settings.cast_shadow,
        ..default()
    }
}

pub fn directional_light(settings: &DirectionalLightSettings) -> DirectionalLight {
    DirectionalLight {
        illuminance: settings.intensity * light_consts::lux::AMBIENT_DAYLIGHT,
        shadows_enabled: settings.cast_shadow,
        ..default()
    }
}

/// Ambient fill, a shadowed spot from above and a directional light from below.
pub fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(ambient_light(AMBIENT_INTENSITY));
    commands.insert_resource(DirectionalLightShadowMap {
        size: SPOT_LIGHT.shadow_map_size,
    });
    commands.insert_resource(PointLightShadowMap {
        size: SPOT_LIGHT.shadow_map_size,
    });

    commands.spawn((
        Name::new("Spot Light"),
        spot_light(&SPOT_LIGHT),
        Transform::from_translation(SPOT_LIGHT.position).looking_at(Vec3::ZERO, Vec3::Y),
        StateScoped(AppState::Running),
    ));

    commands.spawn((
        Name::new("Directional Light"),
        directional_light(&DIRECTIONAL_LIGHT),
        Transform::from_translation(DIRECTIONAL_LIGHT.position).looking_at(Vec3::ZERO, Vec3::Y),
        StateScoped(AppState::Running),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_penumbra_fades_from_the_axis() {
        let light = spot_light(&SPOT_LIGHT);
        assert_eq!(light.outer_angle, 0.15);
        assert_eq!(light.inner_angle, 0.0);
        assert!(light.shadows_enabled);
        assert!(light.range > SPOT_LIGHT.position.length());
    }

    #[test]
    fn hard_edged_spot_keeps_inner_angle() {
        let light = spot_light(&SpotLightSettings {
            penumbra: 0.0,
            ..SPOT_LIGHT
        });
        assert_eq!(light.inner_angle, light.outer_angle);
    }

    #[test]
    fn directional_light_scales_daylight() {
        let light = directional_light(&DIRECTIONAL_LIGHT);
        let expected = 0.9 * light_consts::lux::AMBIENT_DAYLIGHT;
        assert!((light.illuminance - expected).abs() < 1e-3);
        assert!(light.shadows_enabled);
    }

    #[test]
    fn ambient_brightness_follows_intensity() {
        assert_eq!(ambient_light(0.0).brightness, 0.0);
        assert!(ambient_light(AMBIENT_INTENSITY).brightness > 0.0);
    }
}
