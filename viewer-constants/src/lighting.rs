use bevy::math::Vec3;

/// Ambient fill, in the viewer's unitless intensity scale.
pub const AMBIENT_INTENSITY: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLightSettings {
    pub position: Vec3,
    /// Outer cone angle in radians.
    pub angle: f32,
    /// Fraction of the cone that is attenuated towards the edge.
    pub penumbra: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: usize,
}

pub const SPOT_LIGHT: SpotLightSettings = SpotLightSettings {
    position: Vec3::new(10.0, 10.0, 10.0),
    angle: 0.15,
    penumbra: 1.0,
    cast_shadow: true,
    shadow_map_size: 2048,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLightSettings {
    pub position: Vec3,
    pub intensity: f32,
    pub cast_shadow: bool,
}

/// Lights the model from below; aims at the origin.
pub const DIRECTIONAL_LIGHT: DirectionalLightSettings = DirectionalLightSettings {
    position: Vec3::new(-110.0, -220.0, -100.0),
    intensity: 0.9,
    cast_shadow: true,
};
