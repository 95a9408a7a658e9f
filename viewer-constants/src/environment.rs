use bevy::color::Color;
use bevy::math::Vec3;

/// Clear colour of the viewport.
pub const BACKGROUND_COLOR: Color = Color::srgb(0.933, 0.933, 0.933);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogSettings {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// Fog declarations in mount order. The camera has a single fog slot, so the
/// last entry is the one that ends up rendered.
pub const FOG_VOLUMES: [FogSettings; 2] = [
    FogSettings {
        color: Color::srgb(0.2, 0.2, 0.2),
        near: 10.0,
        far: 50.0,
    },
    FogSettings {
        color: Color::srgb(0.125, 0.125, 0.125),
        near: 5.0,
        far: 100.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentPreset {
    Sunset,
}

/// Colours of a procedural sky, blended by elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPalette {
    pub zenith: Color,
    pub horizon: Color,
    pub ground: Color,
    pub sun: Color,
    /// Direction towards the sun; normalised on use.
    pub sun_direction: Vec3,
}

pub const SUNSET_SKY: SkyPalette = SkyPalette {
    zenith: Color::srgb(0.16, 0.2, 0.42),
    horizon: Color::srgb(0.98, 0.55, 0.3),
    ground: Color::srgb(0.22, 0.15, 0.14),
    sun: Color::srgb(1.0, 0.78, 0.5),
    sun_direction: Vec3::new(-0.6, 0.12, -0.8),
};

/// Face edge of the generated radiance cubemap.
pub const SPECULAR_FACE_SIZE: u32 = 64;

/// Face edge of the generated irradiance cubemap.
pub const DIFFUSE_FACE_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSettings {
    pub preset: EnvironmentPreset,
    /// Also draw the environment as the scene background.
    pub background: bool,
    /// Background blur in `[0, 1]`.
    pub blur: f32,
    /// Image based lighting intensity, cd/m².
    pub intensity: f32,
}

pub const ENVIRONMENT: EnvironmentSettings = EnvironmentSettings {
    preset: EnvironmentPreset::Sunset,
    background: true,
    blur: 0.7,
    intensity: 900.0,
};
