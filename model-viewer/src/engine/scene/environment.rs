use bevy::asset::RenderAssetUsages;
use bevy::core_pipeline::Skybox;
use bevy::ecs::system::EntityCommands;
use bevy::pbr::environment_map::EnvironmentMapLight;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use viewer_constants::environment::{
    DIFFUSE_FACE_SIZE, EnvironmentPreset, EnvironmentSettings, FogSettings, SPECULAR_FACE_SIZE,
    SUNSET_SKY, SkyPalette,
};

/// Blur at or above which the backdrop switches to the irradiance map.
const BLURRED_BACKDROP_THRESHOLD: f32 = 0.5;

/// Sun highlight exponents: a tight disc for radiance, a broad glow for irradiance.
const SPECULAR_SUN_EXPONENT: f32 = 256.0;
const DIFFUSE_SUN_EXPONENT: f32 = 3.0;

fn palette(preset: EnvironmentPreset) -> &'static SkyPalette {
    match preset {
        EnvironmentPreset::Sunset => &SUNSET_SKY,
    }
}

/// Cubemaps generated for an environment preset.
#[derive(Debug, Clone)]
pub struct EnvironmentMaps {
    pub diffuse: Handle<Image>,
    pub specular: Handle<Image>,
}

impl EnvironmentMaps {
    pub fn generate(images: &mut Assets<Image>, preset: EnvironmentPreset) -> Self {
        let sky = palette(preset);
        Self {
            diffuse: images.add(sky_cubemap(sky, DIFFUSE_FACE_SIZE, DIFFUSE_SUN_EXPONENT)),
            specular: images.add(sky_cubemap(sky, SPECULAR_FACE_SIZE, SPECULAR_SUN_EXPONENT)),
        }
    }

    /// Backdrop source: the sharp radiance map or, when blurred, the irradiance map.
    pub fn backdrop(&self, settings: &EnvironmentSettings) -> Handle<Image> {
        if settings.blur >= BLURRED_BACKDROP_THRESHOLD {
            self.diffuse.clone()
        } else {
            self.specular.clone()
        }
    }
}

/// World direction through texel `(u, v)` of cube face `face`, with `u` and
/// `v` in `[-1, 1]` and `v` growing downwards. Faces follow the GPU layer
/// order +X, -X, +Y, -Y, +Z, -Z.
pub fn cube_face_direction(face: u32, u: f32, v: f32) -> Vec3 {
    let direction = match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    };
    direction.normalize()
}

fn linear(color: Color) -> Vec3 {
    let c = color.to_linear();
    Vec3::new(c.red, c.green, c.blue)
}

/// Linear radiance of the sky in `direction`.
pub fn sky_radiance(sky: &SkyPalette, direction: Vec3, sun_exponent: f32) -> Vec3 {
    let elevation = direction.y;
    let base = if elevation >= 0.0 {
        linear(sky.horizon).lerp(linear(sky.zenith), elevation.powf(0.6))
    } else {
        linear(sky.horizon).lerp(linear(sky.ground), (-elevation).powf(0.3))
    };
    let sun_facing = direction.dot(sky.sun_direction.normalize()).max(0.0);
    base + linear(sky.sun) * sun_facing.powf(sun_exponent)
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Six-layer sRGB cubemap of the sky.
pub fn sky_cubemap(sky: &SkyPalette, face_size: u32, sun_exponent: f32) -> Image {
    let face_size = face_size.max(1);
    let mut data = Vec::with_capacity((face_size * face_size * 6 * 4) as usize);
    for face in 0..6 {
        for y in 0..face_size {
            for x in 0..face_size {
                let u = 2.0 * (x as f32 + 0.5) / face_size as f32 - 1.0;
                let v = 2.0 * (y as f32 + 0.5) / face_size as f32 - 1.0;
                let rgb = sky_radiance(sky, cube_face_direction(face, u, v), sun_exponent)
                    .clamp(Vec3::ZERO, Vec3::ONE);
                let srgb = Color::linear_rgb(rgb.x, rgb.y, rgb.z).to_srgba();
                data.extend_from_slice(&[srgb.red, srgb.green, srgb.blue].map(to_byte));
                data.push(u8::MAX);
            }
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    image
}

/// Image based lighting, plus the preset as backdrop when requested.
pub fn insert_environment(
    camera: &mut EntityCommands,
    maps: &EnvironmentMaps,
    settings: &EnvironmentSettings,
) {
    info!("Applying {:?} environment preset", settings.preset);

    camera.insert(EnvironmentMapLight {
        diffuse_map: maps.diffuse.clone(),
        specular_map: maps.specular.clone(),
        intensity: settings.intensity,
        ..default()
    });

    if settings.background {
        camera.insert(Skybox {
            image: maps.backdrop(settings),
            brightness: settings.intensity,
            rotation: Quat::IDENTITY,
        });
    }
}

pub fn distance_fog(settings: &FogSettings) -> DistanceFog {
    DistanceFog {
        color: settings.color,
        falloff: FogFalloff::Linear {
            start: settings.near,
            end: settings.far,
        },
        ..default()
    }
}

/// The fog that ends up on the camera: the last one declared.
pub fn effective_fog(volumes: &[FogSettings]) -> Option<&FogSettings> {
    volumes.last()
}

/// Apply fog declarations in order. A camera carries a single fog, so each
/// later declaration replaces the previous one.
pub fn attach_fog_volumes(camera: &mut EntityCommands, volumes: &[FogSettings]) {
    for (index, fog) in volumes.iter().enumerate().skip(1) {
        warn!(
            "Fog declaration {} replaces the previous one (near {}, far {})",
            index, fog.near, fog.far
        );
    }
    if let Some(fog) = effective_fog(volumes) {
        camera.insert(distance_fog(fog));
    }
}
