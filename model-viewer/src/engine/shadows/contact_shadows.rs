use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use viewer_constants::shadows::{CONTACT_SHADOWS, ContactShadowSettings};

use super::shadow_canvas::ShadowCanvas;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::geometry::ModelGeometry;

/// Lift above the ground grid to avoid z-fighting with its lines.
const SURFACE_LIFT: f32 = 0.002;

/// Ground square receiving the baked contact shadow.
#[derive(Component)]
pub struct ContactShadowCatcher {
    pub settings: ContactShadowSettings,
    image: Handle<Image>,
    baked_revision: u64,
}

pub fn spawn_contact_shadows(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
) {
    let settings = CONTACT_SHADOWS;
    let blank = ShadowCanvas::new(settings.resolution, settings.position.xz(), settings.scale);
    let image = images.add(blank.to_image(settings.color, |_| 0.0));

    commands.spawn((
        Name::new("Contact Shadows"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(settings.scale, settings.scale))),
        MeshMaterial3d(materials.add(shadow_material(image.clone()))),
        Transform::from_translation(settings.position + Vec3::Y * SURFACE_LIFT),
        NotShadowCaster,
        NotShadowReceiver,
        ContactShadowCatcher {
            settings,
            image,
            baked_revision: 0,
        },
        StateScoped(AppState::Running),
    ));
}

/// Unlit, alpha-blended carrier for a baked shadow texture.
pub fn shadow_material(image: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: Some(image),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

/// Top-down darkness map: each triangle darkens the texels beneath it by how
/// close its lowest point sits to the plane, fading out at `far`.
pub fn bake_contact_shadow(settings: &ContactShadowSettings, triangles: &[[Vec3; 3]]) -> ShadowCanvas {
    let mut canvas = ShadowCanvas::new(settings.resolution, settings.position.xz(), settings.scale);
    let ground = settings.position.y;

    for [a, b, c] in triangles {
        let lowest = a.y.min(b.y).min(c.y) - ground;
        let highest = a.y.max(b.y).max(c.y) - ground;
        if highest < 0.0 {
            continue;
        }
        let height = lowest.max(0.0);
        if height >= settings.far {
            continue;
        }
        canvas.fill_triangle(a.xz(), b.xz(), c.xz(), 1.0 - height / settings.far);
    }

    canvas.box_blur(blur_radius(settings));
    canvas
}

/// Blur radius in texels; a blur of 1 spreads over 1/64th of the canvas.
fn blur_radius(settings: &ContactShadowSettings) -> u32 {
    (settings.blur.max(0.0) * settings.resolution as f32 / 64.0).round() as u32
}

/// Rebake whenever a new model geometry revision arrives.
pub fn update_contact_shadows(
    geometry: Res<ModelGeometry>,
    mut catchers: Query<&mut ContactShadowCatcher>,
    mut images: ResMut<Assets<Image>>,
) {
    for mut catcher in &mut catchers {
        if catcher.baked_revision == geometry.revision || geometry.is_empty() {
            continue;
        }
        let settings = catcher.settings;
        let canvas = bake_contact_shadow(&settings, &geometry.triangles);
        if let Some(image) = images.get_mut(&catcher.image) {
            *image = canvas.to_image(settings.color, |darkness| darkness * settings.opacity);
        }
        catcher.baked_revision = geometry.revision;
        debug!("Contact shadows baked for geometry revision {}", geometry.revision);
    }
}
