//! Baked soft shadows on ground catchers.
//!
//! Both bakes rasterise the loaded model's world-space triangles on the CPU
//! into a [`shadow_canvas::ShadowCanvas`] and upload the result as the texture
//! of an unlit, alpha-blended plane. Bakes restart whenever a new geometry
//! revision arrives.

/// Randomized-light soft shadow accumulated over many frames.
pub mod accumulative_shadows;

/// Single top-down bake darkening the ground under nearby geometry.
pub mod contact_shadows;

/// Coverage buffer, rasteriser and texture export.
pub mod shadow_canvas;

use bevy::prelude::*;

/// Spawn both shadow catchers for the current mount.
pub fn spawn_shadow_catchers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    contact_shadows::spawn_contact_shadows(&mut commands, &mut meshes, &mut materials, &mut images);
    accumulative_shadows::spawn_accumulative_shadows(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut images,
    );
}
