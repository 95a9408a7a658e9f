use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use viewer_constants::helpers::{AXES_SIZE, GRID, GridSettings};

use crate::engine::core::app_state::AppState;

#[derive(Component)]
pub struct GroundGrid;

#[derive(Component)]
pub struct AxesHelper;

/// Coloured segment; colour given at each end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub start_color: Color,
    pub end_color: Color,
}

impl LineSegment {
    fn solid(start: Vec3, end: Vec3, color: Color) -> Self {
        Self {
            start,
            end,
            start_color: color,
            end_color: color,
        }
    }
}

/// Square grid on the XZ plane centred at the origin, `divisions + 1` lines
/// per direction. The middle line of each direction uses the centre colour.
pub fn grid_lines(settings: &GridSettings) -> Vec<LineSegment> {
    let divisions = settings.divisions.max(1);
    let half = settings.size / 2.0;
    let step = settings.size / divisions as f32;
    let center = divisions / 2;

    let mut lines = Vec::with_capacity(2 * (divisions as usize + 1));
    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let color = if i == center {
            settings.center_line_color
        } else {
            settings.grid_color
        };
        lines.push(LineSegment::solid(
            Vec3::new(-half, 0.0, offset),
            Vec3::new(half, 0.0, offset),
            color,
        ));
        lines.push(LineSegment::solid(
            Vec3::new(offset, 0.0, -half),
            Vec3::new(offset, 0.0, half),
            color,
        ));
    }
    lines
}

/// X red, Y green, Z blue, each fading slightly towards its tip.
pub fn axes_lines(size: f32) -> Vec<LineSegment> {
    [
        (Vec3::X, Color::srgb(1.0, 0.0, 0.0), Color::srgb(1.0, 0.6, 0.0)),
        (Vec3::Y, Color::srgb(0.0, 1.0, 0.0), Color::srgb(0.6, 1.0, 0.0)),
        (Vec3::Z, Color::srgb(0.0, 0.0, 1.0), Color::srgb(0.0, 0.6, 1.0)),
    ]
    .into_iter()
    .map(|(axis, start_color, end_color)| LineSegment {
        start: Vec3::ZERO,
        end: axis * size,
        start_color,
        end_color,
    })
    .collect()
}

fn line_mesh(lines: &[LineSegment]) -> Mesh {
    let mut positions = Vec::with_capacity(lines.len() * 2);
    let mut colors = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        positions.push(line.start.to_array());
        positions.push(line.end.to_array());
        colors.push(line.start_color.to_linear().to_f32_array());
        colors.push(line.end_color.to_linear().to_f32_array());
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

/// Ground grid and axes; vertex coloured and unlit.
pub fn spawn_helpers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let line_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("Grid"),
        Mesh3d(meshes.add(line_mesh(&grid_lines(&GRID)))),
        MeshMaterial3d(line_material.clone()),
        NoFrustumCulling,
        Transform::IDENTITY,
        GroundGrid,
        StateScoped(AppState::Running),
    ));

    commands.spawn((
        Name::new("Axes"),
        Mesh3d(meshes.add(line_mesh(&axes_lines(AXES_SIZE)))),
        MeshMaterial3d(line_material),
        Transform::IDENTITY,
        AxesHelper,
        StateScoped(AppState::Running),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_size_with_highlighted_centre() {
        let lines = grid_lines(&GRID);
        assert_eq!(lines.len(), 202);

        let centre: Vec<_> = lines
            .iter()
            .filter(|l| l.start_color == GRID.center_line_color)
            .collect();
        assert_eq!(centre.len(), 2);
        assert!(centre.iter().all(|l| l.start.x == 0.0 || l.start.z == 0.0));

        let extent = lines
            .iter()
            .flat_map(|l| [l.start, l.end])
            .fold(0.0f32, |m, p| m.max(p.x.abs()).max(p.z.abs()));
        assert_eq!(extent, 50.0);
        assert!(lines.iter().all(|l| l.start.y == 0.0 && l.end.y == 0.0));
    }

    #[test]
    fn axes_point_along_positive_axes() {
        let lines = axes_lines(AXES_SIZE);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].end, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(lines[1].end, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(lines[2].end, Vec3::new(0.0, 0.0, 5.0));
        assert!(lines.iter().all(|l| l.start == Vec3::ZERO));
    }

    #[test]
    fn line_mesh_has_two_vertices_per_segment() {
        let mesh = line_mesh(&axes_lines(1.0));
        assert_eq!(mesh.count_vertices(), 6);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
    }
}
