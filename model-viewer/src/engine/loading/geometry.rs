use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::scene::SceneInstanceReady;

use super::presentation::LoadedModel;

/// World-space triangles of the loaded model, used by the shadow bakes.
#[derive(Resource, Default)]
pub struct ModelGeometry {
    pub triangles: Vec<[Vec3; 3]>,
    /// Bumped every time `triangles` is replaced.
    pub revision: u64,
    pending: bool,
}

impl ModelGeometry {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Replace the triangle set and mark it as a new revision.
    pub fn replace(&mut self, triangles: Vec<[Vec3; 3]>) {
        self.triangles = triangles;
        self.revision += 1;
        self.pending = false;
    }
}

/// Forget the previous mount's triangles. The revision keeps counting so
/// freshly spawned catchers never mistake old geometry for current.
pub fn reset_model_geometry(mut geometry: ResMut<ModelGeometry>) {
    geometry.triangles.clear();
    geometry.pending = false;
}

/// Observer on the model root: the scene's entities now exist, gather their
/// geometry once transforms have propagated.
pub fn on_model_instance_ready(
    _trigger: Trigger<SceneInstanceReady>,
    mut geometry: ResMut<ModelGeometry>,
) {
    geometry.pending = true;
}

pub fn gather_model_geometry(
    mut geometry: ResMut<ModelGeometry>,
    models: Query<Entity, With<LoadedModel>>,
    children: Query<&Children>,
    mesh_instances: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
) {
    if !geometry.pending {
        return;
    }

    let mut triangles = Vec::new();
    for root in &models {
        for entity in children.iter_descendants(root) {
            let Ok((mesh_handle, transform)) = mesh_instances.get(entity) else {
                continue;
            };
            if let Some(mesh) = meshes.get(&mesh_handle.0) {
                collect_triangles(mesh, transform, &mut triangles);
            }
        }
    }

    info!("Gathered {} model triangles for shadow baking", triangles.len());
    geometry.replace(triangles);
}

/// Append the mesh's triangles, transformed to world space. Non-triangle
/// topologies and meshes without positions contribute nothing.
pub fn collect_triangles(mesh: &Mesh, transform: &GlobalTransform, out: &mut Vec<[Vec3; 3]>) {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return;
    }
    let Some(positions) = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(|values| values.as_float3())
    else {
        return;
    };

    let world: Vec<Vec3> = positions
        .iter()
        .map(|p| transform.transform_point(Vec3::from_array(*p)))
        .collect();

    let indices: Vec<usize> = match mesh.indices() {
        Some(indices) => indices.iter().collect(),
        None => (0..world.len()).collect(),
    };

    for corner in indices.chunks_exact(3) {
        if let (Some(a), Some(b), Some(c)) = (
            world.get(corner[0]),
            world.get(corner[1]),
            world.get(corner[2]),
        ) {
            out.push([*a, *b, *c]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_twelve_world_space_triangles() {
        let mesh = Mesh::from(Cuboid::default());
        let transform = GlobalTransform::from_translation(Vec3::new(0.0, 3.0, 0.0));
        let mut triangles = Vec::new();
        collect_triangles(&mesh, &transform, &mut triangles);

        assert_eq!(triangles.len(), 12);
        for triangle in &triangles {
            for corner in triangle {
                assert!((corner.y - 3.0).abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn line_meshes_are_skipped() {
        let mut mesh = Mesh::new(
            PrimitiveTopology::LineList,
            bevy::asset::RenderAssetUsages::default(),
        );
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        let mut triangles = Vec::new();
        collect_triangles(&mesh, &GlobalTransform::IDENTITY, &mut triangles);
        assert!(triangles.is_empty());
    }

    #[test]
    fn replace_bumps_revision() {
        let mut geometry = ModelGeometry::default();
        assert!(geometry.is_empty());
        geometry.replace(vec![[Vec3::ZERO, Vec3::X, Vec3::Z]]);
        assert_eq!(geometry.revision, 1);
        assert!(!geometry.is_empty());
    }
}
