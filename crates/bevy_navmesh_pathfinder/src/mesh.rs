use bevy_mesh::{Mesh, PrimitiveTopology};
use bevy_transform::components::GlobalTransform;
use glam::{UVec3, Vec3A};
use navmesh_pathfinder::{AreaType, TriMesh, TriMeshNavmesh, TriMeshNavmeshError};

use crate::WalkableSurface;

/// Used to add [`TriMeshFromBevyMesh::from_mesh`] to [`TriMesh`].
pub trait TriMeshFromBevyMesh {
    /// Converts a [`Mesh`] into a [`TriMesh`] where every triangle is [`AreaType::DEFAULT_WALKABLE`].
    ///
    /// Returns `None` if the mesh is not an indexed triangle list with 3D positions.
    fn from_mesh(mesh: &Mesh) -> Option<TriMesh>;
}

impl TriMeshFromBevyMesh for TriMesh {
    fn from_mesh(mesh: &Mesh) -> Option<TriMesh> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return None;
        }

        let position = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?;
        let float = position.as_float3()?;
        let vertices = float.iter().map(|v| Vec3A::from(*v)).collect();

        let indices: Vec<_> = mesh.indices()?.iter().collect();
        if !indices.len().is_multiple_of(3) {
            return None;
        }
        let indices = indices
            .chunks(3)
            .map(|indices| {
                UVec3::from_array([indices[0] as u32, indices[1] as u32, indices[2] as u32])
            })
            .collect();
        Some(TriMesh::with_area(
            vertices,
            indices,
            AreaType::DEFAULT_WALKABLE,
        ))
    }
}

impl WalkableSurface {
    /// Builds a surface from meshes placed in the world.
    ///
    /// Meshes that [`TriMeshFromBevyMesh::from_mesh`] cannot convert are skipped.
    pub fn from_meshes<'a>(
        meshes: impl IntoIterator<Item = (&'a GlobalTransform, &'a Mesh)>,
    ) -> Result<Self, TriMeshNavmeshError> {
        let mut trimesh = TriMesh::default();
        for (transform, mesh) in meshes {
            let Some(mut part) = TriMesh::from_mesh(mesh) else {
                tracing::warn!("Skipping mesh that is not an indexed triangle list");
                continue;
            };
            let affine = transform.affine();
            for vertex in &mut part.vertices {
                *vertex = affine.transform_point3a(*vertex);
            }
            trimesh.extend(part);
        }
        TriMeshNavmesh::new(&trimesh).map(Self)
    }
}
