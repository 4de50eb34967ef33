//! The walkable surface a [`TriMeshNavmesh`](crate::TriMeshNavmesh) is built from.

use glam::{UVec3, Vec3A};

use crate::area::AreaType;

/// A triangle mesh describing the walkable surface of a world.
///
/// This is the baked output of a navmesh generator, not raw level geometry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TriMesh {
    /// The vertices composing the surface.
    /// Follows the convention of a triangle list.
    pub vertices: Vec<Vec3A>,

    /// The indices composing the surface.
    /// Follows the convention of a triangle list.
    pub indices: Vec<UVec3>,

    /// The area types of the trimesh. Each index corresponds 1:1 to the [`TriMesh::indices`].
    pub area_types: Vec<AreaType>,
}

impl TriMesh {
    /// Creates a trimesh where every triangle has the given area type.
    pub fn with_area(vertices: Vec<Vec3A>, indices: Vec<UVec3>, area: AreaType) -> Self {
        let area_types = vec![area; indices.len()];
        Self {
            vertices,
            indices,
            area_types,
        }
    }

    /// An axis-aligned rectangle on the xz-plane at height `y`, made of two triangles.
    pub fn rectangle(min_x: f32, min_z: f32, max_x: f32, max_z: f32, y: f32) -> Self {
        Self::with_area(
            vec![
                Vec3A::new(min_x, y, min_z),
                Vec3A::new(max_x, y, min_z),
                Vec3A::new(max_x, y, max_z),
                Vec3A::new(min_x, y, max_z),
            ],
            vec![UVec3::new(0, 1, 2), UVec3::new(0, 2, 3)],
            AreaType::DEFAULT_WALKABLE,
        )
    }

    /// Extends the trimesh with the vertices and indices of another trimesh.
    /// The indices of `other` will be offset by the number of vertices in `self`.
    pub fn extend(&mut self, other: TriMesh) {
        if self.vertices.len() > u32::MAX as usize {
            panic!("Cannot extend a trimesh with more than 2^32 vertices");
        }
        let next_vertex_index = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices
            .extend(other.indices.iter().map(|i| i + next_vertex_index));
        self.area_types.extend(other.area_types);
    }

    /// Number of triangles in the trimesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}
