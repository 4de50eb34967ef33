//! A [`NavmeshQueryBackend`] answering queries directly on a walkable [`TriMesh`].

use core::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::Vec3A;
use thiserror::Error;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

use crate::{
    AreaMask, AreaType, BackendPath, NavmeshPath, NavmeshQueryBackend, PathStatus, SurfaceHit,
    TriMesh,
    math::{
        TriangleIndices as _, TriangleVertices as _, closest_point_on_segment, cross_xz, triarea2,
    },
};

/// Settings of a [`TriMeshNavmesh`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct TriMeshNavmeshSettings {
    /// How far above or below the surface a point may be and still count as being on it. `[Limit: >= 0] [Units: wu]`
    ///
    /// Path queries starting or ending further away from the surface are invalid.
    pub vertical_tolerance: f32,

    /// Maximum number of triangles a single path query expands. `[Limit: > 0]`
    ///
    /// When the search runs out of nodes, a [`PathStatus::Partial`] path towards the target is returned.
    pub max_search_nodes: usize,
}

impl Default for TriMeshNavmeshSettings {
    fn default() -> Self {
        Self {
            vertical_tolerance: 0.5,
            max_search_nodes: 2048,
        }
    }
}

/// Errors that can occur when building a [`TriMeshNavmesh`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriMeshNavmeshError {
    /// Happens when a triangle references a vertex that does not exist.
    #[error(
        "triangle {triangle} references vertex {index}, but the trimesh only has {vertex_count} vertices"
    )]
    IndexOutOfBounds {
        /// The index of the offending triangle
        triangle: usize,
        /// The vertex index that is out of bounds
        index: u32,
        /// The number of vertices in the trimesh
        vertex_count: usize,
    },
    /// Happens when [`TriMesh::area_types`] does not have one entry per triangle.
    #[error("expected one area type per triangle, got {area_types} area types for {triangles} triangles")]
    AreaTypeCountMismatch {
        /// The number of area types
        area_types: usize,
        /// The number of triangles
        triangles: usize,
    },
}

#[derive(Debug, Clone)]
struct Polygon {
    vertices: [Vec3A; 3],
    area: AreaType,
    /// Neighbor across the edge `vertices[i]` -> `vertices[(i + 1) % 3]`
    neighbors: [Option<usize>; 3],
    centroid: Vec3A,
}

impl Polygon {
    fn edges(&self) -> [(Vec3A, Vec3A); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// A navmesh built from the walkable triangles of a [`TriMesh`].
///
/// Path queries run A* over triangle adjacency and straighten the triangle corridor with the funnel algorithm.
/// Triangles are connected when they share an edge, i.e. both of its vertex positions.
#[derive(Debug, Clone)]
pub struct TriMeshNavmesh {
    polygons: Vec<Polygon>,
    settings: TriMeshNavmeshSettings,
}

impl TriMeshNavmesh {
    /// Builds a navmesh with default [`TriMeshNavmeshSettings`].
    pub fn new(trimesh: &TriMesh) -> Result<Self, TriMeshNavmeshError> {
        Self::with_settings(trimesh, TriMeshNavmeshSettings::default())
    }

    /// Builds a navmesh from all walkable triangles of `trimesh`.
    ///
    /// Triangles with [`AreaType::NOT_WALKABLE`] and triangles that are degenerate on the xz-plane are skipped.
    pub fn with_settings(
        trimesh: &TriMesh,
        settings: TriMeshNavmeshSettings,
    ) -> Result<Self, TriMeshNavmeshError> {
        if trimesh.area_types.len() != trimesh.indices.len() {
            return Err(TriMeshNavmeshError::AreaTypeCountMismatch {
                area_types: trimesh.area_types.len(),
                triangles: trimesh.indices.len(),
            });
        }

        let mut polygons = Vec::with_capacity(trimesh.indices.len());
        for (i, (indices, area)) in trimesh
            .indices
            .iter()
            .zip(trimesh.area_types.iter().copied())
            .enumerate()
        {
            let Some(vertices) = indices.vertices(&trimesh.vertices) else {
                let vertex_count = trimesh.vertices.len();
                let index = indices
                    .to_array()
                    .into_iter()
                    .find(|index| *index as usize >= vertex_count)
                    .unwrap_or_default();
                return Err(TriMeshNavmeshError::IndexOutOfBounds {
                    triangle: i,
                    index,
                    vertex_count,
                });
            };
            if !area.is_walkable() || vertices.area_xz2().abs() <= f32::EPSILON {
                continue;
            }
            polygons.push(Polygon {
                vertices,
                area,
                neighbors: [None; 3],
                centroid: vertices.centroid(),
            });
        }
        let skipped = trimesh.indices.len() - polygons.len();
        if skipped > 0 {
            tracing::debug!("Skipped {skipped} unwalkable or degenerate triangles");
        }

        link_neighbors(&mut polygons);

        Ok(Self { polygons, settings })
    }

    /// The settings this navmesh was built with.
    pub fn settings(&self) -> &TriMeshNavmeshSettings {
        &self.settings
    }

    /// Number of walkable triangles.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Whether `point` lies on a triangle allowed by `area_mask`, within the vertical tolerance.
    pub fn is_on_surface(&self, point: Vec3A, area_mask: AreaMask) -> bool {
        self.locate(point, area_mask).is_some()
    }

    /// Finds the triangle below or above `point` that is vertically closest to it.
    /// Returns the triangle and `point` moved onto its surface.
    fn locate(&self, point: Vec3A, area_mask: AreaMask) -> Option<(usize, Vec3A)> {
        let mut best: Option<(f32, usize, f32)> = None;
        for (i, polygon) in self.allowed_polygons(area_mask) {
            let Some(height) = polygon.vertices.height_at_xz(point) else {
                continue;
            };
            let offset = (height - point.y).abs();
            if offset > self.settings.vertical_tolerance {
                continue;
            }
            if best.is_none_or(|(best_offset, _, _)| offset < best_offset) {
                best = Some((offset, i, height));
            }
        }
        best.map(|(_, i, height)| (i, Vec3A::new(point.x, height, point.z)))
    }

    fn allowed_polygons(&self, area_mask: AreaMask) -> impl Iterator<Item = (usize, &Polygon)> {
        self.polygons
            .iter()
            .enumerate()
            .filter(move |(_, polygon)| area_mask.allows(polygon.area))
    }

    fn neighbors(&self, poly: usize, area_mask: AreaMask) -> impl Iterator<Item = usize> + '_ {
        // Deterministic order: edge order (0,1), (1,2), (2,0).
        self.polygons[poly]
            .neighbors
            .into_iter()
            .flatten()
            .filter(move |neighbor| area_mask.allows(self.polygons[*neighbor].area))
    }

    /// A* over the triangle graph.
    fn find_polygon_path(
        &self,
        start_poly: usize,
        end_poly: usize,
        end: Vec3A,
        area_mask: AreaMask,
    ) -> Option<(Vec<usize>, PathStatus)> {
        if start_poly == end_poly {
            return Some((vec![start_poly], PathStatus::Complete));
        }

        let quant = |d: f32| -> u32 { (d.max(0.0) * 1024.0) as u32 };
        let heuristic = |poly: usize| -> u32 { quant(self.polygons[poly].centroid.distance(end)) };
        let edge_cost = |a: usize, b: usize| -> u32 {
            quant(self.polygons[a].centroid.distance(self.polygons[b].centroid)).saturating_add(1)
        };

        let n = self.polygons.len();
        let mut open = BinaryHeap::new();
        let mut g_score = vec![u32::MAX; n];
        let mut came_from: Vec<Option<usize>> = vec![None; n];

        g_score[start_poly] = 0;
        open.push(OpenNode {
            f: heuristic(start_poly),
            g: 0,
            poly: start_poly,
            tie: 0,
        });
        let mut tie: u64 = 1;
        let mut expanded = 0;
        let mut closest = (heuristic(start_poly), start_poly);

        while let Some(node) = open.pop() {
            if node.poly == end_poly {
                return Some((reconstruct(&came_from, end_poly), PathStatus::Complete));
            }
            if node.g != g_score[node.poly] {
                continue;
            }
            if expanded >= self.settings.max_search_nodes {
                tracing::debug!(
                    max_search_nodes = self.settings.max_search_nodes,
                    "Path search ran out of nodes, returning partial path"
                );
                return Some((reconstruct(&came_from, closest.1), PathStatus::Partial));
            }
            expanded += 1;
            let h = node.f.saturating_sub(node.g);
            if h < closest.0 {
                closest = (h, node.poly);
            }

            for neighbor in self.neighbors(node.poly, area_mask) {
                let tentative_g = node.g.saturating_add(edge_cost(node.poly, neighbor));
                if tentative_g >= g_score[neighbor] {
                    continue;
                }
                came_from[neighbor] = Some(node.poly);
                g_score[neighbor] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(heuristic(neighbor)),
                    g: tentative_g,
                    poly: neighbor,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }

    /// The edge shared by two adjacent triangles, ordered as `(left, right)` when walking from `from` to `to`.
    fn portal(&self, from: usize, to: usize) -> Option<(Vec3A, Vec3A)> {
        let polygon = &self.polygons[from];
        let edge = polygon
            .neighbors
            .iter()
            .position(|neighbor| *neighbor == Some(to))?;
        let (p0, p1) = polygon.edges()[edge];
        let c0 = polygon.centroid;
        let dir = self.polygons[to].centroid - c0;
        let s0 = cross_xz(dir, p0 - c0);
        let s1 = cross_xz(dir, p1 - c0);
        Some(if s0 >= s1 { (p0, p1) } else { (p1, p0) })
    }
}

impl NavmeshQueryBackend for TriMeshNavmesh {
    fn compute_path(&self, start: Vec3A, end: Vec3A, area_mask: AreaMask) -> BackendPath {
        let (Some((start_poly, start)), Some((end_poly, end))) =
            (self.locate(start, area_mask), self.locate(end, area_mask))
        else {
            return BackendPath::invalid();
        };
        let Some((polygon_path, status)) =
            self.find_polygon_path(start_poly, end_poly, end, area_mask)
        else {
            return BackendPath::invalid();
        };

        let end = match status {
            PathStatus::Complete => end,
            _ => {
                let last = polygon_path[polygon_path.len() - 1];
                self.polygons[last].vertices.closest_point(end)
            }
        };

        let mut portals = Vec::with_capacity(polygon_path.len() + 1);
        portals.push((start, start));
        for pair in polygon_path.windows(2) {
            let Some(portal) = self.portal(pair[0], pair[1]) else {
                tracing::error!("Triangles {} and {} are not adjacent", pair[0], pair[1]);
                return BackendPath::invalid();
            };
            portals.push(portal);
        }
        portals.push((end, end));

        BackendPath {
            status,
            corners: NavmeshPath::new(string_pull(&portals)),
        }
    }

    fn sample_nearest_position(
        &self,
        point: Vec3A,
        max_distance: f32,
        area_mask: AreaMask,
    ) -> Option<SurfaceHit> {
        self.allowed_polygons(area_mask)
            .map(|(_, polygon)| SurfaceHit::new(point, polygon.vertices.closest_point(point)))
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn find_closest_edge(&self, point: Vec3A, area_mask: AreaMask) -> Option<SurfaceHit> {
        self.allowed_polygons(area_mask)
            .flat_map(move |(_, polygon)| {
                polygon
                    .edges()
                    .into_iter()
                    .zip(polygon.neighbors)
                    .filter(move |(_, neighbor)| {
                        neighbor.is_none_or(|neighbor| {
                            !area_mask.allows(self.polygons[neighbor].area)
                        })
                    })
                    .map(move |((a, b), _)| {
                        SurfaceHit::new(point, closest_point_on_segment(point, a, b))
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

fn link_neighbors(polygons: &mut [Polygon]) {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    struct VertexKey([u32; 3]);

    impl VertexKey {
        fn from_vec3a(v: Vec3A) -> Self {
            // Adding zero turns -0.0 into 0.0 so both hash the same.
            let v = v + Vec3A::ZERO;
            Self([v.x.to_bits(), v.y.to_bits(), v.z.to_bits()])
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    struct EdgeKey(VertexKey, VertexKey);

    impl EdgeKey {
        fn new(a: Vec3A, b: Vec3A) -> Self {
            let ka = VertexKey::from_vec3a(a);
            let kb = VertexKey::from_vec3a(b);
            if ka <= kb { Self(ka, kb) } else { Self(kb, ka) }
        }
    }

    let mut open_edges: HashMap<EdgeKey, (usize, usize)> = HashMap::new();
    for poly in 0..polygons.len() {
        for (edge, (a, b)) in polygons[poly].edges().into_iter().enumerate() {
            let key = EdgeKey::new(a, b);
            if let Some((other_poly, other_edge)) = open_edges.remove(&key) {
                polygons[poly].neighbors[edge] = Some(other_poly);
                polygons[other_poly].neighbors[other_edge] = Some(poly);
            } else {
                open_edges.insert(key, (poly, edge));
            }
        }
    }
}

fn reconstruct(came_from: &[Option<usize>], last: usize) -> Vec<usize> {
    let mut path = vec![last];
    let mut current = last;
    while let Some(previous) = came_from[current] {
        current = previous;
        path.push(current);
    }
    path.reverse();
    path
}

/// Funnel algorithm, see <https://digestingduck.blogspot.com/2010/03/simple-stupid-funnel-algorithm.html>.
///
/// `portals` must start with the degenerate portal `(start, start)` and end with `(end, end)`.
fn string_pull(portals: &[(Vec3A, Vec3A)]) -> Vec<Vec3A> {
    let Some(&(start, _)) = portals.first() else {
        return Vec::new();
    };
    let mut corners = vec![start];

    let mut apex = start;
    let mut left = start;
    let mut right = start;
    let mut left_index = 0;
    let mut right_index = 0;

    let mut i = 1;
    while i < portals.len() {
        let (portal_left, portal_right) = portals[i];

        // Update right vertex.
        if triarea2(apex, right, portal_right) <= 0.0 {
            if apex == right || triarea2(apex, left, portal_right) > 0.0 {
                right = portal_right;
                right_index = i;
            } else {
                // Right crossed over left, the left vertex becomes a corner.
                if corners.last() != Some(&left) {
                    corners.push(left);
                }
                apex = left;
                right = apex;
                right_index = left_index;
                i = left_index + 1;
                continue;
            }
        }

        // Update left vertex.
        if triarea2(apex, left, portal_left) >= 0.0 {
            if apex == left || triarea2(apex, right, portal_left) < 0.0 {
                left = portal_left;
                left_index = i;
            } else {
                // Left crossed over right, the right vertex becomes a corner.
                if corners.last() != Some(&right) {
                    corners.push(right);
                }
                apex = right;
                left = apex;
                left_index = right_index;
                i = right_index + 1;
                continue;
            }
        }

        i += 1;
    }

    if let Some(&(end, _)) = portals.last() {
        if corners.last() != Some(&end) {
            corners.push(end);
        }
    }
    corners
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    g: u32,
    poly: usize,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, usize, u64) {
        (self.f, self.g, self.poly, self.tie)
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
