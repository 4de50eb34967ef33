//! The seam between the path query logic and whatever answers spatial queries on the navmesh.

use glam::Vec3A;

use crate::{AreaMask, NavmeshPath};

/// Outcome of a single path query against a [`NavmeshQueryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    /// The path connects the start and the end.
    Complete,
    /// The path leads towards the end but does not reach it.
    Partial,
    /// No path could be found.
    Invalid,
}

/// The raw result of [`NavmeshQueryBackend::compute_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct BackendPath {
    /// How well the path connects the requested points.
    pub status: PathStatus,
    /// The corners of the path. Empty when [`PathStatus::Invalid`].
    pub corners: NavmeshPath,
}

impl BackendPath {
    /// The result of a query that found no path.
    pub fn invalid() -> Self {
        Self {
            status: PathStatus::Invalid,
            corners: NavmeshPath::empty(),
        }
    }

    /// Whether the query produced a usable path.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.status != PathStatus::Invalid
    }
}

/// A point found on the walkable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceHit {
    /// The position on the walkable surface.
    pub position: Vec3A,
    /// Distance from the queried point to [`SurfaceHit::position`].
    pub distance: f32,
}

impl SurfaceHit {
    /// Creates a hit at `position` for a query issued at `query`.
    pub fn new(query: Vec3A, position: Vec3A) -> Self {
        Self {
            position,
            distance: query.distance(position),
        }
    }
}

/// Answers spatial queries on a baked navmesh.
///
/// Implementations are expected to be synchronous and bounded.
/// [`TriMeshNavmesh`](crate::TriMeshNavmesh) is the implementation shipped with this crate.
pub trait NavmeshQueryBackend {
    /// Finds a path from `start` to `end` through areas allowed by `area_mask`.
    fn compute_path(&self, start: Vec3A, end: Vec3A, area_mask: AreaMask) -> BackendPath;

    /// Finds the closest point on the walkable surface that is at most `max_distance` away from `point`.
    fn sample_nearest_position(
        &self,
        point: Vec3A,
        max_distance: f32,
        area_mask: AreaMask,
    ) -> Option<SurfaceHit>;

    /// Finds the closest point on a boundary edge of the walkable surface.
    fn find_closest_edge(&self, point: Vec3A, area_mask: AreaMask) -> Option<SurfaceHit>;
}

impl<T: NavmeshQueryBackend + ?Sized> NavmeshQueryBackend for &T {
    #[inline]
    fn compute_path(&self, start: Vec3A, end: Vec3A, area_mask: AreaMask) -> BackendPath {
        (**self).compute_path(start, end, area_mask)
    }

    #[inline]
    fn sample_nearest_position(
        &self,
        point: Vec3A,
        max_distance: f32,
        area_mask: AreaMask,
    ) -> Option<SurfaceHit> {
        (**self).sample_nearest_position(point, max_distance, area_mask)
    }

    #[inline]
    fn find_closest_edge(&self, point: Vec3A, area_mask: AreaMask) -> Option<SurfaceHit> {
        (**self).find_closest_edge(point, area_mask)
    }
}
