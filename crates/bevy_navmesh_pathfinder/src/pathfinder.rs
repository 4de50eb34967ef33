//! Running path queries from systems.

use bevy_ecs::{prelude::*, system::SystemParam};
use glam::{Vec3, Vec3A};
use navmesh_pathfinder::{
    NavmeshPath, PathAnchor, PathQueryError, PathQueryService, PointProjector, TriMeshNavmesh,
};

use crate::{PathfinderConfig, WalkableSurface};

/// System parameter for querying paths on the [`WalkableSurface`].
///
/// Uses the configuration in [`PathfinderConfig`].
#[derive(SystemParam)]
pub struct NavmeshPathfinder<'w> {
    #[system_param(
        validation_message = "Failed to find `WalkableSurface`. Did you forget to insert it after building your navmesh?"
    )]
    surface: Res<'w, WalkableSurface>,
    #[system_param(
        validation_message = "Failed to find `PathfinderConfig`. Did you forget to add `NavmeshPathfinderPlugin` to your app?"
    )]
    config: Res<'w, PathfinderConfig>,
}

impl NavmeshPathfinder<'_> {
    /// The navmesh queries run on.
    pub fn navmesh(&self) -> &TriMeshNavmesh {
        &self.surface
    }

    /// A [`PathQueryService`] over the current navmesh and configuration.
    pub fn service(&self) -> PathQueryService<&TriMeshNavmesh> {
        PathQueryService::with_config(&self.surface.0, self.config.0.clone())
    }

    /// See [`PathQueryService::compute_path`].
    pub fn compute_path(&self, source: impl Into<Vec3A>, target: impl Into<Vec3A>) -> NavmeshPath {
        self.service().compute_path(source.into(), target.into())
    }

    /// See [`PathQueryService::try_compute_path`].
    pub fn try_compute_path(
        &self,
        source: impl Into<Vec3A>,
        target: impl Into<Vec3A>,
    ) -> Result<NavmeshPath, PathQueryError> {
        self.service().try_compute_path(source.into(), target.into())
    }

    /// See [`PathQueryService::compute_path_between_anchors`].
    /// Works with [`Transform`](bevy_transform::components::Transform) and
    /// [`GlobalTransform`](bevy_transform::components::GlobalTransform).
    pub fn compute_path_between_anchors(
        &self,
        from: impl PathAnchor,
        to: impl PathAnchor,
    ) -> NavmeshPath {
        self.service().compute_path_between_anchors(from, to)
    }

    /// See [`PointProjector::closest_walkable_point`].
    pub fn closest_walkable_point(&self, target: impl Into<Vec3A>) -> Option<Vec3> {
        PointProjector::with_config(&self.surface.0, self.config.0.clone())
            .closest_walkable_point(target.into())
            .map(Vec3::from)
    }
}
