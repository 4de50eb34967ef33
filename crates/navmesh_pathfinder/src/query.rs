//! Best-effort path queries that retry with snapped endpoints when the direct query fails.

use glam::{Affine3A, Vec3A};
use thiserror::Error;

use crate::{NavmeshPath, NavmeshQueryBackend, PathQueryConfig};

/// Something with a position in the world that a path can start or end at.
pub trait PathAnchor {
    /// The world-space position of the anchor.
    fn anchor_position(&self) -> Vec3A;
}

impl PathAnchor for Vec3A {
    #[inline]
    fn anchor_position(&self) -> Vec3A {
        *self
    }
}

impl PathAnchor for Affine3A {
    #[inline]
    fn anchor_position(&self) -> Vec3A {
        self.translation
    }
}

#[cfg(feature = "bevy_transform")]
impl PathAnchor for bevy_transform::components::GlobalTransform {
    #[inline]
    fn anchor_position(&self) -> Vec3A {
        self.translation_vec3a()
    }
}

#[cfg(feature = "bevy_transform")]
impl PathAnchor for bevy_transform::components::Transform {
    #[inline]
    fn anchor_position(&self) -> Vec3A {
        self.translation.into()
    }
}

impl<T: PathAnchor + ?Sized> PathAnchor for &T {
    #[inline]
    fn anchor_position(&self) -> Vec3A {
        (**self).anchor_position()
    }
}

/// How the endpoints of a path query are adjusted before an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapStrategy {
    /// Use both endpoints as given.
    None,
    /// Replace the source with the closest walkable point within the sample radius.
    Source,
    /// Replace both endpoints with their closest walkable points within the sample radius.
    Both,
    /// Replace the source with the closest point on a navmesh boundary edge.
    SourceToEdge,
}

/// Retry chain of [`PathQueryService::compute_path`].
pub const POINT_FALLBACKS: &[SnapStrategy] =
    &[SnapStrategy::None, SnapStrategy::Source, SnapStrategy::Both];

/// Retry chain of [`PathQueryService::compute_path_between_anchors`].
pub const ANCHOR_FALLBACKS: &[SnapStrategy] = &[SnapStrategy::None, SnapStrategy::SourceToEdge];

/// Reasons a path query produced no path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathQueryError {
    /// No walkable surface was found close enough to a point that needed snapping.
    #[error("no walkable surface within {radius} units of {point}")]
    SnapFailed {
        /// The point that could not be snapped.
        point: Vec3A,
        /// The radius that was searched.
        radius: f32,
    },
    /// The navmesh has no boundary edge to snap to.
    #[error("no navmesh edge found near {point}")]
    EdgeNotFound {
        /// The point that could not be snapped.
        point: Vec3A,
    },
    /// Every attempt of the retry chain returned an invalid path.
    #[error("no path from {from} to {to}")]
    Unreachable {
        /// The requested start of the path.
        from: Vec3A,
        /// The requested end of the path.
        to: Vec3A,
    },
}

/// Computes paths on a navmesh, tolerating endpoints that are not exactly on the walkable surface.
///
/// The service holds no state besides its backend and configuration, so it is cheap to create per query.
/// Backends are usually borrowed: `PathQueryService::new(&navmesh)`.
#[derive(Debug, Clone, Default)]
pub struct PathQueryService<B> {
    backend: B,
    config: PathQueryConfig,
}

impl<B: NavmeshQueryBackend> PathQueryService<B> {
    /// Creates a service using the default [`PathQueryConfig`].
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, PathQueryConfig::default())
    }

    /// Creates a service with a custom configuration.
    pub fn with_config(backend: B, config: PathQueryConfig) -> Self {
        Self { backend, config }
    }

    /// The backend queries are forwarded to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The configuration of this service.
    pub fn config(&self) -> &PathQueryConfig {
        &self.config
    }

    /// Computes a path from `source` to `target`. Returns an empty path if there is none.
    ///
    /// When the direct query is invalid, the query is retried with the source snapped onto the navmesh,
    /// and then once more with both endpoints snapped. If snapping fails, no further attempts are made.
    /// At most three path queries are issued.
    pub fn compute_path(&self, source: Vec3A, target: Vec3A) -> NavmeshPath {
        self.try_compute_path(source, target)
            .unwrap_or_else(empty_path_after)
    }

    /// Like [`PathQueryService::compute_path`], but reports why no path was found.
    pub fn try_compute_path(
        &self,
        source: Vec3A,
        target: Vec3A,
    ) -> Result<NavmeshPath, PathQueryError> {
        self.query_with_fallbacks(source, target, POINT_FALLBACKS)
    }

    /// Computes a path between two anchors, e.g. the transforms of two agents.
    /// Returns an empty path if there is none.
    ///
    /// When the direct query is invalid, it is retried once from the navmesh edge closest to `from`.
    /// `to` is never snapped.
    pub fn compute_path_between_anchors(
        &self,
        from: impl PathAnchor,
        to: impl PathAnchor,
    ) -> NavmeshPath {
        self.try_compute_path_between_anchors(from, to)
            .unwrap_or_else(empty_path_after)
    }

    /// Like [`PathQueryService::compute_path_between_anchors`], but reports why no path was found.
    pub fn try_compute_path_between_anchors(
        &self,
        from: impl PathAnchor,
        to: impl PathAnchor,
    ) -> Result<NavmeshPath, PathQueryError> {
        self.query_with_fallbacks(
            from.anchor_position(),
            to.anchor_position(),
            ANCHOR_FALLBACKS,
        )
    }

    /// Runs one path query per strategy until the backend returns a non-invalid path.
    pub fn query_with_fallbacks(
        &self,
        source: Vec3A,
        target: Vec3A,
        strategies: &[SnapStrategy],
    ) -> Result<NavmeshPath, PathQueryError> {
        for &strategy in strategies {
            let (start, end) = self.snap(strategy, source, target)?;
            let result = self
                .backend
                .compute_path(start, end, self.config.area_mask);
            if result.is_valid() {
                return Ok(result.corners);
            }
            tracing::debug!(?strategy, %start, %end, "Path query returned an invalid path");
        }
        Err(PathQueryError::Unreachable {
            from: source,
            to: target,
        })
    }

    fn snap(
        &self,
        strategy: SnapStrategy,
        source: Vec3A,
        target: Vec3A,
    ) -> Result<(Vec3A, Vec3A), PathQueryError> {
        Ok(match strategy {
            SnapStrategy::None => (source, target),
            SnapStrategy::Source => (self.sample(source)?, target),
            SnapStrategy::Both => (self.sample(source)?, self.sample(target)?),
            SnapStrategy::SourceToEdge => {
                let hit = self
                    .backend
                    .find_closest_edge(source, self.config.area_mask)
                    .ok_or(PathQueryError::EdgeNotFound { point: source })?;
                (hit.position, target)
            }
        })
    }

    fn sample(&self, point: Vec3A) -> Result<Vec3A, PathQueryError> {
        let radius = self.config.sample_radius;
        self.backend
            .sample_nearest_position(point, radius, self.config.area_mask)
            .map(|hit| hit.position)
            .ok_or(PathQueryError::SnapFailed { point, radius })
    }
}

fn empty_path_after(err: PathQueryError) -> NavmeshPath {
    tracing::warn!("Could not calculate navmesh path: {err}");
    NavmeshPath::empty()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::Quat;

    use super::*;
    use crate::{AreaMask, BackendPath, PathStatus, SurfaceHit};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Path(Vec3A, Vec3A),
        Sample(Vec3A, f32),
        Edge(Vec3A),
    }

    /// Backend that answers path queries from a script and records every call.
    #[derive(Default)]
    struct ScriptedBackend {
        statuses: RefCell<Vec<PathStatus>>,
        snap_to: Option<Vec3A>,
        /// Points that have no walkable surface in range.
        off_surface: Vec<Vec3A>,
        edge: Option<Vec3A>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedBackend {
        fn with_statuses(statuses: &[PathStatus]) -> Self {
            Self {
                statuses: RefCell::new(statuses.iter().rev().copied().collect()),
                snap_to: Some(Vec3A::new(0.0, 0.0, 0.0)),
                edge: Some(Vec3A::new(1.0, 0.0, 0.0)),
                ..Default::default()
            }
        }

        fn path_calls(&self) -> Vec<(Vec3A, Vec3A)> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    Call::Path(a, b) => Some((*a, *b)),
                    _ => None,
                })
                .collect()
        }
    }

    impl NavmeshQueryBackend for ScriptedBackend {
        fn compute_path(&self, start: Vec3A, end: Vec3A, _area_mask: AreaMask) -> BackendPath {
            self.calls.borrow_mut().push(Call::Path(start, end));
            let status = self
                .statuses
                .borrow_mut()
                .pop()
                .unwrap_or(PathStatus::Invalid);
            match status {
                PathStatus::Invalid => BackendPath::invalid(),
                status => BackendPath {
                    status,
                    corners: NavmeshPath::new([start, end]),
                },
            }
        }

        fn sample_nearest_position(
            &self,
            point: Vec3A,
            max_distance: f32,
            _area_mask: AreaMask,
        ) -> Option<SurfaceHit> {
            self.calls
                .borrow_mut()
                .push(Call::Sample(point, max_distance));
            if self.off_surface.contains(&point) {
                return None;
            }
            let position = self.snap_to?;
            Some(SurfaceHit::new(point, position + point * Vec3A::new(1.0, 0.0, 1.0)))
        }

        fn find_closest_edge(&self, point: Vec3A, _area_mask: AreaMask) -> Option<SurfaceHit> {
            self.calls.borrow_mut().push(Call::Edge(point));
            self.edge.map(|edge| SurfaceHit::new(point, edge))
        }
    }

    fn source() -> Vec3A {
        Vec3A::new(2.0, 10.0, 3.0)
    }

    fn target() -> Vec3A {
        Vec3A::new(8.0, 10.0, 9.0)
    }

    fn flattened(point: Vec3A) -> Vec3A {
        Vec3A::new(point.x, 0.0, point.z)
    }

    #[test]
    fn direct_query_is_returned_without_snapping() {
        let backend = ScriptedBackend::with_statuses(&[PathStatus::Complete]);
        let service = PathQueryService::new(&backend);

        let path = service.compute_path(source(), target());

        assert_eq!(path.corners(), &[source(), target()]);
        assert_eq!(*backend.calls.borrow(), vec![Call::Path(source(), target())]);
    }

    #[test]
    fn partial_path_is_accepted() {
        let backend = ScriptedBackend::with_statuses(&[PathStatus::Partial]);
        let service = PathQueryService::new(&backend);

        let path = service.compute_path(source(), target());

        assert_eq!(path.len(), 2);
        assert_eq!(backend.path_calls().len(), 1);
    }

    #[test]
    fn second_attempt_snaps_only_the_source() {
        let backend =
            ScriptedBackend::with_statuses(&[PathStatus::Invalid, PathStatus::Complete]);
        let service = PathQueryService::new(&backend);

        let path = service.compute_path(source(), target());

        assert_eq!(path.corners(), &[flattened(source()), target()]);
        assert_eq!(
            *backend.calls.borrow(),
            vec![
                Call::Path(source(), target()),
                Call::Sample(source(), 100.0),
                Call::Path(flattened(source()), target()),
            ]
        );
    }

    #[test]
    fn third_attempt_snaps_both_endpoints() {
        let backend = ScriptedBackend::with_statuses(&[
            PathStatus::Invalid,
            PathStatus::Invalid,
            PathStatus::Complete,
        ]);
        let service = PathQueryService::new(&backend);

        let path = service.compute_path(source(), target());

        assert_eq!(path.corners(), &[flattened(source()), flattened(target())]);
        assert_eq!(
            backend.path_calls(),
            vec![
                (source(), target()),
                (flattened(source()), target()),
                (flattened(source()), flattened(target())),
            ]
        );
    }

    #[test]
    fn gives_up_after_three_invalid_attempts() {
        let backend = ScriptedBackend::with_statuses(&[PathStatus::Invalid; 5]);
        let service = PathQueryService::new(&backend);

        let result = service.try_compute_path(source(), target());

        assert_eq!(
            result,
            Err(PathQueryError::Unreachable {
                from: source(),
                to: target()
            })
        );
        assert_eq!(backend.path_calls().len(), 3);
        assert!(service.compute_path(source(), target()).is_empty());
    }

    #[test]
    fn failed_snap_short_circuits() {
        let backend = ScriptedBackend {
            snap_to: None,
            ..ScriptedBackend::with_statuses(&[PathStatus::Invalid, PathStatus::Complete])
        };
        let service = PathQueryService::new(&backend);

        let result = service.try_compute_path(source(), target());

        assert_eq!(
            result,
            Err(PathQueryError::SnapFailed {
                point: source(),
                radius: 100.0
            })
        );
        assert_eq!(backend.path_calls().len(), 1);
    }

    #[test]
    fn target_snap_failure_on_last_attempt_is_empty() {
        let backend = ScriptedBackend {
            off_surface: vec![target()],
            ..ScriptedBackend::with_statuses(&[
                PathStatus::Invalid,
                PathStatus::Invalid,
                PathStatus::Complete,
            ])
        };
        let service = PathQueryService::new(&backend);

        let result = service.try_compute_path(source(), target());

        assert_eq!(
            result,
            Err(PathQueryError::SnapFailed {
                point: target(),
                radius: 100.0
            })
        );
        assert_eq!(
            backend.path_calls(),
            vec![(source(), target()), (flattened(source()), target())]
        );
    }

    #[test]
    fn sample_radius_is_configurable() {
        let backend =
            ScriptedBackend::with_statuses(&[PathStatus::Invalid, PathStatus::Complete]);
        let config = PathQueryConfig::default().with_sample_radius(3.5);
        let service = PathQueryService::with_config(&backend, config);

        service.compute_path(source(), target());

        assert!(backend.calls.borrow().contains(&Call::Sample(source(), 3.5)));
    }

    #[test]
    fn anchor_query_retries_from_closest_edge() {
        let backend =
            ScriptedBackend::with_statuses(&[PathStatus::Invalid, PathStatus::Complete]);
        let service = PathQueryService::new(&backend);
        let from = Affine3A::from_rotation_translation(Quat::from_rotation_y(1.0), source().into());
        let to = Affine3A::from_translation(target().into());

        let path = service.compute_path_between_anchors(from, to);

        let edge = Vec3A::new(1.0, 0.0, 0.0);
        assert_eq!(path.corners(), &[edge, target()]);
        assert_eq!(
            *backend.calls.borrow(),
            vec![
                Call::Path(source(), target()),
                Call::Edge(source()),
                Call::Path(edge, target()),
            ]
        );
    }

    #[test]
    fn anchor_query_has_no_third_attempt() {
        let backend = ScriptedBackend::with_statuses(&[PathStatus::Invalid; 3]);
        let service = PathQueryService::new(&backend);

        let path = service.compute_path_between_anchors(source(), target());

        assert!(path.is_empty());
        assert_eq!(backend.path_calls().len(), 2);
        assert!(
            !backend
                .calls
                .borrow()
                .iter()
                .any(|call| matches!(call, Call::Sample(..)))
        );
    }

    #[test]
    fn anchor_query_without_edges_is_empty() {
        let backend = ScriptedBackend {
            edge: None,
            ..ScriptedBackend::with_statuses(&[PathStatus::Invalid, PathStatus::Complete])
        };
        let service = PathQueryService::new(&backend);

        let result = service.try_compute_path_between_anchors(source(), target());

        assert_eq!(result, Err(PathQueryError::EdgeNotFound { point: source() }));
        assert_eq!(backend.path_calls().len(), 1);
    }
}
