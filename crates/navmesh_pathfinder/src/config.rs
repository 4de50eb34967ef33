use crate::AreaMask;
#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// Default value of [`PathQueryConfig::sample_radius`]. `[Units: wu]`
pub const DEFAULT_SAMPLE_RADIUS: f32 = 100.0;

/// Default value of [`PathQueryConfig::projection_offset`]. `[Units: wu]`
pub const DEFAULT_PROJECTION_OFFSET: f32 = 0.2;

/// Specifies how [`PathQueryService`](crate::PathQueryService) and [`PointProjector`](crate::PointProjector)
/// query the navmesh.
///
/// The defaults are what games usually want. Changing them is mostly useful for tests
/// and for worlds whose units are not meters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct PathQueryConfig {
    /// How far away from an off-surface point the walkable surface is searched. `[Limit: > 0] [Units: wu]`
    ///
    /// Used by both snapping fallbacks of [`PathQueryService::compute_path`](crate::PathQueryService::compute_path)
    /// and by the projector. Points further away than this from any walkable triangle cannot be snapped,
    /// so queries starting there return an empty path.
    pub sample_radius: f32,

    /// How far [`PointProjector::closest_walkable_point`](crate::PointProjector::closest_walkable_point)
    /// pushes the projected point away from the original target. `[Limit: >= 0] [Units: wu]`
    ///
    /// A small positive value keeps agents off the exact boundary of the walkable surface,
    /// where rounding errors would otherwise place them outside of it.
    pub projection_offset: f32,

    /// The area types queries may traverse.
    #[cfg_attr(feature = "bevy_reflect", reflect(ignore))]
    pub area_mask: AreaMask,
}

impl Default for PathQueryConfig {
    fn default() -> Self {
        Self {
            sample_radius: DEFAULT_SAMPLE_RADIUS,
            projection_offset: DEFAULT_PROJECTION_OFFSET,
            area_mask: AreaMask::ALL,
        }
    }
}

impl PathQueryConfig {
    /// Sets [`PathQueryConfig::sample_radius`].
    #[must_use]
    pub fn with_sample_radius(mut self, sample_radius: f32) -> Self {
        self.sample_radius = sample_radius;
        self
    }

    /// Sets [`PathQueryConfig::projection_offset`].
    #[must_use]
    pub fn with_projection_offset(mut self, projection_offset: f32) -> Self {
        self.projection_offset = projection_offset;
        self
    }

    /// Sets [`PathQueryConfig::area_mask`].
    #[must_use]
    pub fn with_area_mask(mut self, area_mask: AreaMask) -> Self {
        self.area_mask = area_mask;
        self
    }
}
