use glam::Vec3A;

use crate::{NavmeshQueryBackend, PathQueryConfig};

/// Distance below which a target counts as lying on the surface point found for it. `[Units: wu]`
const ON_SURFACE_EPSILON: f32 = 1e-5;

/// Places arbitrary points onto the walkable surface, slightly inset from its boundary.
#[derive(Debug, Clone, Default)]
pub struct PointProjector<B> {
    backend: B,
    config: PathQueryConfig,
}

impl<B: NavmeshQueryBackend> PointProjector<B> {
    /// Creates a projector using the default [`PathQueryConfig`].
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, PathQueryConfig::default())
    }

    /// Creates a projector with a custom configuration.
    pub fn with_config(backend: B, config: PathQueryConfig) -> Self {
        Self { backend, config }
    }

    /// Returns a walkable point near `target`, pushed [`PathQueryConfig::projection_offset`]
    /// units further onto the surface.
    ///
    /// Returns `None` if there is no walkable surface within [`PathQueryConfig::sample_radius`].
    pub fn closest_walkable_point(&self, target: Vec3A) -> Option<Vec3A> {
        self.closest_walkable_point_with_offset(target, self.config.projection_offset)
    }

    /// Returns the point on the walkable surface closest to `target`, moved `offset` units
    /// in the direction pointing away from `target`.
    ///
    /// If `target` is already on the surface, up to float noise, the surface point is returned unchanged.
    pub fn closest_walkable_point_with_offset(&self, target: Vec3A, offset: f32) -> Option<Vec3A> {
        let Some(hit) = self.backend.sample_nearest_position(
            target,
            self.config.sample_radius,
            self.config.area_mask,
        ) else {
            tracing::debug!(
                %target,
                radius = self.config.sample_radius,
                "No walkable surface found for projection"
            );
            return None;
        };
        let away = target - hit.position;
        if away.length_squared() < ON_SURFACE_EPSILON * ON_SURFACE_EPSILON {
            return Some(hit.position);
        }
        Some(hit.position - away.normalize() * offset)
    }
}
