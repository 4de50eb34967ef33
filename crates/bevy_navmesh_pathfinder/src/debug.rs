//! Gizmo drawing of computed paths.

use bevy_app::prelude::*;
use bevy_color::Color;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_gizmos::{config::GizmoConfigGroup, gizmos::Gizmos};
use bevy_reflect::prelude::*;
use glam::{Vec3, Vec3A};
use navmesh_pathfinder::{DebugColor, DebugLineSink, NavmeshPath, visualize_path};

/// Draws every [`NavmeshPathVisual`] with gizmos while [`PathGizmoConfig::enabled`] is set.
///
/// Requires the gizmo plugin, which is part of Bevy's `DefaultPlugins`.
#[non_exhaustive]
#[derive(Default)]
pub struct PathGizmoPlugin;

impl Plugin for PathGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PathGizmoConfig>();
        app.register_type::<PathGizmoConfig>();
        app.add_systems(
            PostUpdate,
            draw_path_gizmos.run_if(|config: Res<PathGizmoConfig>| config.enabled),
        );
    }
}

/// Controls [`PathGizmoPlugin`].
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGizmoConfig {
    /// Whether paths are drawn.
    pub enabled: bool,
}

impl Default for PathGizmoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A path drawn by [`PathGizmoPlugin`].
#[derive(Component, Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct NavmeshPathVisual(pub NavmeshPath);

impl From<NavmeshPath> for NavmeshPathVisual {
    fn from(path: NavmeshPath) -> Self {
        Self(path)
    }
}

/// Forwards the lines of [`visualize_path`] to [`Gizmos`].
pub struct GizmoLineSink<'a, 'w, 's, Config, Clear>(pub &'a mut Gizmos<'w, 's, Config, Clear>)
where
    Config: GizmoConfigGroup,
    Clear: 'static + Send + Sync;

impl<Config, Clear> DebugLineSink for GizmoLineSink<'_, '_, '_, Config, Clear>
where
    Config: GizmoConfigGroup,
    Clear: 'static + Send + Sync,
{
    fn draw_line(&mut self, start: Vec3A, end: Vec3A, color: DebugColor) {
        self.0
            .line(Vec3::from(start), Vec3::from(end), gizmo_color(color));
    }
}

/// Converts a [`DebugColor`] to a Bevy [`Color`].
pub fn gizmo_color(color: DebugColor) -> Color {
    Color::linear_rgba(color.red, color.green, color.blue, color.alpha)
}

fn draw_path_gizmos(paths: Query<&NavmeshPathVisual>, mut gizmos: Gizmos) {
    let mut sink = GizmoLineSink(&mut gizmos);
    for path in &paths {
        visualize_path(path, &mut sink);
    }
}
