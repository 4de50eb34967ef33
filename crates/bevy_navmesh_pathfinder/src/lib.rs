#![doc = include_str!("../../../readme.md")]

use bevy_app::prelude::*;
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use navmesh_pathfinder::{PathQueryConfig, TriMeshNavmesh};

#[cfg(feature = "debug_plugin")]
pub mod debug;
#[cfg(feature = "bevy_mesh")]
mod mesh;
pub mod pathfinder;

#[cfg(feature = "bevy_mesh")]
pub use mesh::TriMeshFromBevyMesh;
pub use navmesh_pathfinder;
pub use pathfinder::NavmeshPathfinder;

/// Everything you need to get started with navmesh path queries.
pub mod prelude {
    #[cfg(feature = "bevy_mesh")]
    pub use crate::TriMeshFromBevyMesh as _;
    #[cfg(feature = "debug_plugin")]
    pub use crate::debug::{NavmeshPathVisual, PathGizmoConfig, PathGizmoPlugin};
    pub use crate::{NavmeshPathfinder, NavmeshPathfinderPlugin, PathfinderConfig, WalkableSurface};
    pub use navmesh_pathfinder::{NavmeshPath, PathAnchor as _};
}

/// The main plugin of the crate. Adds the resources [`NavmeshPathfinder`] reads.
///
/// Insert a [`WalkableSurface`] once the navmesh of your level is available.
#[non_exhaustive]
#[derive(Default)]
pub struct NavmeshPathfinderPlugin;

impl Plugin for NavmeshPathfinderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PathfinderConfig>();
        app.register_type::<PathfinderConfig>();
    }
}

/// Resource containing the navmesh path queries run on.
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct WalkableSurface(pub TriMeshNavmesh);

impl From<TriMeshNavmesh> for WalkableSurface {
    fn from(navmesh: TriMeshNavmesh) -> Self {
        Self(navmesh)
    }
}

/// Resource holding the [`PathQueryConfig`] used by [`NavmeshPathfinder`].
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref, DerefMut, Reflect)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderConfig(pub PathQueryConfig);
