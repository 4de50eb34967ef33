#![doc = include_str!("../../../readme.md")]

mod area;
mod backend;
mod config;
mod debug;
pub(crate) mod math;
mod navmesh;
mod path;
mod projector;
mod query;
mod trimesh;

pub use area::{AreaMask, AreaType};
pub use backend::{BackendPath, NavmeshQueryBackend, PathStatus, SurfaceHit};
pub use config::{DEFAULT_PROJECTION_OFFSET, DEFAULT_SAMPLE_RADIUS, PathQueryConfig};
pub use debug::{
    CORNER_COLOR, CORNER_TICK_HEIGHT, DebugColor, DebugLineSink, SEGMENT_COLOR, visualize_path,
};
pub use navmesh::{TriMeshNavmesh, TriMeshNavmeshError, TriMeshNavmeshSettings};
pub use path::NavmeshPath;
pub use projector::PointProjector;
pub use query::{
    ANCHOR_FALLBACKS, POINT_FALLBACKS, PathAnchor, PathQueryError, PathQueryService, SnapStrategy,
};
pub use trimesh::TriMesh;

pub use glam;
