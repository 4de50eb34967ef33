//! Configuration types survive a trip through JSON when the `serialize` feature is enabled.
#![cfg(feature = "serialize")]

use navmesh_pathfinder::{
    AreaMask, AreaType, PathQueryConfig, TriMesh, TriMeshNavmesh, TriMeshNavmeshSettings,
};

#[test]
fn query_config_from_json() {
    let config = PathQueryConfig::default()
        .with_sample_radius(12.5)
        .with_area_mask(AreaMask::from_area(AreaType::DEFAULT_WALKABLE));

    let json = serde_json::to_string(&config).unwrap();
    let parsed: PathQueryConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn baked_trimesh_can_be_loaded() {
    let trimesh = TriMesh::rectangle(0.0, 0.0, 4.0, 4.0, 1.0);
    let json = serde_json::to_string(&trimesh).unwrap();

    let loaded: TriMesh = serde_json::from_str(&json).unwrap();
    let navmesh = TriMeshNavmesh::with_settings(&loaded, TriMeshNavmeshSettings::default()).unwrap();

    assert_eq!(loaded, trimesh);
    assert_eq!(navmesh.polygon_count(), 2);
}
