//! A plane with two unconnected islands next to it.
//! Agents walk along their computed paths. Agents on an island cannot reach the plane and stand still.
//!
//! Press space to toggle path gizmos.

use bevy::{color::palettes::tailwind, prelude::*};
use bevy_navmesh_pathfinder::{
    debug::{NavmeshPathVisual, PathGizmoConfig, PathGizmoPlugin},
    prelude::*,
};

const AGENT_SPEED: f32 = 3.0;

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((NavmeshPathfinderPlugin::default(), PathGizmoPlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                update_paths.run_if(resource_exists::<WalkableSurface>),
                move_agents,
                toggle_gizmos,
            )
                .chain(),
        )
        .run()
}

/// Agents whose goal could not be reached. They are not queried again.
#[derive(Component)]
struct Unreachable;

#[derive(Component)]
enum Goal {
    Point(Vec3),
    Follow(Entity),
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material_gray = materials.add(Color::from(tailwind::GRAY_300));
    let material_green = materials.add(Color::from(tailwind::GREEN_600));
    let material_agent = materials.add(Color::from(tailwind::RED_500));

    let ground = Mesh::from(Plane3d::default().mesh().size(20.0, 20.0));
    let island = Mesh::from(Plane3d::default().mesh().size(6.0, 6.0));
    let surfaces = [
        ("Ground", ground, Transform::default(), material_gray),
        (
            "Island",
            island.clone(),
            Transform::from_xyz(18.0, 0.0, -6.0),
            material_green.clone(),
        ),
        (
            "Island",
            island,
            Transform::from_xyz(18.0, 0.0, 6.0),
            material_green,
        ),
    ];

    let placed: Vec<_> = surfaces
        .iter()
        .map(|(_, mesh, transform, _)| (GlobalTransform::from(*transform), mesh))
        .collect();
    match WalkableSurface::from_meshes(placed.iter().map(|(transform, mesh)| (transform, *mesh))) {
        Ok(surface) => {
            info!("Built navmesh with {} triangles", surface.polygon_count());
            commands.insert_resource(surface);
        }
        Err(err) => error!("Failed to build navmesh: {err}"),
    }

    for (name, mesh, transform, material) in surfaces {
        commands.spawn((
            Name::new(name),
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(material),
            transform,
        ));
    }

    let capsule = meshes.add(Capsule3d::new(0.3, 1.0));
    let mut spawn_agent = |position: Vec3, goal: Goal| {
        commands
            .spawn((
                Name::new("Agent"),
                goal,
                Transform::from_translation(position),
                Visibility::default(),
                children![(
                    Mesh3d(capsule.clone()),
                    MeshMaterial3d(material_agent.clone()),
                    Transform::from_xyz(0.0, 0.8, 0.0),
                )],
            ))
            .id()
    };
    let leader = spawn_agent(Vec3::new(-8.0, 0.0, -8.0), Goal::Point(Vec3::new(8.0, 0.0, 8.0)));
    // Outside of the plane, so the first query has to snap it.
    spawn_agent(Vec3::new(-12.0, 0.0, 8.0), Goal::Follow(leader));
    // Unreachable from the island.
    spawn_agent(Vec3::new(18.0, 0.0, 6.0), Goal::Point(Vec3::ZERO));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.5, -1.0, 0.3), Vec3::Y),
    ));
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(5.0, 25.0, 25.0).looking_at(Vec3::new(5.0, 0.0, 0.0), Vec3::Y),
    ));
}

fn update_paths(
    mut commands: Commands,
    pathfinder: NavmeshPathfinder,
    agents: Query<(Entity, &Transform, &Goal), Without<Unreachable>>,
    transforms: Query<&Transform>,
) {
    for (entity, transform, goal) in &agents {
        let path = match goal {
            Goal::Point(target) => pathfinder.compute_path(transform.translation, *target),
            Goal::Follow(leader) => {
                let Ok(leader) = transforms.get(*leader) else {
                    continue;
                };
                pathfinder.compute_path_between_anchors(transform, leader)
            }
        };
        let mut agent = commands.entity(entity);
        if path.is_empty() {
            agent.insert(Unreachable);
        }
        agent.insert(NavmeshPathVisual(path));
    }
}

fn move_agents(time: Res<Time>, mut agents: Query<(&mut Transform, &NavmeshPathVisual)>) {
    let step = AGENT_SPEED * time.delta_secs();
    for (mut transform, path) in &mut agents {
        let position = transform.translation;
        let Some(next) = path
            .corners()
            .iter()
            .map(|corner| Vec3::from(*corner))
            .find(|corner| corner.distance(position) > step)
        else {
            if let Some(last) = path.last() {
                transform.translation = Vec3::from(last);
            }
            continue;
        };
        transform.translation += (next - position).normalize() * step;
    }
}

fn toggle_gizmos(input: Res<ButtonInput<KeyCode>>, mut config: ResMut<PathGizmoConfig>) {
    if input.just_pressed(KeyCode::Space) {
        config.enabled = !config.enabled;
    }
}
