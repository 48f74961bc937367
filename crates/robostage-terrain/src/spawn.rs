//! Adding generated terrain to a scene.

use std::sync::Arc;

use bevy::log::info;
use bevy::prelude::*;
use robostage_assets::MeshData;

use crate::confined::{ConfinedTerrain, Obstacle};
use crate::heightfield::HeightField;
use crate::params::Bounds;

/// A terrain object in the scene.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TerrainNode {
    pub name: String,
    pub bounds: Bounds,
}

/// Triangle mesh of a terrain node, shared with whoever renders or
/// collides with it.
#[derive(Component, Debug, Clone)]
pub struct TerrainMesh(pub Arc<MeshData>);

/// Obstacles recorded on a confined terrain node.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct TerrainObstacles(pub Vec<Obstacle>);

/// Spawn a height field as one terrain entity.
pub fn spawn_heightfield(world: &mut World, name: &str, field: &HeightField) -> Entity {
    spawn_mesh(world, name, field.bounds(), field.to_mesh())
}

/// Spawn a confined terrain as one entity carrying the merged mesh and
/// its obstacle list.
pub fn spawn_confined(world: &mut World, name: &str, terrain: &ConfinedTerrain) -> Entity {
    let entity = spawn_mesh(world, name, terrain.ground.bounds(), terrain.to_mesh());
    let mut obstacles = terrain.obstacles.clone();
    obstacles.extend_from_slice(&terrain.modifications);
    world.entity_mut(entity).insert(TerrainObstacles(obstacles));
    entity
}

fn spawn_mesh(world: &mut World, name: &str, bounds: Bounds, mesh: MeshData) -> Entity {
    info!(
        "spawning terrain {name}: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    world
        .spawn((
            TerrainNode {
                name: name.to_string(),
                bounds,
            },
            TerrainMesh(Arc::new(mesh)),
        ))
        .id()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
