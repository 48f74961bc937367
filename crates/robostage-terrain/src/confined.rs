//! Confined spaces: a ground surface under a ceiling, with obstacles.

use bevy::log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use robostage_assets::{MeshData, box_mesh};

use crate::error::{ParameterError, positive};
use crate::generate::generate;
use crate::heightfield::HeightField;
use crate::params::TerrainParams;
use crate::shapes::TerrainShape;

/// Which surface an obstacle hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Ground,
    Ceiling,
}

/// An axis-aligned box obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub attach: Attachment,
}

impl Obstacle {
    /// Whether `(x, y)` lies over the obstacle's footprint.
    pub fn covers(&self, x: f32, y: f32) -> bool {
        (x - self.center[0]).abs() <= self.size[0] / 2.0
            && (y - self.center[1]).abs() <= self.size[1] / 2.0
    }
}

/// How many obstacles to place and how large they may be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpec {
    pub count: usize,
    pub min_size: [f32; 3],
    pub max_size: [f32; 3],
}

impl Default for ObstacleSpec {
    fn default() -> Self {
        Self {
            count: 5,
            min_size: [0.2, 0.2, 0.1],
            max_size: [0.6, 0.6, 0.4],
        }
    }
}

impl ObstacleSpec {
    pub fn validate(&self, params: &TerrainParams) -> Result<(), ParameterError> {
        for axis in 0..3 {
            positive("obstacle min size", self.min_size[axis])?;
            positive("obstacle max size", self.max_size[axis])?;
            if self.min_size[axis] > self.max_size[axis] {
                return Err(ParameterError::InvalidRange {
                    name: "obstacle size",
                    min: self.min_size[axis],
                    max: self.max_size[axis],
                });
            }
        }
        // Every sampled footprint must fit inside the terrain.
        for (extent, size) in [(params.width, self.min_size[0]), (params.depth, self.min_size[1])] {
            if size > extent {
                return Err(ParameterError::InvalidRange {
                    name: "obstacle placement",
                    min: size,
                    max: extent,
                });
            }
        }
        Ok(())
    }
}

/// Ground and ceiling surfaces with obstacles between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfinedTerrain {
    pub ground: HeightField,
    /// Same grid as `ground`.
    pub ceiling: HeightField,
    /// Free-standing boxes, meshed separately.
    pub obstacles: Vec<Obstacle>,
    /// Obstacles baked into the surfaces as raised ground or lowered
    /// ceiling.
    pub modifications: Vec<Obstacle>,
}

impl ConfinedTerrain {
    /// Vertical free space at the vertex nearest `(x, y)`.
    pub fn clearance_at(&self, x: f32, y: f32) -> f32 {
        self.ceiling.height_at(x, y) - self.ground.height_at(x, y)
    }

    /// Smallest vertical free space over the whole grid.
    pub fn min_clearance(&self) -> f32 {
        self.ceiling
            .heights()
            .iter()
            .zip(self.ground.heights())
            .map(|(c, g)| c - g)
            .fold(f32::INFINITY, f32::min)
    }

    /// Ground facing up, ceiling facing down, and one box per obstacle.
    pub fn to_mesh(&self) -> MeshData {
        let mut mesh = self.ground.to_mesh();
        let mut ceiling = self.ceiling.to_mesh();
        ceiling.flip_winding();
        mesh.append(&ceiling);
        for obstacle in &self.obstacles {
            match box_mesh(obstacle.size) {
                Ok(mut cube) => {
                    cube.translate(obstacle.center);
                    mesh.append(&cube);
                }
                Err(e) => warn!("skipping obstacle at {:?}: {e}", obstacle.center),
            }
        }
        mesh
    }
}

/// Ground of `ground_shape` with a ceiling `clearance` above it.
pub fn generate_confined(
    params: &TerrainParams,
    ground_shape: &TerrainShape,
    clearance: f32,
) -> Result<ConfinedTerrain, ParameterError> {
    positive("clearance", clearance)?;
    let ground = generate(params, ground_shape)?;
    let mut ceiling = ground.clone();
    ceiling.offset(clearance);
    Ok(ConfinedTerrain {
        ground,
        ceiling,
        obstacles: Vec::new(),
        modifications: Vec::new(),
    })
}

/// Confined terrain with `spec.count` boxes, each resting on the ground or
/// hanging from the ceiling. Box heights are capped to the local clearance.
pub fn generate_with_boxes(
    params: &TerrainParams,
    ground_shape: &TerrainShape,
    clearance: f32,
    spec: &ObstacleSpec,
    seed: u64,
) -> Result<ConfinedTerrain, ParameterError> {
    spec.validate(params)?;
    let mut terrain = generate_confined(params, ground_shape, clearance)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for _ in 0..spec.count {
        let mut obstacle = sample_obstacle(params, spec, &mut rng);
        let [x, y, _] = obstacle.center;
        let ground = terrain.ground.height_at(x, y);
        let ceiling = terrain.ceiling.height_at(x, y);
        let h = obstacle.size[2].min(ceiling - ground);
        obstacle.size[2] = h;
        obstacle.center[2] = match obstacle.attach {
            Attachment::Ground => ground + h / 2.0,
            Attachment::Ceiling => ceiling - h / 2.0,
        };
        terrain.obstacles.push(obstacle);
    }

    debug!("placed {} box obstacles (seed {seed})", terrain.obstacles.len());
    Ok(terrain)
}

/// Confined terrain where obstacles are carved into the surfaces: ground
/// bumps raise the floor, ceiling obstacles lower it. Each modification is
/// at most half the clearance so the surfaces never cross.
pub fn generate_with_surface_modifications(
    params: &TerrainParams,
    ground_shape: &TerrainShape,
    clearance: f32,
    spec: &ObstacleSpec,
    seed: u64,
) -> Result<ConfinedTerrain, ParameterError> {
    spec.validate(params)?;
    let mut terrain = generate_confined(params, ground_shape, clearance)?;
    let base = terrain.ground.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    for _ in 0..spec.count {
        let mut obstacle = sample_obstacle(params, spec, &mut rng);
        let [x, y, _] = obstacle.center;
        let h = obstacle.size[2].min(clearance / 2.0);
        obstacle.size[2] = h;
        let floor = base.height_at(x, y);
        match obstacle.attach {
            Attachment::Ground => {
                obstacle.center[2] = floor + h / 2.0;
                apply_footprint(&mut terrain.ground, &base, &obstacle, |current, original| {
                    current.max(original + h)
                });
            }
            Attachment::Ceiling => {
                obstacle.center[2] = floor + clearance - h / 2.0;
                apply_footprint(&mut terrain.ceiling, &base, &obstacle, |current, original| {
                    current.min(original + clearance - h)
                });
            }
        }
        terrain.modifications.push(obstacle);
    }

    debug!(
        "applied {} surface modifications (seed {seed})",
        terrain.modifications.len()
    );
    Ok(terrain)
}

fn sample_obstacle(params: &TerrainParams, spec: &ObstacleSpec, rng: &mut ChaCha8Rng) -> Obstacle {
    let bounds = params.bounds();
    let mut size = [0.0; 3];
    for (axis, s) in size.iter_mut().enumerate() {
        *s = rng.gen_range(spec.min_size[axis]..=spec.max_size[axis]);
    }
    // Keep the footprint on the terrain.
    size[0] = size[0].min(params.width);
    size[1] = size[1].min(params.depth);
    let x = rng.gen_range(bounds.min_x + size[0] / 2.0..=bounds.max_x - size[0] / 2.0);
    let y = rng.gen_range(bounds.min_y + size[1] / 2.0..=bounds.max_y - size[1] / 2.0);
    let attach = if rng.gen_bool(0.5) {
        Attachment::Ground
    } else {
        Attachment::Ceiling
    };
    Obstacle {
        center: [x, y, 0.0],
        size,
        attach,
    }
}

/// Rewrite the heights of `field` under `obstacle` with `f(current, base)`.
fn apply_footprint<F>(field: &mut HeightField, base: &HeightField, obstacle: &Obstacle, f: F)
where
    F: Fn(f32, f32) -> f32,
{
    for i in 0..field.rows() {
        for j in 0..field.cols() {
            let [x, y] = field.xy(i, j);
            if !obstacle.covers(x, y) {
                continue;
            }
            if let (Some(current), Some(original)) = (field.get(i, j), base.get(i, j)) {
                field.set(i, j, f(current, original));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
