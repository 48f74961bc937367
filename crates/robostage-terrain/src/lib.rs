//! Procedural terrain for robostage.
//!
//! Height fields sampled from basic shapes (flat, stairs, ramps, noise),
//! sectioned and patch-grid combinations of them, confined spaces with
//! a ceiling and obstacles, and guide surfaces through key points. Every
//! generator is deterministic for a given seed and returns a
//! [`ParameterError`] for invalid inputs.

pub mod confined;
pub mod error;
pub mod generate;
pub mod guide;
pub mod heightfield;
pub mod noise;
pub mod params;
pub mod patches;
pub mod shapes;
pub mod spawn;

pub use confined::{
    Attachment, ConfinedTerrain, Obstacle, ObstacleSpec, generate_confined, generate_with_boxes,
    generate_with_surface_modifications,
};
pub use error::ParameterError;
pub use generate::{TerrainSection, default_sections, generate, generate_combined};
pub use guide::HarmonicGuideSurface;
pub use heightfield::HeightField;
pub use noise::Perlin;
pub use params::{Bounds, MAX_CELLS, TerrainParams};
pub use patches::{PatchConfig, PatchInfo, PatchTerrain, Transition, generate_patches};
pub use shapes::{Direction, ShapeSampler, Slope, TerrainShape};
pub use spawn::{TerrainMesh, TerrainNode, TerrainObstacles, spawn_confined, spawn_heightfield};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::confined::{ConfinedTerrain, ObstacleSpec, generate_with_boxes};
    pub use crate::error::ParameterError;
    pub use crate::generate::{TerrainSection, generate, generate_combined};
    pub use crate::heightfield::HeightField;
    pub use crate::params::TerrainParams;
    pub use crate::patches::{PatchConfig, generate_patches};
    pub use crate::shapes::{Direction, Slope, TerrainShape};
    pub use crate::spawn::{spawn_confined, spawn_heightfield};
}
