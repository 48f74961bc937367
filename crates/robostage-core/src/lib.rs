//! Shared configuration, errors and seeds for robostage.
//!
//! Every other robostage crate takes its settings from the types defined
//! here. [`RoboStageCorePlugin`] makes the active [`StageConfig`] available
//! to a Bevy app as a resource.

pub mod config;
pub mod error;
pub mod seed;

use bevy::prelude::*;

pub use config::{
    AngleUnit, AnimationConfig, ContinuousMode, ImportConfig, StageConfig, TerrainConfig,
};
pub use error::ConfigError;

/// Registers the [`StageConfig`] resource (default values unless one was
/// inserted before the plugin was added).
pub struct RoboStageCorePlugin;

impl Plugin for RoboStageCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageConfig>();
    }
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{
        AngleUnit, AnimationConfig, ContinuousMode, ImportConfig, StageConfig, TerrainConfig,
    };
    pub use crate::error::ConfigError;
    pub use crate::seed::{derive_seed, derive_seed_indexed};
    pub use crate::RoboStageCorePlugin;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
