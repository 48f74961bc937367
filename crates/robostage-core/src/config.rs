//! Stage settings for import, animation and terrain, loaded from TOML.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}
const fn default_orientation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}
const fn default_fps() -> f32 {
    24.0
}
fn default_time_column() -> String {
    "time".into()
}
const fn default_resolution() -> [usize; 2] {
    [50, 50]
}

// ---------------------------------------------------------------------------
// ImportConfig
// ---------------------------------------------------------------------------

/// Settings for importing a robot description into the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directories searched when resolving `package://<name>/...` mesh URIs.
    /// A URI resolves against `<root>/<name>/...` for the first root where
    /// the file exists.
    #[serde(default)]
    pub package_roots: Vec<PathBuf>,

    /// Import external mesh files. When false, mesh geometry is replaced
    /// with empty placeholders without touching the filesystem.
    #[serde(default = "default_true")]
    pub load_meshes: bool,

    /// Root node position `[x, y, z]` in the scene.
    #[serde(default)]
    pub base_position: [f32; 3],

    /// Root node orientation as a quaternion `[x, y, z, w]`.
    #[serde(default = "default_orientation")]
    pub base_orientation: [f32; 4],

    /// Joint displacements applied to the spawned pose (defaults to zero).
    #[serde(default)]
    pub initial_joint_positions: HashMap<String, f32>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            package_roots: Vec::new(),
            load_meshes: true,
            base_position: [0.0; 3],
            base_orientation: default_orientation(),
            initial_joint_positions: HashMap::new(),
        }
    }
}

impl ImportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.base_orientation;
        let norm_sq: f32 = q.iter().map(|v| v * v).sum();
        if !norm_sq.is_finite() || norm_sq < f32::EPSILON {
            return Err(ConfigError::InvalidValue {
                field: "base_orientation".into(),
                message: format!("{q:?} is not a valid rotation"),
            });
        }
        if self.base_position.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "base_position".into(),
                message: "must be finite".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AnimationConfig
// ---------------------------------------------------------------------------

/// How values of continuous (unlimited revolute) joints are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuousMode {
    /// Apply values as given. Multi-turn values are preserved, so a value
    /// of `4π` keys two full turns.
    #[default]
    Unwrapped,
    /// Normalise each value into `(-π, π]` before keying.
    Wrapped,
}

/// Unit of revolute joint values in trajectory input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// Settings for writing joint trajectories as keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Timeline frame rate used to map sample timestamps to frames.
    #[serde(default = "default_fps")]
    pub fps: f32,

    /// Frame number of `t = 0`.
    #[serde(default)]
    pub frame_offset: i64,

    #[serde(default)]
    pub continuous_mode: ContinuousMode,

    /// Unit of revolute/continuous values. Prismatic values are always meters.
    #[serde(default)]
    pub angle_unit: AngleUnit,

    /// Name of the timestamp column in wide CSV trajectories.
    #[serde(default = "default_time_column")]
    pub time_column: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            frame_offset: 0,
            continuous_mode: ContinuousMode::default(),
            angle_unit: AngleUnit::default(),
            time_column: default_time_column(),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if self.time_column.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "time_column".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Timeline frame for a timestamp in seconds.
    #[allow(clippy::cast_possible_truncation)]
    pub fn frame_for(&self, time: f32) -> i64 {
        (f64::from(time) * f64::from(self.fps)).round() as i64 + self.frame_offset
    }
}

// ---------------------------------------------------------------------------
// TerrainConfig
// ---------------------------------------------------------------------------

/// Defaults for procedural terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Grid resolution `[x, y]` used when a generator is not given a cell size.
    #[serde(default = "default_resolution")]
    pub resolution: [usize; 2],

    /// Master seed for noise, patch selection and obstacle placement.
    #[serde(default)]
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            seed: 0,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution.iter().any(|&r| r < 2) {
            return Err(ConfigError::InvalidResolution(self.resolution));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StageConfig
// ---------------------------------------------------------------------------

/// Top-level configuration, usually loaded from a TOML file.
///
/// ```toml
/// [import]
/// package_roots = ["/opt/ros/share"]
///
/// [animation]
/// fps = 30.0
/// continuous_mode = "wrapped"
///
/// [terrain]
/// seed = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Resource)]
pub struct StageConfig {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
}

impl StageConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.import.validate()?;
        self.animation.validate()?;
        self.terrain.validate()
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
