//! Top-level error of an import session.

use robostage_core::ConfigError;
use robostage_urdf::{StructuralError, UrdfError};

/// Fatal import failure. Nothing has been added to the scene when one of
/// these is returned.
#[derive(Debug, thiserror::Error)]
pub enum RoboStageError {
    #[error(transparent)]
    Parse(#[from] UrdfError),

    #[error("invalid kinematic structure: {0}")]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
