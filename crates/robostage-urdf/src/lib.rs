//! URDF parsing and robot model representation for robostage.
//!
//! Provides the normalized description model (links, joints, geometry),
//! the `urdf-rs` adapter that produces it, tree validation, and the
//! transforms that turn joint origins and positions into poses.

pub mod error;
pub mod parser;
pub mod transform;
pub mod tree;
pub mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::{StructuralError, UrdfError};
pub use parser::{parse_file, parse_string};
pub use transform::{child_pose, joint_motion, origin_to_isometry};
pub use tree::KinematicTree;
pub use types::{
    Collision, Geometry, Inertial, JointData, JointDynamics, JointLimits, JointType, LinkData,
    Material, Origin, RobotModel, Visual,
};
