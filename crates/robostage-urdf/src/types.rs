//! Core data types for the in-memory robot description.
//!
//! These types are the normalized model every other stage consumes. They
//! map closely to URDF concepts but use Rust-native types and keep links and
//! joints in document order so that every traversal is deterministic.

use std::collections::HashMap;

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// URDF joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis, with position limits.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
    /// Unconstrained 6-DOF joint. Animated as fixed.
    Floating,
    /// Planar motion. Animated as fixed.
    Planar,
}

impl JointType {
    /// Whether a scalar joint value moves the child link.
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }

    /// Whether the joint value is an angle (as opposed to a distance).
    pub const fn is_angular(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }
}

// ---------------------------------------------------------------------------
// JointLimits
// ---------------------------------------------------------------------------

/// Limits on a joint's motion, effort, and velocity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointLimits {
    /// Lower position limit (rad or m). `None` means unbounded.
    pub lower: Option<f32>,
    /// Upper position limit (rad or m). `None` means unbounded.
    pub upper: Option<f32>,
    /// Maximum effort (Nm or N).
    pub effort: f32,
    /// Maximum velocity (rad/s or m/s).
    pub velocity: f32,
}

/// Dynamic properties of a joint (damping and friction).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JointDynamics {
    pub damping: f32,
    pub friction: f32,
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// A 3D pose specified as position + roll-pitch-yaw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Origin {
    /// Translation `[x, y, z]` in meters.
    pub xyz: [f32; 3],
    /// Rotation `[roll, pitch, yaw]` in radians.
    pub rpy: [f32; 3],
}

impl Origin {
    pub const fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            xyz: [x, y, z],
            rpy: [0.0; 3],
        }
    }
}

/// Inertial properties of a link. Parsed but unused for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inertial {
    pub origin: Origin,
    /// Mass in kilograms.
    pub mass: f32,
    /// Inertia tensor elements `[ixx, ixy, ixz, iyy, iyz, izz]`.
    pub inertia: [f32; 6],
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Geometric shape used for visual or collision elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere { radius: f32 },
    Box { size: [f32; 3] },
    Cylinder { radius: f32, length: f32 },
    /// External mesh file. `filename` is kept exactly as written in the
    /// document (`package://`, `file://` or a plain path).
    Mesh { filename: String, scale: [f32; 3] },
}

impl Geometry {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Mesh { .. } => "mesh",
        }
    }
}

/// Visual material for a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// RGBA color `[r, g, b, a]`, each in `0.0..=1.0`.
    pub color: Option<[f32; 4]>,
    /// Texture filename, if any.
    pub texture: Option<String>,
}

/// A visual element of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub name: Option<String>,
    pub origin: Origin,
    pub geometry: Geometry,
    pub material: Option<Material>,
}

/// A collision element of a link. Ignored for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub origin: Origin,
    pub geometry: Geometry,
}

// ---------------------------------------------------------------------------
// LinkData / JointData
// ---------------------------------------------------------------------------

/// In-memory representation of a URDF link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkData {
    pub name: String,
    pub inertial: Option<Inertial>,
    pub visuals: Vec<Visual>,
    pub collisions: Vec<Collision>,
}

impl LinkData {
    /// Create a link with only a name (no geometry or inertia).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inertial: None,
            visuals: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Add a visual element (builder style, mostly for tests and fixtures).
    #[must_use]
    pub fn with_visual(mut self, geometry: Geometry) -> Self {
        self.visuals.push(Visual {
            name: None,
            origin: Origin::default(),
            geometry,
            material: None,
        });
        self
    }
}

/// In-memory representation of a URDF joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointData {
    pub name: String,
    pub joint_type: JointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Joint origin relative to the parent link frame.
    pub origin: Origin,
    /// Unit motion axis in the joint frame.
    pub axis: [f32; 3],
    pub limits: JointLimits,
    pub dynamics: JointDynamics,
}

impl JointData {
    /// A joint with zero origin, Z axis and no limits.
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
            origin: Origin::default(),
            axis: [0.0, 0.0, 1.0],
            limits: JointLimits::default(),
            dynamics: JointDynamics::default(),
        }
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub const fn with_axis(mut self, axis: [f32; 3]) -> Self {
        self.axis = axis;
        self
    }
}

// ---------------------------------------------------------------------------
// RobotModel
// ---------------------------------------------------------------------------

/// Complete in-memory representation of a robot description.
///
/// Links and joints keep the order in which the document declares them.
/// Construction checks name uniqueness and that every joint refers to
/// defined links; tree shape is checked separately by
/// [`KinematicTree::build`](crate::tree::KinematicTree::build).
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    name: String,
    links: Vec<LinkData>,
    joints: Vec<JointData>,
    root_link: String,
    link_index: HashMap<String, usize>,
    joint_index: HashMap<String, usize>,
}

impl RobotModel {
    /// Assemble a model from links and joints.
    ///
    /// The root link is the first link (in declaration order) that is never
    /// a joint child. If every link is a child the graph is cyclic; the
    /// first link is nominated and the tree check reports the cycle.
    pub fn new(
        name: impl Into<String>,
        links: Vec<LinkData>,
        joints: Vec<JointData>,
    ) -> Result<Self, UrdfError> {
        let mut link_index = HashMap::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            if link_index.insert(link.name.clone(), i).is_some() {
                return Err(UrdfError::DuplicateLink(link.name.clone()));
            }
        }

        let mut joint_index = HashMap::with_capacity(joints.len());
        for (i, joint) in joints.iter().enumerate() {
            if joint_index.insert(joint.name.clone(), i).is_some() {
                return Err(UrdfError::DuplicateJoint(joint.name.clone()));
            }
            for link in [&joint.parent, &joint.child] {
                if !link_index.contains_key(link) {
                    return Err(UrdfError::UndefinedLink {
                        joint: joint.name.clone(),
                        link: link.clone(),
                    });
                }
            }
        }

        let root_link = links
            .iter()
            .find(|l| !joints.iter().any(|j| j.child == l.name))
            .or_else(|| links.first())
            .ok_or(UrdfError::NoRootLink)?
            .name
            .clone();

        Ok(Self {
            name: name.into(),
            links,
            joints,
            root_link,
            link_index,
            joint_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the root link.
    pub fn root_link(&self) -> &str {
        &self.root_link
    }

    /// All links in declaration order.
    pub fn links(&self) -> &[LinkData] {
        &self.links
    }

    /// All joints in declaration order.
    pub fn joints(&self) -> &[JointData] {
        &self.joints
    }

    /// Get a link by name.
    pub fn link(&self, name: &str) -> Result<&LinkData, UrdfError> {
        self.link_index
            .get(name)
            .map(|&i| &self.links[i])
            .ok_or_else(|| UrdfError::MissingLink(name.into()))
    }

    /// Get a joint by name.
    pub fn joint(&self, name: &str) -> Result<&JointData, UrdfError> {
        self.joint_index
            .get(name)
            .map(|&i| &self.joints[i])
            .ok_or_else(|| UrdfError::MissingJoint(name.into()))
    }

    /// Joints whose parent is `link`, in declaration order.
    pub fn child_joints<'a>(&'a self, link: &'a str) -> impl Iterator<Item = &'a JointData> {
        self.joints.iter().filter(move |j| j.parent == link)
    }

    /// The joint whose child is `link`, if any.
    pub fn parent_joint(&self, link: &str) -> Option<&JointData> {
        self.joints.iter().find(|j| j.child == link)
    }

    /// Iterate over actuated joints (revolute, continuous, prismatic).
    pub fn actuated_joints(&self) -> impl Iterator<Item = &JointData> {
        self.joints.iter().filter(|j| j.joint_type.is_actuated())
    }

    /// Number of actuated degrees of freedom.
    pub fn dof(&self) -> usize {
        self.actuated_joints().count()
    }

    /// Names of all joints, sorted alphabetically.
    pub fn joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.iter().map(|j| j.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Names of actuated joints, sorted alphabetically.
    pub fn actuated_joint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actuated_joints().map(|j| j.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
