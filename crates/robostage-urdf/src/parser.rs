//! URDF XML parsing using `urdf-rs`.
//!
//! Converts `urdf_rs` types into the crate's normalized [`RobotModel`].
//! Parsing either yields a complete model or an error; a partially
//! converted model is never returned.

// All conversions from urdf-rs f64 to f32 are intentional truncations.
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::path::Path;

use crate::error::UrdfError;
use crate::types::{
    Collision, Geometry, Inertial, JointData, JointDynamics, JointLimits, JointType, LinkData,
    Material, Origin, RobotModel, Visual,
};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a URDF file from disk into a [`RobotModel`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<RobotModel, UrdfError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| UrdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_string(&content)
}

/// Parse a URDF XML string into a [`RobotModel`].
pub fn parse_string(xml: &str) -> Result<RobotModel, UrdfError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| UrdfError::Parse(e.to_string()))?;
    convert_robot(&robot)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn convert_robot(robot: &urdf_rs::Robot) -> Result<RobotModel, UrdfError> {
    // Top-level <material> definitions, referenced by name from visuals.
    let named_materials: HashMap<&str, Material> = robot
        .materials
        .iter()
        .map(|m| (m.name.as_str(), convert_material(m)))
        .collect();

    let links: Vec<LinkData> = robot
        .links
        .iter()
        .map(|l| convert_link(l, &named_materials))
        .collect();

    let joints: Vec<JointData> = robot
        .joints
        .iter()
        .map(convert_joint)
        .collect::<Result<_, _>>()?;

    RobotModel::new(robot.name.clone(), links, joints)
}

fn convert_link(link: &urdf_rs::Link, named: &HashMap<&str, Material>) -> LinkData {
    let inertial = convert_inertial(&link.inertial);
    LinkData {
        name: link.name.clone(),
        inertial: (inertial.mass > 0.0).then_some(inertial),
        visuals: link.visual.iter().map(|v| convert_visual(v, named)).collect(),
        collisions: link.collision.iter().map(convert_collision).collect(),
    }
}

fn convert_joint(joint: &urdf_rs::Joint) -> Result<JointData, UrdfError> {
    let joint_type = convert_joint_type(&joint.joint_type)?;

    let dynamics = joint
        .dynamics
        .as_ref()
        .map(convert_dynamics)
        .unwrap_or_default();

    let raw_axis = vec3_to_f32(&joint.axis.xyz);
    let axis = if joint_type.is_actuated() {
        normalize_axis(raw_axis).ok_or_else(|| UrdfError::InvalidAxis(joint.name.clone()))?
    } else {
        normalize_axis(raw_axis).unwrap_or([1.0, 0.0, 0.0])
    };

    Ok(JointData {
        name: joint.name.clone(),
        joint_type,
        parent: joint.parent.link.clone(),
        child: joint.child.link.clone(),
        origin: convert_pose(&joint.origin),
        axis,
        limits: convert_limits(&joint.limit),
        dynamics,
    })
}

fn convert_joint_type(jt: &urdf_rs::JointType) -> Result<JointType, UrdfError> {
    match jt {
        urdf_rs::JointType::Revolute => Ok(JointType::Revolute),
        urdf_rs::JointType::Continuous => Ok(JointType::Continuous),
        urdf_rs::JointType::Prismatic => Ok(JointType::Prismatic),
        urdf_rs::JointType::Fixed => Ok(JointType::Fixed),
        urdf_rs::JointType::Floating => Ok(JointType::Floating),
        urdf_rs::JointType::Planar => Ok(JointType::Planar),
        urdf_rs::JointType::Spherical => Err(UrdfError::UnsupportedJointType("spherical".into())),
    }
}

fn normalize_axis(axis: [f32; 3]) -> Option<[f32; 3]> {
    let norm = axis.iter().map(|v| v * v).sum::<f32>().sqrt();
    if !norm.is_finite() || norm < 1e-9 {
        return None;
    }
    Some([axis[0] / norm, axis[1] / norm, axis[2] / norm])
}

fn convert_limits(limit: &urdf_rs::JointLimit) -> JointLimits {
    // urdf-rs defaults lower/upper to 0.0 for joints without limits.
    // Both zero means "no position limits".
    let has_limits = (limit.lower - limit.upper).abs() > f64::EPSILON;
    JointLimits {
        lower: has_limits.then_some(limit.lower as f32),
        upper: has_limits.then_some(limit.upper as f32),
        effort: limit.effort as f32,
        velocity: limit.velocity as f32,
    }
}

const fn convert_dynamics(dyn_: &urdf_rs::Dynamics) -> JointDynamics {
    JointDynamics {
        damping: dyn_.damping as f32,
        friction: dyn_.friction as f32,
    }
}

fn convert_pose(pose: &urdf_rs::Pose) -> Origin {
    Origin {
        xyz: vec3_to_f32(&pose.xyz),
        rpy: vec3_to_f32(&pose.rpy),
    }
}

fn convert_inertial(inertial: &urdf_rs::Inertial) -> Inertial {
    let i = &inertial.inertia;
    Inertial {
        origin: convert_pose(&inertial.origin),
        mass: inertial.mass.value as f32,
        inertia: [
            i.ixx as f32,
            i.ixy as f32,
            i.ixz as f32,
            i.iyy as f32,
            i.iyz as f32,
            i.izz as f32,
        ],
    }
}

fn convert_visual(visual: &urdf_rs::Visual, named: &HashMap<&str, Material>) -> Visual {
    let material = visual.material.as_ref().map(|m| {
        let local = convert_material(m);
        // A bare <material name="..."/> refers to a robot-level definition.
        if local.color.is_none() && local.texture.is_none() {
            named.get(m.name.as_str()).cloned().unwrap_or(local)
        } else {
            local
        }
    });
    Visual {
        name: visual.name.clone(),
        origin: convert_pose(&visual.origin),
        geometry: convert_geometry(&visual.geometry),
        material,
    }
}

fn convert_collision(collision: &urdf_rs::Collision) -> Collision {
    Collision {
        origin: convert_pose(&collision.origin),
        geometry: convert_geometry(&collision.geometry),
    }
}

fn convert_geometry(geom: &urdf_rs::Geometry) -> Geometry {
    match geom {
        urdf_rs::Geometry::Sphere { radius } => Geometry::Sphere {
            radius: *radius as f32,
        },
        urdf_rs::Geometry::Box { size } => Geometry::Box {
            size: vec3_to_f32(size),
        },
        urdf_rs::Geometry::Cylinder { radius, length }
        | urdf_rs::Geometry::Capsule { radius, length } => Geometry::Cylinder {
            radius: *radius as f32,
            length: *length as f32,
        },
        urdf_rs::Geometry::Mesh { filename, scale } => Geometry::Mesh {
            filename: filename.clone(),
            scale: scale.as_ref().map_or([1.0, 1.0, 1.0], |s| vec3_to_f32(s)),
        },
    }
}

fn convert_material(mat: &urdf_rs::Material) -> Material {
    Material {
        name: mat.name.clone(),
        color: mat.color.as_ref().map(|c| {
            [
                c.rgba[0] as f32,
                c.rgba[1] as f32,
                c.rgba[2] as f32,
                c.rgba[3] as f32,
            ]
        }),
        texture: mat.texture.as_ref().map(|t| t.filename.clone()),
    }
}

const fn vec3_to_f32(v: &[f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
