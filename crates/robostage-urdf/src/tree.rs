//! Kinematic tree validation and traversal order.
//!
//! [`KinematicTree::build`] checks that a [`RobotModel`]'s joints form a
//! single tree rooted at the model's root link and returns a breadth-first
//! joint order. It only reads the model, so callers run it before touching
//! a scene and get all-or-nothing construction for free.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::StructuralError;
use crate::types::RobotModel;

/// A validated kinematic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KinematicTree {
    root: String,
    /// Joint names in breadth-first order from the root.
    order: Vec<String>,
    /// Child link name → parent link name.
    parents: HashMap<String, String>,
}

impl KinematicTree {
    /// Validate the model's link graph.
    ///
    /// Fails when a link has several incoming joints, a joint connects a
    /// link to itself, there is not exactly one parentless link, or some
    /// links are unreachable from the root.
    pub fn build(model: &RobotModel) -> Result<Self, StructuralError> {
        let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
        for joint in model.joints() {
            if joint.parent == joint.child {
                return Err(StructuralError::SelfLoop(joint.name.clone()));
            }
            incoming
                .entry(joint.child.as_str())
                .or_default()
                .push(joint.name.as_str());
        }

        // Report in declaration order so the error is deterministic.
        for link in model.links() {
            let Some(joints) = incoming.get(link.name.as_str()) else {
                continue;
            };
            if joints.len() > 1 {
                return Err(StructuralError::MultipleParents {
                    link: link.name.clone(),
                    joints: joints.iter().map(|j| (*j).to_string()).collect(),
                });
            }
        }

        let roots: Vec<&str> = model
            .links()
            .iter()
            .map(|l| l.name.as_str())
            .filter(|name| !incoming.contains_key(name))
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(StructuralError::NoRoot),
            [root] => *root,
            many => {
                return Err(StructuralError::MultipleRoots(
                    many.iter().map(|r| (*r).to_string()).collect(),
                ));
            }
        };

        let mut order = Vec::with_capacity(model.joints().len());
        let mut parents = HashMap::with_capacity(model.joints().len());
        let mut visited: HashSet<&str> = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);

        while let Some(link) = queue.pop_front() {
            for joint in model.child_joints(link) {
                if !visited.insert(joint.child.as_str()) {
                    continue;
                }
                order.push(joint.name.clone());
                parents.insert(joint.child.clone(), joint.parent.clone());
                queue.push_back(joint.child.as_str());
            }
        }

        if visited.len() != model.links().len() {
            let links = model
                .links()
                .iter()
                .filter(|l| !visited.contains(l.name.as_str()))
                .map(|l| l.name.clone())
                .collect();
            return Err(StructuralError::Disconnected {
                root: root.to_string(),
                links,
            });
        }

        Ok(Self {
            root: root.to_string(),
            order,
            parents,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Joint names in breadth-first order; every joint's parent link is
    /// reached before the joint itself.
    pub fn joint_order(&self) -> &[String] {
        &self.order
    }

    /// Parent link of `link`, or `None` for the root and unknown links.
    pub fn parent_of(&self, link: &str) -> Option<&str> {
        self.parents.get(link).map(String::as_str)
    }

    /// Number of links in the tree.
    pub fn link_count(&self) -> usize {
        self.parents.len() + 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
