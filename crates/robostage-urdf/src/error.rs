//! Error types for description parsing and tree validation.

use std::path::PathBuf;

/// Errors that make a robot description unusable (the parse-error kind).
///
/// Returned before anything is added to a scene.
#[derive(Debug, thiserror::Error)]
pub enum UrdfError {
    /// Failed to read the description file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed XML or URDF structure.
    #[error("URDF parse error: {0}")]
    Parse(String),

    /// A requested link is not part of the model.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// A requested joint is not part of the model.
    #[error("missing joint: {0}")]
    MissingJoint(String),

    /// A joint names a parent or child link that the document never defines.
    #[error("joint {joint} references undefined link {link}")]
    UndefinedLink { joint: String, link: String },

    #[error("duplicate link name: {0}")]
    DuplicateLink(String),

    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// Invalid or unsupported joint type.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// The motion axis of an actuated joint has zero length.
    #[error("joint {0} has a zero-length axis")]
    InvalidAxis(String),

    /// The document defines no links.
    #[error("no root link found")]
    NoRootLink,
}

/// Errors raised when the link/joint graph is not a single rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// A link is the child of more than one joint.
    #[error("link {link} has multiple parent joints: {joints:?}")]
    MultipleParents { link: String, joints: Vec<String> },

    /// A joint connects a link to itself.
    #[error("joint {0} connects a link to itself")]
    SelfLoop(String),

    /// Every link has a parent, so the joints form a cycle.
    #[error("no root link: the joint graph is cyclic")]
    NoRoot,

    /// More than one link has no parent joint.
    #[error("multiple root links: {0:?}")]
    MultipleRoots(Vec<String>),

    /// Links that cannot be reached from the root (they sit on a cycle).
    #[error("links unreachable from root {root}: {links:?}")]
    Disconnected { root: String, links: Vec<String> },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = UrdfError::Parse("bad xml".into());
        assert_eq!(e.to_string(), "URDF parse error: bad xml");

        let e = UrdfError::MissingLink("base_link".into());
        assert_eq!(e.to_string(), "missing link: base_link");

        let e = UrdfError::UndefinedLink {
            joint: "j1".into(),
            link: "ghost".into(),
        };
        assert_eq!(e.to_string(), "joint j1 references undefined link ghost");

        let e = UrdfError::UnsupportedJointType("spherical".into());
        assert_eq!(e.to_string(), "unsupported joint type: spherical");

        assert_eq!(UrdfError::NoRootLink.to_string(), "no root link found");
    }

    #[test]
    fn io_error_includes_path() {
        let e = UrdfError::Io {
            path: PathBuf::from("/tmp/robot.urdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/robot.urdf"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn structural_display_messages() {
        let e = StructuralError::MultipleParents {
            link: "arm".into(),
            joints: vec!["j1".into(), "j2".into()],
        };
        assert_eq!(
            e.to_string(),
            r#"link arm has multiple parent joints: ["j1", "j2"]"#
        );
        assert_eq!(
            StructuralError::NoRoot.to_string(),
            "no root link: the joint graph is cyclic"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn errors_are_send_sync() {
        assert_send_sync::<UrdfError>();
        assert_send_sync::<StructuralError>();
    }
}
