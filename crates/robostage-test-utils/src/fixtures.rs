//! Robot descriptions, trajectory tables and temporary files for tests.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use robostage_urdf::RobotModel;

/// Two links joined by a revolute joint about Z, one meter above the base.
pub const ARM_URDF: &str = r#"<?xml version="1.0"?>
<robot name="arm">
    <link name="base">
        <visual>
            <geometry><box size="0.4 0.4 0.2"/></geometry>
            <material name="grey"><color rgba="0.5 0.5 0.5 1"/></material>
        </visual>
    </link>
    <link name="arm">
        <visual>
            <origin xyz="0 0 0.25"/>
            <geometry><cylinder radius="0.05" length="0.5"/></geometry>
        </visual>
    </link>
    <joint name="joint1" type="revolute">
        <parent link="base"/>
        <child link="arm"/>
        <origin xyz="0 0 1"/>
        <axis xyz="0 0 1"/>
        <limit lower="-3.14" upper="3.14" effort="10" velocity="2"/>
    </joint>
</robot>
"#;

/// A link named `tip` with two parent joints; not a tree.
pub const TWO_PARENT_URDF: &str = r#"<?xml version="1.0"?>
<robot name="broken">
    <link name="base"/>
    <link name="left"/>
    <link name="tip"/>
    <joint name="base_left" type="fixed">
        <parent link="base"/><child link="left"/>
    </joint>
    <joint name="left_tip" type="fixed">
        <parent link="left"/><child link="tip"/>
    </joint>
    <joint name="base_tip" type="fixed">
        <parent link="base"/><child link="tip"/>
    </joint>
</robot>
"#;

/// Wide trajectory turning `joint1` a quarter turn over one second.
pub const QUARTER_TURN_CSV: &str = "time,joint1\n0.0,0.0\n0.5,0.7853982\n1.0,1.5707964\n";

/// Serial chain `link0 … link{n-1}` of revolute joints, each link with a
/// box visual. When `missing_mesh_at` is `Some(k)`, link `k` instead
/// references a mesh file that does not exist.
pub fn chain_urdf(n: usize, missing_mesh_at: Option<usize>) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<robot name=\"chain\">\n");
    for i in 0..n {
        let geometry = if missing_mesh_at == Some(i) {
            format!(r#"<mesh filename="meshes/missing_{i}.obj"/>"#)
        } else {
            r#"<box size="0.1 0.1 0.3"/>"#.to_string()
        };
        let _ = writeln!(
            xml,
            r#"  <link name="link{i}"><visual><geometry>{geometry}</geometry></visual></link>"#
        );
    }
    for i in 1..n {
        let _ = writeln!(
            xml,
            r#"  <joint name="joint{i}" type="revolute">
    <parent link="link{p}"/><child link="link{i}"/>
    <origin xyz="0 0 0.3"/><axis xyz="0 1 0"/>
    <limit lower="-1.5" upper="1.5" effort="5" velocity="1"/>
  </joint>"#,
            p = i - 1
        );
    }
    xml.push_str("</robot>\n");
    xml
}

/// Parse one of the fixture descriptions.
pub fn parse_fixture(xml: &str) -> RobotModel {
    robostage_urdf::parse_string(xml).expect("fixture descriptions are valid")
}

/// Write `contents` to a fresh file named `name` in a per-test directory
/// under the system temp dir. Returns the file path.
pub fn write_temp(name: &str, contents: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "robostage-test-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    write_file(&path, contents);
    path
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write fixture file");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_fixture_parses() {
        let model = parse_fixture(ARM_URDF);
        assert_eq!(model.name(), "arm");
        assert_eq!(model.links().len(), 2);
        assert_eq!(model.joint_names(), ["joint1"]);
    }

    #[test]
    fn chain_has_requested_length() {
        let model = parse_fixture(&chain_urdf(10, Some(4)));
        assert_eq!(model.links().len(), 10);
        assert_eq!(model.joints().len(), 9);
    }

    #[test]
    fn temp_files_are_distinct() {
        let a = write_temp("a.txt", "one");
        let b = write_temp("a.txt", "two");
        assert_ne!(a, b);
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "two");
    }
}
