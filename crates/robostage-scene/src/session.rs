//! Import entry points that bundle parsing, validation, geometry
//! resolution and spawning.
//!
//! Each call owns its own [`GeometryResolver`] and therefore its own asset
//! cache; nothing is shared between imports.

use std::path::Path;

use bevy::log::{info, warn};
use bevy::prelude::*;
use robostage_assets::GeometryResolver;
use robostage_core::ImportConfig;
use robostage_urdf::{RobotModel, parse_file, parse_string};

use crate::error::RoboStageError;
use crate::spawner::{SpawnOptions, SpawnedRobot, spawn_robot};

/// Import the robot description at `path` into `world`.
///
/// Mesh references relative to the description are resolved against its
/// directory. Parse, structural and configuration errors are returned
/// before the world is modified; geometry problems end up in the robot's
/// report.
pub fn import_robot(
    world: &mut World,
    path: &Path,
    config: &ImportConfig,
) -> Result<SpawnedRobot, RoboStageError> {
    config.validate()?;
    let model = parse_file(path)?;
    let resolver = GeometryResolver::for_description(path, config.package_roots.clone());
    spawn_model(world, &model, resolver, config)
}

/// Import a description held in memory. Relative mesh paths are resolved
/// against `base_dir` when given.
pub fn import_robot_str(
    world: &mut World,
    xml: &str,
    base_dir: Option<&Path>,
    config: &ImportConfig,
) -> Result<SpawnedRobot, RoboStageError> {
    config.validate()?;
    let model = parse_string(xml)?;
    let resolver = GeometryResolver::new(robostage_assets::MeshLocator::new(
        base_dir.map(Path::to_path_buf),
        config.package_roots.clone(),
    ));
    spawn_model(world, &model, resolver, config)
}

fn spawn_model(
    world: &mut World,
    model: &RobotModel,
    resolver: GeometryResolver,
    config: &ImportConfig,
) -> Result<SpawnedRobot, RoboStageError> {
    let mut resolver = resolver.load_meshes(config.load_meshes);
    let options = SpawnOptions::from_config(config);
    let robot = spawn_robot(world, model, &mut resolver, &options)?;

    let report = &robot.report;
    if report.is_clean() {
        info!("{}", report.summary());
    } else {
        warn!("{}", report.summary());
        for (link, error) in &report.failures {
            warn!("  {link}: {error}");
        }
    }
    Ok(robot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
