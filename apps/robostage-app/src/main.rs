//! robostage command-line interface.
//!
//! Provides four modes of operation:
//! - `import`: Load a robot description and print the import report
//! - `animate`: Import a robot and key a CSV trajectory onto it
//! - `terrain`: Generate a terrain and print mesh statistics
//! - `info`: Print workspace crate versions and configuration

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};

use robostage_anim::{CsvLayout, RoboStageAnimPlugin, animate_from_csv};
use robostage_core::prelude::*;
use robostage_scene::{RoboStageScenePlugin, SpawnedRobot, import_robot};
use robostage_terrain::prelude::*;
use robostage_terrain::{HeightField, default_sections, spawn_heightfield};

type CliResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Robot description import, animation and terrain generation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a robot description and print the report.
    Import {
        /// Path to the URDF file.
        urdf: PathBuf,

        /// Additional directory to search for `package://` meshes.
        #[arg(short, long = "package-root")]
        package_roots: Vec<PathBuf>,

        /// Skip mesh files and keep only primitive geometry.
        #[arg(long)]
        no_meshes: bool,
    },

    /// Import a robot and key a CSV trajectory onto it.
    Animate {
        /// Path to the URDF file.
        urdf: PathBuf,

        /// Path to the trajectory CSV.
        csv: PathBuf,

        /// Frames per second (overrides the config file).
        #[arg(long)]
        fps: Option<f32>,

        /// Frame of trajectory time zero.
        #[arg(long)]
        offset: Option<i64>,

        /// CSV table layout.
        #[arg(long, value_enum, default_value_t = LayoutArg::Wide)]
        layout: LayoutArg,

        /// Angular values are in degrees.
        #[arg(long)]
        degrees: bool,

        /// Wrap continuous joint angles into (-pi, pi].
        #[arg(long)]
        wrap: bool,
    },

    /// Generate a terrain and print mesh statistics.
    Terrain {
        #[arg(value_enum)]
        shape: ShapeArg,

        /// Extent along X in meters.
        #[arg(long, default_value_t = 10.0)]
        width: f32,

        /// Extent along Y in meters.
        #[arg(long, default_value_t = 10.0)]
        depth: f32,

        /// Grid spacing in meters.
        #[arg(long, default_value_t = 0.1)]
        cell: f32,

        /// Random seed (overrides the config file).
        #[arg(short, long)]
        seed: Option<u64>,

        /// Ceiling height above the ground for `confined`.
        #[arg(long, default_value_t = 1.0)]
        clearance: f32,

        /// Number of obstacles for `confined`.
        #[arg(long, default_value_t = 5)]
        obstacles: usize,
    },

    /// Print crate information.
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// One row per time step, one column per joint.
    Wide,
    /// One row per (time, joint, value).
    Long,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Flat,
    Stairs,
    Ramp,
    Noise,
    Sections,
    Patches,
    Confined,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<StageConfig, ConfigError> {
    let config = match path {
        Some(path) => StageConfig::from_file(path)?,
        None => StageConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn build_app(config: StageConfig) -> App {
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());
    app.insert_resource(config);
    app.add_plugins((RoboStageCorePlugin, RoboStageScenePlugin, RoboStageAnimPlugin));
    app.finish();
    app.cleanup();
    app
}

fn print_robot(robot: &SpawnedRobot) {
    println!("{}", robot.report.summary());
    for (link, error) in &robot.report.failures {
        println!("  {link}: {error}");
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_import(
    mut config: StageConfig,
    urdf: &Path,
    package_roots: Vec<PathBuf>,
    no_meshes: bool,
) -> CliResult {
    config.import.package_roots.extend(package_roots);
    if no_meshes {
        config.import.load_meshes = false;
    }
    let import = config.import.clone();
    let mut app = build_app(config);
    let robot = import_robot(app.world_mut(), urdf, &import)?;
    app.update();
    print_robot(&robot);
    Ok(())
}

struct AnimateArgs {
    fps: Option<f32>,
    offset: Option<i64>,
    layout: LayoutArg,
    degrees: bool,
    wrap: bool,
}

fn run_animate(mut config: StageConfig, urdf: &Path, csv: &Path, args: &AnimateArgs) -> CliResult {
    let animation = &mut config.animation;
    if let Some(fps) = args.fps {
        animation.fps = fps;
    }
    if let Some(offset) = args.offset {
        animation.frame_offset = offset;
    }
    if args.degrees {
        animation.angle_unit = AngleUnit::Degrees;
    }
    if args.wrap {
        animation.continuous_mode = ContinuousMode::Wrapped;
    }
    animation.validate()?;
    let layout = match args.layout {
        LayoutArg::Wide => CsvLayout::default(),
        LayoutArg::Long => CsvLayout::Long,
    };

    let (import, animation) = (config.import.clone(), config.animation.clone());
    let mut app = build_app(config);
    let robot = import_robot(app.world_mut(), urdf, &import)?;
    print_robot(&robot);
    let report = animate_from_csv(app.world_mut(), &robot, csv, &layout, &animation)?;
    app.update();
    println!("{}", report.summary());
    Ok(())
}

struct TerrainArgs {
    shape: ShapeArg,
    width: f32,
    depth: f32,
    cell: f32,
    seed: Option<u64>,
    clearance: f32,
    obstacles: usize,
}

fn run_terrain(config: StageConfig, args: &TerrainArgs) -> CliResult {
    let seed = args.seed.unwrap_or(config.terrain.seed);
    let params = TerrainParams::new(args.width, args.depth, args.cell);
    let noise = TerrainShape::Noise {
        seed,
        amplitude: 0.3,
        scale: 0.5,
        base_height: 0.0,
    };

    let mut app = build_app(config);
    let field: HeightField = match args.shape {
        ShapeArg::Flat => generate(&params, &TerrainShape::Flat)?,
        ShapeArg::Stairs => generate(
            &params,
            &TerrainShape::Stairs {
                rise: 0.15,
                run: 0.3,
                direction: Direction::X,
            },
        )?,
        ShapeArg::Ramp => generate(
            &params,
            &TerrainShape::Ramp {
                height: 1.0,
                direction: Direction::X,
                slope: Slope::Linear,
            },
        )?,
        ShapeArg::Noise => generate(&params, &noise)?,
        ShapeArg::Sections => generate_combined(&params, &default_sections(&params))?,
        ShapeArg::Patches => {
            let config = PatchConfig {
                seed,
                ..PatchConfig::default()
            };
            generate_patches(&params, &config)?.field
        }
        ShapeArg::Confined => {
            let spec = ObstacleSpec {
                count: args.obstacles,
                ..ObstacleSpec::default()
            };
            let terrain =
                generate_with_boxes(&params, &TerrainShape::Flat, args.clearance, &spec, seed)?;
            let entity = spawn_confined(app.world_mut(), "confined", &terrain);
            print_mesh(&app, entity);
            println!("obstacles: {}", terrain.obstacles.len());
            println!("min clearance: {:.3}", terrain.min_clearance());
            return Ok(());
        }
    };

    println!(
        "grid: {}x{}, heights {:.3}..{:.3}",
        field.rows(),
        field.cols(),
        field.min_height(),
        field.max_height()
    );
    let entity = spawn_heightfield(app.world_mut(), "terrain", &field);
    print_mesh(&app, entity);
    Ok(())
}

fn print_mesh(app: &App, entity: Entity) {
    if let Some(mesh) = app.world().get::<robostage_terrain::TerrainMesh>(entity) {
        println!(
            "mesh: {} vertices, {} triangles",
            mesh.0.vertex_count(),
            mesh.0.triangle_count()
        );
    }
}

fn run_info(config: &StageConfig) {
    println!("robostage v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  robostage-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  robostage-urdf    {}", env!("CARGO_PKG_VERSION"));
    println!("  robostage-assets  {}", env!("CARGO_PKG_VERSION"));
    println!("  robostage-scene   {}", env!("CARGO_PKG_VERSION"));
    println!("  robostage-anim    {}", env!("CARGO_PKG_VERSION"));
    println!("  robostage-terrain {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("animation: {} fps, offset {}", config.animation.fps, config.animation.frame_offset);
    println!("terrain seed: {}", config.terrain.seed);
    println!("package roots: {:?}", config.import.package_roots);
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(Commands::Import {
            urdf,
            package_roots,
            no_meshes,
        }) => run_import(config, &urdf, package_roots, no_meshes),
        Some(Commands::Animate {
            urdf,
            csv,
            fps,
            offset,
            layout,
            degrees,
            wrap,
        }) => run_animate(
            config,
            &urdf,
            &csv,
            &AnimateArgs {
                fps,
                offset,
                layout,
                degrees,
                wrap,
            },
        ),
        Some(Commands::Terrain {
            shape,
            width,
            depth,
            cell,
            seed,
            clearance,
            obstacles,
        }) => run_terrain(
            config,
            &TerrainArgs {
                shape,
                width,
                depth,
                cell,
                seed,
                clearance,
                obstacles,
            },
        ),
        Some(Commands::Info) | None => {
            run_info(&config);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
