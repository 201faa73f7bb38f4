//! Headless demo: builds a voxel scene, drives it through the event bus for a
//! few frames, and reports greedy-versus-baseline mesh statistics.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p cube-demo -- --scene heightmap --seed 7`.
//! Add `--json` to print the report as JSON on stdout.

mod report;
mod scenes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cube_config::{CliArgs, Config, ConfigError};
use cube_scene::{BusError, EventBus, EventPublisher, MeshBuffers, Scene, SceneEvent};
use cube_voxel::{Cube, Rgb};
use tracing::{info, warn};

use crate::report::MeshReport;
use crate::scenes::SceneKind;

/// Camera step per key press, as the interactive viewer uses.
const MOVE_SPEED: f32 = 0.05;

#[derive(Parser, Debug)]
#[command(name = "cube-demo", about = "Mesh a voxel scene and report statistics")]
struct DemoArgs {
    /// Scene to build.
    #[arg(long, value_enum, default_value_t = SceneKind::Block)]
    scene: SceneKind,

    /// Seed for the random scenes.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum frames to simulate after the scripted input.
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    overrides: CliArgs,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cube-demo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &DemoArgs) -> Result<(), DemoError> {
    let config_dir: PathBuf = match &args.overrides.config {
        Some(dir) => dir.clone(),
        None => Config::default_dir()?,
    };

    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args.overrides);

    let log_dir = config_dir.join("logs");
    cube_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let world = scenes::build(args.scene, args.seed, config.mesh.chunk_size);
    let mut bus = EventBus::new();
    let mut scene = Scene::new(world, &config, &mut bus);
    let mut sink = MeshBuffers::default();
    let view = scene.view();
    info!(
        scene = ?args.scene,
        title = %view.title,
        mesher = ?scene.mesher().kind(),
        min_extent = scene.mesher().extent(),
        fov_y = view.projection.fov_y,
        backface_culling = view.projection.backface_culling,
        "scene built"
    );

    let initial = scene.update(&mut sink);
    info!(
        quads = initial.rebuilt.map_or(0, |stats| stats.quads),
        indices = sink.indices.len(),
        "initial mesh uploaded"
    );

    let publisher = bus.publisher();
    std::thread::scope(|scope| {
        scope
            .spawn(|| scripted_input(&publisher))
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
    })?;

    for frame in 1..=args.frames {
        bus.pump();
        let status = scene.update(&mut sink);
        info!(
            frame,
            events = status.events,
            world_edits = status.world_edits,
            rebuilt = status.rebuilt.is_some(),
            wireframe = sink.wireframe,
            "frame"
        );
        if status.close_requested {
            info!(frame, "close requested");
            break;
        }
    }

    let view = scene.view();
    info!(
        camera = ?view.camera,
        look = ?view.look,
        aspect = view.aspect_ratio(),
        uploads = sink.uploads,
        "view state"
    );

    let report = MeshReport::measure(
        args.scene,
        scene.world().source(),
        scene.mesher().extent(),
        config.mesh.parallel_axes,
    );
    if !report.coverage_matches() {
        warn!(
            greedy = report.greedy.area,
            naive = report.naive.area,
            "greedy and baseline face areas differ"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            voxels = report.voxels,
            greedy_quads = report.greedy.quads,
            naive_quads = report.naive.quads,
            greedy_triangles = report.greedy.triangles,
            naive_triangles = report.naive.triangles,
            reduction = report.quad_reduction,
            "mesh statistics"
        );
    }

    Ok(())
}

/// What an input thread would publish over a few frames of play: walk
/// forward, look around, toggle wireframe, recolor the corner cube, then close.
fn scripted_input(publisher: &EventPublisher) -> Result<(), BusError> {
    for _ in 0..10 {
        publisher.publish(SceneEvent::CameraMove {
            dx: 0.0,
            dy: 0.0,
            dz: MOVE_SPEED,
        })?;
    }
    publisher.publish(SceneEvent::MouseMovement { dx: 12.0, dy: -4.0 })?;
    publisher.publish(SceneEvent::ToggleWireframe)?;
    publisher.publish(SceneEvent::AddCube(Cube::colored(
        0,
        0,
        0,
        Rgb::from_rgba8([255, 255, 0, 255]),
    )))?;
    publisher.publish(SceneEvent::LeftClick { x: 400.0, y: 225.0 })?;
    publisher.publish(SceneEvent::RequestClose)
}
