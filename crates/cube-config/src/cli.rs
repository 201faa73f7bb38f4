//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, MesherKind};

/// Viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cube", about = "Greedy voxel mesher")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Mesher used for rebuilds.
    #[arg(long, value_enum)]
    pub mesher: Option<MesherKind>,

    /// Side length of the meshing working volume.
    #[arg(long)]
    pub working_volume: Option<usize>,

    /// Sweep the three axes on separate threads.
    #[arg(long)]
    pub parallel: Option<bool>,

    /// Start in wireframe mode.
    #[arg(long)]
    pub wireframe: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(mesher) = args.mesher {
            self.mesh.mesher = mesher;
        }
        if let Some(volume) = args.working_volume {
            self.mesh.working_volume = volume;
        }
        if let Some(parallel) = args.parallel {
            self.mesh.parallel_axes = parallel;
        }
        if let Some(wireframe) = args.wireframe {
            self.render.wireframe = wireframe;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
