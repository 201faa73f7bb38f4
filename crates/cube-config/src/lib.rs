//! Configuration for the cube viewer.
//!
//! Settings persist to disk as a RON file. Missing fields fall back to their
//! defaults and unknown fields are ignored, so older and newer files both
//! load. Command-line flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, MeshConfig, MesherKind, RenderConfig, WindowConfig};
pub use error::ConfigError;
