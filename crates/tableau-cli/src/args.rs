//! Command-line argument definitions for the Tableau CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments pick the scene, the frame directory, the
//! configuration file and a few overrides applied on top of it.

use clap::Parser;

/// Command-line arguments for the Tableau scene renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Scene to render, see `--list`
    #[arg(required_unless_present = "list")]
    pub scene: Option<String>,

    /// Directory receiving one SVG file per frame
    #[arg(short, long, default_value = "frames")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for stochastic streamlines, overrides the configuration
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames per second, overrides the configuration
    #[arg(long)]
    pub fps: Option<u32>,

    /// List the available scenes and exit
    #[arg(long)]
    pub list: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments rendering `scene` into `output` with everything else at its
    /// default.
    pub fn for_scene(scene: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            scene: Some(scene.into()),
            output: output.into(),
            config: None,
            seed: None,
            fps: None,
            list: false,
            log_level: "info".to_string(),
        }
    }
}
