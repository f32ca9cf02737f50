//! CLI logic for the Tableau scene renderer.
//!
//! This module contains the core CLI logic: configuration discovery,
//! command-line overrides and rendering the selected scene to frames.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::{ConfigError, ConfigSource, resolve_config};

use log::info;

use tableau::{SceneRenderer, TableauError, scenes::SceneKind};

/// One line per scene, name and description, as printed by `--list`.
pub fn scene_catalog() -> String {
    let width = SceneKind::all()
        .iter()
        .map(|kind| kind.name().len())
        .max()
        .unwrap_or_default();
    SceneKind::all()
        .iter()
        .map(|kind| format!("{:width$}  {}\n", kind.name(), kind.description()))
        .collect()
}

/// Run the Tableau CLI application
///
/// Prints the scene catalog for `--list`; otherwise builds the selected scene
/// and writes its frames into the output directory.
///
/// # Errors
///
/// Returns `TableauError` for:
/// - Configuration loading errors and unknown scene names
/// - Unusable assets under strict asset checking
/// - Timeline errors
/// - Frame export errors
pub fn run(args: &Args) -> Result<(), TableauError> {
    if args.list {
        print!("{}", scene_catalog());
        return Ok(());
    }

    let name = args
        .scene
        .as_deref()
        .ok_or_else(|| TableauError::Configuration("no scene given".to_string()))?;
    let kind: SceneKind = name.parse()?;
    info!(scene = kind.name(), output_path = args.output; "Rendering scene");

    let renderer = SceneRenderer::new(resolve_config(args)?);
    let scene = renderer.build(kind)?;
    let summary = renderer.render_frames(&scene, &args.output)?;

    info!(
        frames = summary.frames(),
        duration = summary.duration(),
        output_path = summary.directory().display().to_string();
        "Frames exported successfully"
    );
    Ok(())
}
