//! Tableau - procedural scenes for short scientific animations.
//!
//! Scenes are scripted as timelines of figures: pillar arrays from the layout
//! generators, particle streamlines from the path sampler, and anchored
//! annotations that follow the figures they measure. Playing a scene produces
//! one SVG document per frame; turning frames into video is left to external
//! tools.

pub mod assets;
pub mod config;
pub mod export;
pub mod layout;
pub mod path;
pub mod scenes;
pub mod timeline;

mod error;

pub use tableau_core::{color, curve, draw, geometry, identifier};

pub use error::TableauError;

use std::path::{Path, PathBuf};

use log::{debug, info};

use assets::AssetLoader;
use config::AppConfig;
use export::{SceneMeta, svg::SvgFrameWriter};
use scenes::SceneKind;
use timeline::{Scene, TimelinePlayer};

/// Outcome of [`SceneRenderer::render_frames`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    scene: String,
    frames: usize,
    duration: f32,
    directory: PathBuf,
}

impl RenderSummary {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Builds scenes from the catalog and renders them to SVG frames.
///
/// # Examples
///
/// ```rust,no_run
/// use tableau::{SceneRenderer, config::AppConfig, scenes::SceneKind};
///
/// let renderer = SceneRenderer::new(AppConfig::default());
/// let scene = renderer.build(SceneKind::Quote).expect("Failed to build");
///
/// // One file per frame
/// let summary = renderer.render_frames(&scene, "frames").expect("Failed to render");
/// println!("{} frames", summary.frames());
///
/// // Or a single frame in memory
/// let svg = renderer.render_svg_at(&scene, 2.0).expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct SceneRenderer {
    config: AppConfig,
}

impl SceneRenderer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validates the configuration and builds the timeline of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `TableauError` for an invalid configuration, an unusable
    /// layout, or a malformed asset under strict asset checking.
    pub fn build(&self, kind: SceneKind) -> Result<Scene, TableauError> {
        self.config.validate()?;
        info!(scene = kind.name(); "Building scene");
        let assets = AssetLoader::from_config(self.config.assets());
        let scene = kind.build(&self.config, &assets)?;
        debug!(
            scene = kind.name(),
            steps = scene.steps().len(),
            duration = scene.duration();
            "Scene built"
        );
        Ok(scene)
    }

    /// Plays `scene` and writes every frame into `directory`.
    ///
    /// # Errors
    ///
    /// Returns `TableauError` when the timeline cannot be played or a frame
    /// cannot be written.
    pub fn render_frames(
        &self,
        scene: &Scene,
        directory: impl Into<PathBuf>,
    ) -> Result<RenderSummary, TableauError> {
        let mut writer = SvgFrameWriter::new(directory);
        let frames = self.player()?.play(scene, &mut writer)?;
        info!(scene = scene.name(), frames; "Frames rendered");
        Ok(RenderSummary {
            scene: scene.name().to_string(),
            frames,
            duration: scene.duration(),
            directory: writer.directory().to_path_buf(),
        })
    }

    /// Renders the frame showing `scene` at `seconds`.
    ///
    /// # Errors
    ///
    /// Returns `TableauError` for a negative time or a timeline that cannot
    /// be played up to it.
    pub fn render_svg_at(&self, scene: &Scene, seconds: f32) -> Result<String, TableauError> {
        let player = self.player()?;
        let state = player.snapshot_at(scene, seconds)?;
        let meta: SceneMeta = player.meta(scene);
        Ok(export::svg::render_document(&state, &meta).to_string())
    }

    fn player(&self) -> Result<TimelinePlayer, TableauError> {
        let render = self.config.render();
        Ok(TimelinePlayer::new(render.fps())
            .with_viewport(render.viewport())
            .with_background(render.background_color()?))
    }
}
