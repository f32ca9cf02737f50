//! Configuration types for Tableau rendering.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs the values it changes.
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`RenderConfig`] - Frame size, frame rate, camera height and background.
//! - [`FlowConfig`] - Seed and jitter used when sampling streamlines.
//! - [`AssetConfig`] - Where vector assets live and how strictly they are checked.
//!
//! ```
//! # use tableau::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().fps(), 30);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use tableau_core::{color::Color, draw::Viewport};

use crate::TableauError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    flow: FlowConfig,

    #[serde(default)]
    assets: AssetConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig, flow: FlowConfig, assets: AssetConfig) -> Self {
        Self {
            render,
            flow,
            assets,
        }
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn flow(&self) -> &FlowConfig {
        &self.flow
    }

    pub fn assets(&self) -> &AssetConfig {
        &self.assets
    }

    /// Overrides the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.render.fps = fps;
        self
    }

    /// Overrides the streamline seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.flow.seed = seed;
        self
    }

    pub fn with_asset_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.assets.directory = directory.into();
        self
    }

    pub fn with_strict_assets(mut self, strict: bool) -> Self {
        self.assets.strict = strict;
        self
    }

    /// Checks every value a run depends on.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] naming the first offending
    /// value.
    pub fn validate(&self) -> Result<(), TableauError> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(TableauError::configuration(format!(
                "frame size must be positive, got {}x{}",
                render.width, render.height
            )));
        }
        if render.fps == 0 {
            return Err(TableauError::configuration("fps must be positive"));
        }
        if !render.frame_height.is_finite() || render.frame_height <= 0.0 {
            return Err(TableauError::configuration(format!(
                "frame height must be positive, got {}",
                render.frame_height
            )));
        }
        render.background_color()?;

        let flow = &self.flow;
        for (name, value) in [("jitter", flow.jitter), ("sway", flow.sway)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TableauError::configuration(format!(
                    "{name} amplitude must be finite and not negative, got {value}"
                )));
            }
        }
        if flow.control_points < 2 {
            return Err(TableauError::configuration(format!(
                "a streamline needs at least two control points, got {}",
                flow.control_points
            )));
        }
        Ok(())
    }
}

/// Output frame settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    fps: u32,
    /// Visible frame height in scene units.
    frame_height: f32,
    background: String,
}

impl RenderConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_height(&self) -> f32 {
        self.frame_height
    }

    /// Parsed background color.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the configured value is not a CSS
    /// color.
    pub fn background_color(&self) -> Result<Color, TableauError> {
        Color::new(&self.background)
            .map_err(|err| TableauError::configuration(format!("invalid background: {err}")))
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.frame_height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            frame_height: 8.0,
            background: "#000000".to_string(),
        }
    }
}

/// Streamline sampling settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    seed: u64,
    /// Maximum per-point jitter in scene units.
    jitter: f32,
    /// Amplitude of the slow sinusoidal sway.
    sway: f32,
    control_points: usize,
    streamlines: usize,
}

impl FlowConfig {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn jitter(&self) -> f32 {
        self.jitter
    }

    pub fn sway(&self) -> f32 {
        self.sway
    }

    pub fn control_points(&self) -> usize {
        self.control_points
    }

    pub fn streamlines(&self) -> usize {
        self.streamlines
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            jitter: 0.05,
            sway: 0.15,
            control_points: 12,
            streamlines: 15,
        }
    }
}

/// Vector asset lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    directory: PathBuf,
    /// Fail the run on malformed assets instead of substituting a fallback.
    strict: bool,
}

impl AssetConfig {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.render().width(), 1280);
        assert_eq!(config.render().height(), 720);
        assert_approx_eq!(f32, config.render().frame_height(), 8.0);
        assert_eq!(config.flow().seed(), 42);
        assert_eq!(config.flow().streamlines(), 15);
        assert!(!config.assets().strict());
        assert_eq!(
            config.render().background_color().unwrap().to_svg_value(),
            "#000000"
        );
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_fps(60)
            .with_seed(7)
            .with_strict_assets(true)
            .with_asset_directory("assets");
        assert_eq!(config.render().fps(), 60);
        assert_eq!(config.flow().seed(), 7);
        assert!(config.assets().strict());
        assert_eq!(config.assets().directory(), Path::new("assets"));
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let config = AppConfig::default().with_fps(0);
        assert!(matches!(
            config.validate(),
            Err(TableauError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_background() {
        let render = RenderConfig {
            background: "no-such-color".to_string(),
            ..RenderConfig::default()
        };
        let config = AppConfig::new(render, FlowConfig::default(), AssetConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_flat_frame() {
        let render = RenderConfig {
            frame_height: 0.0,
            ..RenderConfig::default()
        };
        let config = AppConfig::new(render, FlowConfig::default(), AssetConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("frame height"));
    }

    #[test]
    fn test_validate_rejects_short_streamlines() {
        let flow = FlowConfig {
            control_points: 1,
            ..FlowConfig::default()
        };
        let config = AppConfig::new(RenderConfig::default(), flow, AssetConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_jitter() {
        for (jitter, sway) in [(f32::INFINITY, 0.15), (f32::NAN, 0.15), (0.05, f32::NEG_INFINITY), (-0.1, 0.15)] {
            let flow = FlowConfig {
                jitter,
                sway,
                ..FlowConfig::default()
            };
            let config = AppConfig::new(RenderConfig::default(), flow, AssetConfig::default());
            assert!(matches!(
                config.validate(),
                Err(TableauError::Configuration(_))
            ));
        }
    }
}
