//! Vector assets with programmatic fallbacks.
//!
//! Scenes ask for artwork by name (`rbc`, `wbc`, ...). The [`AssetLoader`]
//! looks for `<directory>/<name>.svg`; when the file is absent, or cannot be
//! parsed and the loader is not strict, the [`FallbackCatalog`] supplies a
//! deterministic stand-in so the scene still plays.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use tableau_core::{
    color::palette,
    draw::{Figure, Graphic, Shape, StrokeDefinition, Style},
};

use crate::{TableauError, config::AssetConfig};

/// How [`AssetLoader::figure_or_fallback`] produced its figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Loaded,
    /// No file for the asset; the fallback was used.
    Missing,
    /// The file exists but did not parse; the fallback was used.
    Malformed(String),
}

impl AssetOutcome {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Loaded)
    }
}

/// Loads `<name>.svg` files from one directory.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    directory: PathBuf,
    strict: bool,
}

impl AssetLoader {
    pub fn new(directory: impl Into<PathBuf>, strict: bool) -> Self {
        Self {
            directory: directory.into(),
            strict,
        }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(config.directory(), config.strict())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.svg"))
    }

    /// Reads and parses one asset.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Io`] when the file cannot be read and
    /// [`TableauError::Asset`] when it is not UTF-8 text or not a usable SVG
    /// document.
    pub fn load(&self, name: &str) -> Result<Option<Graphic>, TableauError> {
        let path = self.path_for(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let markup = String::from_utf8(bytes).map_err(|err| TableauError::Asset {
            name: name.to_string(),
            reason: format!("not UTF-8 text: {err}"),
        })?;
        Graphic::parse(&markup)
            .map(Some)
            .map_err(|err| TableauError::Asset {
                name: name.to_string(),
                reason: err.to_string(),
            })
    }

    /// Figure for asset `name`, drawn `scale` times its natural size.
    ///
    /// Loaded artwork is one unit tall before scaling. Missing assets and,
    /// unless the loader is strict, malformed ones are replaced by
    /// [`FallbackCatalog::figure`] with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Asset`] for a malformed asset in strict mode,
    /// and [`TableauError::Io`] when an existing file cannot be read.
    pub fn figure_or_fallback(
        &self,
        name: &str,
        scale: f32,
    ) -> Result<(Figure, AssetOutcome), TableauError> {
        let outcome = match self.load(name) {
            Ok(Some(graphic)) => {
                debug!(asset = name; "Loaded asset");
                let figure = Figure::new(Shape::Graphic(graphic))
                    .with_style(Style::default())
                    .with_scale(scale);
                return Ok((figure, AssetOutcome::Loaded));
            }
            Ok(None) => {
                warn!(asset = name, path:? = self.path_for(name); "Asset not found, using fallback shape");
                AssetOutcome::Missing
            }
            Err(TableauError::Asset { name, reason }) => {
                if self.strict {
                    return Err(TableauError::Asset { name, reason });
                }
                warn!(asset = name, reason = reason.as_str(); "Asset is malformed, using fallback shape");
                AssetOutcome::Malformed(reason)
            }
            Err(err) => return Err(err),
        };
        Ok((FallbackCatalog::figure(name).with_scale(scale), outcome))
    }
}

/// Deterministic stand-ins for the built-in asset names.
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn figure(name: &str) -> Figure {
        match name {
            "rbc" => Figure::new(Shape::circle(0.6)).with_style(
                Style::stroked(StrokeDefinition::new(palette::red(), 3.0))
                    .with_fill(palette::red().with_alpha(0.6)),
            ),
            "wbc" => Figure::new(Shape::circle(0.7)).with_style(
                Style::stroked(StrokeDefinition::new(palette::purple(), 3.0))
                    .with_fill(palette::white()),
            ),
            "ctc" => Figure::new(Shape::parallelogram(1.2, 0.6, 0.2)).with_style(
                Style::stroked(StrokeDefinition::new(palette::green_e(), 3.0))
                    .with_fill(palette::green().with_alpha(0.8)),
            ),
            "platelet" => Figure::new(Shape::ellipse(0.8, 0.5)).with_style(
                Style::stroked(StrokeDefinition::new(palette::purple_a(), 2.0))
                    .with_fill(palette::purple_a().with_alpha(0.5)),
            ),
            _ => Figure::new(Shape::circle(0.5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><circle cx="5" cy="5" r="4"/></svg>"#;

    #[test]
    fn test_missing_asset_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path(), true);
        let (figure, outcome) = loader.figure_or_fallback("rbc", 0.8).unwrap();
        assert_eq!(outcome, AssetOutcome::Missing);
        assert_eq!(figure.shape(), &Shape::circle(0.6));
        assert_eq!(figure.placement().scale(), 0.8);
    }

    #[test]
    fn test_loads_existing_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("wbc.svg"), CELL).unwrap();
        let loader = AssetLoader::new(dir.path(), false);
        let (figure, outcome) = loader.figure_or_fallback("wbc", 1.5).unwrap();
        assert_eq!(outcome, AssetOutcome::Loaded);
        assert!(matches!(figure.shape(), Shape::Graphic(_)));
    }

    #[test]
    fn test_malformed_asset_lenient_and_strict() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ctc.svg"), "<svg><g></svg>").unwrap();

        let lenient = AssetLoader::new(dir.path(), false);
        let (figure, outcome) = lenient.figure_or_fallback("ctc", 1.0).unwrap();
        assert!(matches!(outcome, AssetOutcome::Malformed(_)));
        assert!(outcome.is_fallback());
        assert_eq!(figure.shape(), &Shape::parallelogram(1.2, 0.6, 0.2));

        let strict = AssetLoader::new(dir.path(), true);
        let err = strict.figure_or_fallback("ctc", 1.0).unwrap_err();
        assert!(matches!(err, TableauError::Asset { ref name, .. } if name == "ctc"));
    }

    #[test]
    fn test_binary_asset_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rbc.svg"), [0xff, 0xfe, 0x00, 0x3c]).unwrap();

        let lenient = AssetLoader::new(dir.path(), false);
        let (figure, outcome) = lenient.figure_or_fallback("rbc", 1.0).unwrap();
        assert!(matches!(outcome, AssetOutcome::Malformed(ref reason) if reason.contains("UTF-8")));
        assert_eq!(figure.shape(), &Shape::circle(0.6));

        let strict = AssetLoader::new(dir.path(), true);
        assert!(matches!(
            strict.figure_or_fallback("rbc", 1.0),
            Err(TableauError::Asset { .. })
        ));
    }

    #[test]
    fn test_unknown_name_gets_generic_fallback() {
        assert_eq!(FallbackCatalog::figure("mystery").shape(), &Shape::circle(0.5));
    }
}
