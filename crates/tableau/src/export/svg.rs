use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use tableau_core::draw::{Drawable, LayeredOutput};

use super::{Error, FrameSink, SceneMeta};
use crate::timeline::SceneState;

/// Renders one frame: a full-frame background followed by every figure,
/// grouped by render layer.
pub fn render_document(state: &SceneState, meta: &SceneMeta) -> Document {
    let viewport = meta.viewport();
    let width = viewport.pixel_width();
    let height = viewport.pixel_height();

    let background = svg_element::Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", width)
        .set("height", height)
        .set("fill", meta.background().to_svg_value());

    let mut layers = LayeredOutput::new();
    for (_, figure) in state.figures() {
        layers.merge(figure.render_to_layers(viewport));
    }

    let mut document = Document::new()
        .set("viewBox", format!("0 0 {width} {height}"))
        .set("width", width)
        .set("height", height)
        .add(background);
    for node in layers.render() {
        document = document.add(node);
    }
    document
}

/// Writes every frame as `frame_NNNNN.svg` into a directory.
#[derive(Debug)]
pub struct SvgFrameWriter {
    directory: PathBuf,
    meta: Option<SceneMeta>,
    written: usize,
}

impl SvgFrameWriter {
    /// The directory is created when the first scene begins.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            meta: None,
            written: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Frames written for the current scene.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Path of the file holding frame `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("frame_{index:05}.svg"))
    }
}

impl FrameSink for SvgFrameWriter {
    fn begin(&mut self, meta: &SceneMeta) -> Result<(), Error> {
        fs::create_dir_all(&self.directory)?;
        info!(
            scene = meta.name(),
            directory:? = self.directory,
            frames = meta.frame_count();
            "Writing SVG frames"
        );
        self.meta = Some(meta.clone());
        self.written = 0;
        Ok(())
    }

    fn frame(&mut self, index: usize, state: &SceneState) -> Result<(), Error> {
        let meta = self.meta.as_ref().ok_or(Error::NotStarted(index))?;
        let document = render_document(state, meta);
        let path = self.frame_path(index);
        svg::save(&path, &document)?;
        self.written += 1;
        debug!(path:? = path; "Frame written");
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        info!(frames = self.written; "SVG frames complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use tableau_core::{
        color::palette,
        draw::{Figure, RenderLayer, Shape, Style, Viewport},
        geometry::Point,
        identifier::Id,
    };

    use super::*;

    fn meta() -> SceneMeta {
        SceneMeta::new("test", 30, 1, Viewport::new(320, 180, 8.0))
            .with_background(palette::white())
    }

    #[test]
    fn test_render_document_layers_and_background() {
        let mut figures = IndexMap::new();
        figures.insert(
            Id::new("dot"),
            Figure::new(Shape::circle(0.5))
                .with_style(Style::filled(palette::red()))
                .with_position(Point::new(1.0, 0.0))
                .with_layer(RenderLayer::Particle),
        );
        let markup = render_document(&SceneState::new(figures), &meta()).to_string();
        assert!(markup.contains("viewBox=\"0 0 320 180\""));
        assert!(markup.contains("fill=\"#ffffff\""));
        assert!(markup.contains("data-layer=\"particle\""));
        assert!(markup.contains("#fc6255"));
    }

    #[test]
    fn test_frame_before_begin_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SvgFrameWriter::new(dir.path());
        assert!(matches!(
            writer.frame(0, &SceneState::default()),
            Err(Error::NotStarted(0))
        ));
    }

    #[test]
    fn test_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let mut writer = SvgFrameWriter::new(&out);
        writer.begin(&meta()).unwrap();
        writer.frame(0, &SceneState::default()).unwrap();
        writer.frame(1, &SceneState::default()).unwrap();
        writer.finish().unwrap();

        assert_eq!(writer.written(), 2);
        assert!(out.join("frame_00000.svg").is_file());
        let content = fs::read_to_string(out.join("frame_00001.svg")).unwrap();
        assert!(content.contains("<svg"));
    }
}
