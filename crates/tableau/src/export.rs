//! Frame output.
//!
//! The [`FrameSink`] trait is the seam between playback and whatever turns
//! frames into pictures. The timeline player calls [`FrameSink::begin`] once
//! with the scene's [`SceneMeta`], [`FrameSink::frame`] for every frame in
//! order, and [`FrameSink::finish`] at the end.
//!
//! # Available Sinks
//!
//! - [`svg::SvgFrameWriter`] - one SVG document per frame in a directory,
//!   named `frame_00000.svg`, `frame_00001.svg`, ... Encoding the sequence
//!   into a video is left to external tools.
//! - [`FrameCollector`] - keeps frames in memory, for tests and previews.
//!
//! # Error Handling
//!
//! Sinks return [`Error`], which converts into [`TableauError::Export`] at
//! the crate boundary.
//!
//! [`TableauError::Export`]: crate::TableauError::Export

/// SVG frame output.
pub mod svg;

use tableau_core::{color::Color, draw::Viewport};

use crate::timeline::SceneState;

/// Receives the frames of one scene.
pub trait FrameSink {
    /// Called once before the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the sink cannot prepare its output.
    fn begin(&mut self, meta: &SceneMeta) -> Result<(), Error>;

    /// Called for every frame, `index` counting from zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStarted`] when called before
    /// [`begin`](Self::begin), or an I/O or render error from the sink.
    fn frame(&mut self, index: usize, state: &SceneState) -> Result<(), Error>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<(), Error>;
}

/// What a sink needs to know about the scene before frames arrive.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMeta {
    name: String,
    fps: u32,
    frame_count: usize,
    duration: f32,
    viewport: Viewport,
    background: Color,
}

impl SceneMeta {
    pub fn new(name: impl Into<String>, fps: u32, frame_count: usize, viewport: Viewport) -> Self {
        Self {
            name: name.into(),
            fps,
            frame_count,
            duration: 0.0,
            viewport,
            background: Color::from_rgb8(0, 0, 0),
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn background(&self) -> Color {
        self.background
    }
}

/// In-memory sink that counts frames and keeps the most recent state.
#[derive(Debug, Default)]
pub struct FrameCollector {
    meta: Option<SceneMeta>,
    frames: usize,
    last: Option<SceneState>,
    finished: bool,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(&self) -> Option<&SceneMeta> {
        self.meta.as_ref()
    }

    /// Frames received so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn last_state(&self) -> Option<&SceneState> {
        self.last.as_ref()
    }

    /// SVG markup of the most recent frame.
    pub fn last_document(&self) -> Option<String> {
        let meta = self.meta.as_ref()?;
        let state = self.last.as_ref()?;
        Some(svg::render_document(state, meta).to_string())
    }
}

impl FrameSink for FrameCollector {
    fn begin(&mut self, meta: &SceneMeta) -> Result<(), Error> {
        *self = Self {
            meta: Some(meta.clone()),
            ..Self::default()
        };
        Ok(())
    }

    fn frame(&mut self, index: usize, state: &SceneState) -> Result<(), Error> {
        if self.meta.is_none() {
            return Err(Error::NotStarted(index));
        }
        self.frames += 1;
        self.last = Some(state.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.finished = true;
        Ok(())
    }
}

/// Errors that can occur while writing frames.
///
/// This type is converted into [`TableauError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`TableauError::Export`]: crate::TableauError::Export
#[derive(Debug)]
pub enum Error {
    /// A frame arrived before the sink was started.
    NotStarted(usize),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted(index) => write!(f, "frame {index} arrived before the sink was started"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotStarted(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_requires_begin() {
        let mut collector = FrameCollector::new();
        let err = collector.frame(3, &SceneState::default()).unwrap_err();
        assert_eq!(err.to_string(), "frame 3 arrived before the sink was started");
    }

    #[test]
    fn test_collector_resets_on_begin() {
        let mut collector = FrameCollector::new();
        let meta = SceneMeta::new("a", 30, 2, Viewport::default());
        collector.begin(&meta).unwrap();
        collector.frame(0, &SceneState::default()).unwrap();
        collector.finish().unwrap();
        assert_eq!(collector.frames(), 1);

        collector.begin(&meta).unwrap();
        assert_eq!(collector.frames(), 0);
        assert!(!collector.finished());
        assert!(collector.last_document().is_none());
    }
}
