//! Vector artwork loaded from SVG documents.
//!
//! A [`Graphic`] keeps the inner markup of an SVG document together with its
//! view box, and is drawn as a nested `<svg>` element scaled to a display
//! height in scene units. Parsing walks the document with the `svg` crate's
//! event reader and rejects empty documents, documents without an `<svg>`
//! root and unbalanced markup.

use std::collections::HashMap;

use svg::{
    node::{Blob, Value, element as svg_element, element::tag::Type},
    parser::Event,
};
use thiserror::Error;

use crate::{draw::Viewport, geometry::Size};

#[derive(Debug, Error, PartialEq)]
pub enum GraphicError {
    #[error("the document is empty")]
    Empty,

    #[error("malformed markup: {0}")]
    Malformed(String),

    #[error("the document has no <svg> root element")]
    MissingRoot,

    #[error("element <{0}> is not closed properly")]
    Unbalanced(String),

    #[error("cannot determine the artwork size from viewBox or width/height")]
    MissingSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    content: String,
    view_box: [f32; 4],
    height: f32,
}

impl Graphic {
    /// Parses an SVG document.
    ///
    /// The display height defaults to one scene unit; see [`Graphic::with_height`].
    ///
    /// ```
    /// # use tableau_core::draw::Graphic;
    /// let graphic = Graphic::parse(
    ///     r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 10"><circle r="4"/></svg>"#,
    /// ).unwrap();
    /// assert_eq!(graphic.size().width(), 2.0);
    ///
    /// assert!(Graphic::parse("").is_err());
    /// assert!(Graphic::parse("<svg><g></svg>").is_err());
    /// ```
    pub fn parse(markup: &str) -> Result<Self, GraphicError> {
        if markup.trim().is_empty() {
            return Err(GraphicError::Empty);
        }

        let parser = svg::read(markup).map_err(|err| GraphicError::Malformed(err.to_string()))?;

        let mut open: Vec<String> = Vec::new();
        let mut root: Option<HashMap<String, Value>> = None;
        for event in parser {
            match event {
                Event::Error(err) => return Err(GraphicError::Malformed(err.to_string())),
                Event::Tag(name, kind, attributes) => {
                    if root.is_none() {
                        if name != "svg" {
                            return Err(GraphicError::MissingRoot);
                        }
                        root = Some(attributes.clone());
                    }
                    match kind {
                        Type::Start => open.push(name.to_string()),
                        Type::End => match open.pop() {
                            Some(expected) if expected == name => {}
                            Some(expected) => return Err(GraphicError::Unbalanced(expected)),
                            None => return Err(GraphicError::Unbalanced(name.to_string())),
                        },
                        Type::Empty => {}
                    }
                }
                _ => {}
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(GraphicError::Unbalanced(unclosed));
        }
        let attributes = root.ok_or(GraphicError::MissingRoot)?;
        let view_box = view_box(&attributes).ok_or(GraphicError::MissingSize)?;

        Ok(Self {
            content: inner_markup(markup).to_string(),
            view_box,
            height: 1.0,
        })
    }

    /// Sets the display height in scene units; the width follows the
    /// artwork's aspect ratio.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Display size in scene units.
    pub fn size(&self) -> Size {
        let [_, _, width, height] = self.view_box;
        Size::new(self.height * width / height, self.height)
    }

    pub(crate) fn render_local(&self, viewport: &Viewport, opacity: f32) -> svg_element::Group {
        let size = self.size();
        let width = viewport.scale_length(size.width());
        let height = viewport.scale_length(size.height());
        let [min_x, min_y, vb_width, vb_height] = self.view_box;

        let nested = svg_element::SVG::new()
            .set("x", -width / 2.0)
            .set("y", -height / 2.0)
            .set("width", width)
            .set("height", height)
            .set("viewBox", (min_x, min_y, vb_width, vb_height))
            .add(Blob::new(self.content.clone()));

        svg_element::Group::new().set("opacity", opacity).add(nested)
    }
}

/// `[min_x, min_y, width, height]` from the root's `viewBox`, falling back to
/// its `width`/`height` attributes.
fn view_box(attributes: &HashMap<String, Value>) -> Option<[f32; 4]> {
    if let Some(value) = attributes.get("viewBox") {
        let numbers: Vec<f32> = value
            .to_string()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        if let [min_x, min_y, width, height] = numbers[..] {
            return (width > 0.0 && height > 0.0).then_some([min_x, min_y, width, height]);
        }
        return None;
    }

    let length = |name: &str| -> Option<f32> {
        let raw = attributes.get(name)?.to_string();
        raw.trim().trim_end_matches("px").parse::<f32>().ok()
    };
    let width = length("width")?;
    let height = length("height")?;
    (width > 0.0 && height > 0.0).then_some([0.0, 0.0, width, height])
}

/// Markup between the root `<svg ...>` start tag and its closing tag.
fn inner_markup(markup: &str) -> &str {
    let Some(root) = markup.find("<svg") else {
        return "";
    };
    let Some(tag_end) = markup[root..].find('>').map(|idx| root + idx) else {
        return "";
    };
    if markup[..tag_end].ends_with('/') {
        return "";
    }
    let close = markup.rfind("</svg>").unwrap_or(markup.len());
    if close <= tag_end {
        return "";
    }
    markup[tag_end + 1..close].trim()
}
