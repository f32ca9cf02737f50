//! Text labels.
//!
//! Text is measured with `cosmic-text` so layouts (brackets around matrices,
//! labels placed next to figures) can reason about label extents. Font sizes
//! are expressed in scene units; measurement happens at a reference pixel
//! density and is converted back.
//!
//! ```
//! # use tableau_core::draw::{Text, TextDefinition};
//! let title = Text::new(TextDefinition::new().with_font_size(0.6), "PageRank");
//! let size = title.size();
//! assert!(size.width() > 0.0);
//! assert!(size.height() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::Viewport,
    geometry::Size,
};

/// Pixels per scene unit used while measuring (a 720p frame, 8 units tall).
const MEASURE_PIXELS_PER_UNIT: f32 = 90.0;

const LINE_SPACING: f32 = 1.2;

/// Font settings of a label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Color,
    italic: bool,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    /// Font size (em height) in scene units.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 0.5,
            color: Color::default(),
            italic: false,
        }
    }
}

/// A label: content plus font settings, centred on its local origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    definition: TextDefinition,
    content: String,
}

impl Text {
    pub fn new(definition: TextDefinition, content: impl Into<String>) -> Self {
        Self {
            definition,
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn definition(&self) -> &TextDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut TextDefinition {
        &mut self.definition
    }

    /// Extent of the label in scene units.
    pub fn size(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(&self.content, &self.definition)
    }

    /// Same label with the font size blended towards `other`. Only defined
    /// for identical content.
    pub fn interpolate(&self, other: &Text, t: f32) -> Option<Text> {
        if self.content != other.content {
            return None;
        }
        let mut definition = other.definition.clone();
        definition.font_size = t.mul_add(
            other.definition.font_size - self.definition.font_size,
            self.definition.font_size,
        );
        definition.color = self.definition.color.lerp(other.definition.color, t);
        Some(Text::new(definition, self.content.clone()))
    }

    /// Renders the label around the local origin. `reveal` below one writes
    /// only a prefix of the characters.
    pub(crate) fn render_local(
        &self,
        viewport: &Viewport,
        opacity: f32,
        reveal: f32,
    ) -> svg_element::Text {
        let visible = visible_prefix(&self.content, reveal);
        let lines: Vec<&str> = self.content.lines().collect();
        let font_px = viewport.scale_length(self.definition.font_size);
        let line_height = font_px * LINE_SPACING;
        let first_baseline = -(lines.len().saturating_sub(1) as f32) * line_height / 2.0;

        let mut rendered = svg_element::Text::new("")
            .set("x", 0)
            .set("y", first_baseline)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family.as_str())
            .set("font-size", font_px)
            .set("fill", self.definition.color.to_svg_value())
            .set("fill-opacity", self.definition.color.alpha() * opacity);
        if self.definition.italic {
            rendered = rendered.set("font-style", "italic");
        }

        let mut remaining = visible;
        for (idx, line) in lines.iter().enumerate() {
            let shown: String = line.chars().take(remaining).collect();
            remaining = remaining.saturating_sub(line.chars().count());
            let tspan = svg_element::TSpan::new("")
                .set("x", 0)
                .set("dy", if idx == 0 { 0.0 } else { line_height })
                .add(SvgText::new(shown));
            rendered = rendered.add(tspan);
        }

        rendered
    }
}

fn visible_prefix(content: &str, reveal: f32) -> usize {
    let total = content.lines().map(|line| line.chars().count()).sum::<usize>();
    (total as f32 * reveal.clamp(0.0, 1.0)).round() as usize
}

/// Text measurement with a shared `FontSystem`, which is expensive to build.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` in scene units. Falls back to an average glyph width
    /// estimate when no font produced glyphs.
    fn calculate_text_size(&self, text: &str, definition: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let font_size_px = definition.font_size() * MEASURE_PIXELS_PER_UNIT;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_SPACING);
        let line_count = text.lines().count().max(1) as f32;

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let family = match definition.font_family() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let attrs = Attrs::new().family(family);
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
        }

        if max_width <= 0.0 {
            let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            max_width = longest as f32 * font_size_px * 0.55;
        }

        Size::new(
            max_width / MEASURE_PIXELS_PER_UNIT,
            line_count * metrics.line_height / MEASURE_PIXELS_PER_UNIT,
        )
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::color::palette;

    #[test]
    fn test_text_definition_builders() {
        let definition = TextDefinition::new()
            .with_font_family("serif")
            .with_font_size(0.8)
            .with_color(palette::yellow())
            .with_italic(true);
        assert_eq!(definition.font_family(), "serif");
        assert_approx_eq!(f32, definition.font_size(), 0.8);
        assert_eq!(definition.color(), palette::yellow());
        assert!(definition.is_italic());
    }

    #[test]
    fn test_text_size_empty() {
        let text = Text::new(TextDefinition::new(), "");
        assert!(text.size().is_zero());
    }

    #[test]
    fn test_text_size_multiline_is_taller() {
        let single = Text::new(TextDefinition::new(), "rbc");
        let multi = Text::new(TextDefinition::new(), "rbc\nwbc\nctc");
        assert!(multi.size().height() > single.size().height());
        assert_approx_eq!(
            f32,
            multi.size().height(),
            3.0 * single.size().height(),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_text_size_scales_with_font() {
        let small = Text::new(TextDefinition::new().with_font_size(0.25), "Deterministic");
        let large = Text::new(TextDefinition::new().with_font_size(0.5), "Deterministic");
        assert!(large.size().width() > small.size().width());
    }

    #[test]
    fn test_text_interpolate_requires_same_content() {
        let a = Text::new(TextDefinition::new().with_font_size(0.4), "λ");
        let b = Text::new(TextDefinition::new().with_font_size(0.8), "λ");
        let mid = a.interpolate(&b, 0.5).unwrap();
        assert_approx_eq!(f32, mid.definition().font_size(), 0.6);

        let other = Text::new(TextDefinition::new(), "Δλ");
        assert!(a.interpolate(&other, 0.5).is_none());
    }

    #[test]
    fn test_text_render_reveal_prefix() {
        let text = Text::new(TextDefinition::new(), "abcd");
        let viewport = Viewport::default();
        let half = text.render_local(&viewport, 1.0, 0.5).to_string();
        assert!(half.contains(">ab<"));
        let full = text.render_local(&viewport, 1.0, 1.0).to_string();
        assert!(full.contains(">abcd<"));
    }
}
