//! Stroke and fill styling.
//!
//! [`StrokeDefinition`] follows SVG stroke semantics (color, width, dash
//! pattern, caps and joins). Widths are in output pixels and do not grow when
//! a figure is scaled, matching how presentation animations keep outlines
//! crisp while shapes zoom. [`Style`] pairs an optional stroke with an
//! optional fill.
//!
//! ```
//! use tableau_core::{color::palette, draw::{StrokeDefinition, Style}};
//!
//! let pillar = Style::filled(palette::grey());
//! let lane = Style::stroked(StrokeDefinition::dashed(palette::yellow(), 3.0));
//! assert!(pillar.stroke().is_none());
//! assert!(lane.fill().is_none());
//! ```

use std::str::FromStr;

use crate::color::Color;

/// Dash pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// 8px dash, 6px gap
    Dashed,
    /// 2px dot, 4px gap
    Dotted,
    /// Raw SVG dasharray, e.g. `"10,5,2,5"`
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Ok(Self::Custom(s.to_string())),
        }
    }
}

impl StrokeStyle {
    /// SVG `stroke-dasharray` value, `None` for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8,6".to_string()),
            Self::Dotted => Some("2,4".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl StrokeCap {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke for outlines, lines and curves.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Solid stroke with round caps and joins.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn dotted(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dotted)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    /// Blends color and width; pattern, cap and join switch at the midpoint.
    pub fn lerp(&self, other: &StrokeDefinition, t: f32) -> Self {
        let discrete = if t < 0.5 { self } else { other };
        Self {
            color: self.color.lerp(other.color, t),
            width: t.mul_add(other.width - self.width, self.width),
            style: discrete.style.clone(),
            cap: discrete.cap,
            join: discrete.join,
        }
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 4.0)
    }
}

/// Paint of a figure: optional outline plus optional fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    stroke: Option<StrokeDefinition>,
    fill: Option<Color>,
}

impl Style {
    pub fn new(stroke: Option<StrokeDefinition>, fill: Option<Color>) -> Self {
        Self { stroke, fill }
    }

    pub fn stroked(stroke: StrokeDefinition) -> Self {
        Self::new(Some(stroke), None)
    }

    pub fn filled(fill: Color) -> Self {
        Self::new(None, Some(fill))
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn without_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    /// Replaces every color (stroke and fill) with `color`, keeping widths
    /// and patterns.
    pub fn recolored(&self, color: Color) -> Self {
        Self {
            stroke: self.stroke.clone().map(|mut stroke| {
                stroke.set_color(color);
                stroke
            }),
            fill: self.fill.map(|_| color),
        }
    }

    /// Blends two styles. A paint present on one side only fades in or out
    /// through transparency.
    pub fn lerp(&self, other: &Style, t: f32) -> Self {
        let stroke = match (&self.stroke, &other.stroke) {
            (Some(from), Some(to)) => Some(from.lerp(to, t)),
            (Some(from), None) => {
                let mut faded = from.clone();
                faded.set_color(from.color().with_alpha(from.color().alpha() * (1.0 - t)));
                Some(faded)
            }
            (None, Some(to)) => {
                let mut faded = to.clone();
                faded.set_color(to.color().with_alpha(to.color().alpha() * t));
                Some(faded)
            }
            (None, None) => None,
        };
        let fill = match (self.fill, other.fill) {
            (Some(from), Some(to)) => Some(from.lerp(to, t)),
            (Some(from), None) => Some(from.with_alpha(from.alpha() * (1.0 - t))),
            (None, Some(to)) => Some(to.with_alpha(to.alpha() * t)),
            (None, None) => None,
        };
        Self { stroke, fill }
    }
}

/// Applies a stroke to an SVG element, scaling its opacity by the given
/// figure opacity.
///
/// ```
/// use tableau_core::{color::palette, draw::StrokeDefinition};
/// use svg::node::element::Line;
///
/// let stroke = StrokeDefinition::dashed(palette::blue(), 2.0);
/// let line = tableau_core::apply_stroke!(Line::new(), &stroke, 0.5);
/// assert!(line.to_string().contains("stroke-dasharray"));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr, $opacity:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_svg_value())
            .set("stroke-opacity", $stroke.color().alpha() * $opacity)
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value())
            .set("vector-effect", "non-scaling-stroke");

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
