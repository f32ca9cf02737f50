//! Color handling for Tableau scenes
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and the [`palette`] of named presentation colors the
//! built-in scenes draw with.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#ff0000"`,
    /// `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tableau_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Create an opaque color from 8-bit sRGB channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_srgb([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ])
    }

    fn from_srgb(components: [f32; 4]) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::new(components)),
        }
    }

    fn srgb_components(self) -> [f32; 4] {
        self.color.to_alpha_color::<Srgb>().components
    }

    /// Creates a new color with the specified alpha value (0.0 transparent,
    /// 1.0 opaque).
    ///
    /// ```
    /// use tableau_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// assert_eq!(red.with_alpha(0.5).alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Blends towards `other` in sRGB space; used when a figure is recolored
    /// during a transform.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let from = self.srgb_components();
        let to = other.srgb_components();
        let mut mixed = [0.0; 4];
        for (channel, value) in mixed.iter_mut().enumerate() {
            *value = t.mul_add(to[channel] - from[channel], from[channel]);
        }
        Self::from_srgb(mixed)
    }

    /// Returns the `#rrggbb` form used for SVG paint attributes. Opacity is
    /// emitted separately through the `*-opacity` attributes.
    ///
    /// ```
    /// use tableau_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_svg_value(), "#ff0000");
    /// ```
    pub fn to_svg_value(self) -> String {
        let [r, g, b, _] = self.srgb_components();
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("white").expect("'white' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_svg_value())
    }
}

/// The presentation palette used by the built-in scenes.
///
/// Scenes are drawn light-on-dark, so the palette favours saturated pastel
/// tones that read well on a black background.
pub mod palette {
    use super::Color;

    pub fn white() -> Color {
        Color::from_rgb8(0xFF, 0xFF, 0xFF)
    }

    pub fn black() -> Color {
        Color::from_rgb8(0x00, 0x00, 0x00)
    }

    pub fn grey() -> Color {
        Color::from_rgb8(0x88, 0x88, 0x88)
    }

    pub fn blue() -> Color {
        Color::from_rgb8(0x58, 0xC4, 0xDD)
    }

    pub fn teal() -> Color {
        Color::from_rgb8(0x5C, 0xD0, 0xB3)
    }

    pub fn green() -> Color {
        Color::from_rgb8(0x83, 0xC1, 0x67)
    }

    /// Light green
    pub fn green_a() -> Color {
        Color::from_rgb8(0xC9, 0xE2, 0xAE)
    }

    /// Dark green
    pub fn green_e() -> Color {
        Color::from_rgb8(0x69, 0x9C, 0x52)
    }

    pub fn yellow() -> Color {
        Color::from_rgb8(0xFF, 0xFF, 0x00)
    }

    pub fn gold_a() -> Color {
        Color::from_rgb8(0xF7, 0xC7, 0x97)
    }

    pub fn gold_b() -> Color {
        Color::from_rgb8(0xF9, 0xB7, 0x75)
    }

    pub fn red() -> Color {
        Color::from_rgb8(0xFC, 0x62, 0x55)
    }

    pub fn pink() -> Color {
        Color::from_rgb8(0xD1, 0x47, 0xBD)
    }

    pub fn purple() -> Color {
        Color::from_rgb8(0x9A, 0x72, 0xAC)
    }

    /// Light purple
    pub fn purple_a() -> Color {
        Color::from_rgb8(0xCA, 0xA3, 0xE8)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default_is_white() {
        assert_eq!(Color::default().to_svg_value(), "#ffffff");
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert_approx_eq!(f32, transparent.alpha(), 0.5, epsilon = 0.001);
    }

    #[test]
    fn test_color_svg_value_from_rgb8() {
        assert_eq!(palette::blue().to_svg_value(), "#58c4dd");
        assert_eq!(palette::black().to_svg_value(), "#000000");
    }

    #[test]
    fn test_color_lerp_midpoint() {
        let mid = palette::black().lerp(palette::white(), 0.5);
        assert_eq!(mid.to_svg_value(), "#808080");
        assert_approx_eq!(f32, mid.alpha(), 1.0);
    }

    #[test]
    fn test_color_lerp_endpoints() {
        let from = palette::red();
        let to = palette::yellow();
        assert_eq!(from.lerp(to, 0.0).to_svg_value(), from.to_svg_value());
        assert_eq!(from.lerp(to, 1.0).to_svg_value(), to.to_svg_value());
    }

    #[test]
    fn test_color_eq_hash() {
        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
