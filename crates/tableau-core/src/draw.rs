//! Drawable figures and their SVG rendering.
//!
//! Scene content lives in scene units: the origin sits at the centre of the
//! frame and `+y` points up. A [`Viewport`] maps those units onto the pixel
//! grid of an output frame (where `+y` points down). Every drawable renders
//! into a [`LayeredOutput`] so z-ordering is decided by [`RenderLayer`] rather
//! than insertion order.
mod figure;
mod graphic;
mod layer;
mod shape;
mod stroke;
mod text;

pub use figure::Figure;
pub use graphic::{Graphic, GraphicError};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shape::{ArrowHeads, ArrowShape, Shape};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle, Style};
pub use text::{Text, TextDefinition};

use crate::geometry::{Bounds, Point, Size};

pub trait Drawable: std::fmt::Debug {
    fn render_to_layers(&self, viewport: &Viewport) -> LayeredOutput;
    fn bounds(&self) -> Bounds;
}

/// Camera mapping scene units onto output pixels.
///
/// The visible frame is `frame_height` units tall; its width follows the
/// pixel aspect ratio.
///
/// ```
/// # use tableau_core::{draw::Viewport, geometry::Point};
/// let viewport = Viewport::new(1280, 720, 8.0);
/// assert_eq!(viewport.to_pixels(Point::new(0.0, 0.0)), (640.0, 360.0));
/// assert_eq!(viewport.to_pixels(Point::new(0.0, 4.0)), (640.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pixel_width: u32,
    pixel_height: u32,
    frame_height: f32,
}

impl Viewport {
    pub fn new(pixel_width: u32, pixel_height: u32, frame_height: f32) -> Self {
        Self {
            pixel_width,
            pixel_height,
            frame_height,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    pub fn frame_height(&self) -> f32 {
        self.frame_height
    }

    /// Visible frame width in scene units.
    pub fn frame_width(&self) -> f32 {
        self.frame_height * self.pixel_width as f32 / self.pixel_height as f32
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixel_height as f32 / self.frame_height
    }

    /// Converts a scene point into pixel coordinates.
    pub fn to_pixels(&self, point: Point) -> (f32, f32) {
        let ppu = self.pixels_per_unit();
        (
            self.pixel_width as f32 / 2.0 + point.x() * ppu,
            self.pixel_height as f32 / 2.0 - point.y() * ppu,
        )
    }

    /// Converts a scene offset into a pixel offset relative to a figure's
    /// own origin (no frame centring).
    pub fn to_local_pixels(&self, offset: Point) -> (f32, f32) {
        let ppu = self.pixels_per_unit();
        // `+ 0.0` turns a negative zero into zero for cleaner markup.
        (offset.x() * ppu + 0.0, -offset.y() * ppu + 0.0)
    }

    pub fn scale_length(&self, length: f32) -> f32 {
        length * self.pixels_per_unit()
    }

    /// The visible region in scene units.
    pub fn frame_bounds(&self) -> Bounds {
        Bounds::new_from_center(
            Point::default(),
            Size::new(self.frame_width(), self.frame_height),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 8.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_viewport_flips_y() {
        let viewport = Viewport::default();
        let (x, y) = viewport.to_pixels(Point::new(1.0, -1.0));
        assert_approx_eq!(f32, x, 730.0);
        assert_approx_eq!(f32, y, 450.0);
    }

    #[test]
    fn test_viewport_frame_bounds() {
        let viewport = Viewport::new(1920, 1080, 8.0);
        let bounds = viewport.frame_bounds();
        assert_approx_eq!(f32, bounds.width(), 8.0 * 16.0 / 9.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.top(), 4.0);
        assert_approx_eq!(f32, bounds.bottom(), -4.0);
    }

    #[test]
    fn test_viewport_scale_length() {
        let viewport = Viewport::new(1280, 720, 8.0);
        assert_approx_eq!(f32, viewport.pixels_per_unit(), 90.0);
        assert_approx_eq!(f32, viewport.scale_length(0.5), 45.0);

        let (dx, dy) = viewport.to_local_pixels(Point::new(0.5, 0.5));
        assert_approx_eq!(f32, dx, 45.0);
        assert_approx_eq!(f32, dy, -45.0);
    }
}
