//! Geometric primitives for scene layout and motion.
//!
//! This module provides the fundamental geometric types used throughout
//! Tableau for positioning figures, measuring extents and moving things
//! around a scene.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or offset) in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box defined by its corners
//! - [`Placement`] - Position, uniform scale and rotation of a figure
//!
//! # Coordinate System
//!
//! Scene space is measured in abstract units with the origin at the centre
//! of the frame:
//!
//! ```text
//!            +Y
//!             ▲
//!             │
//!   ──────────┼──────────► +X
//!             │ (0,0)
//!             │
//! ```
//!
//! - **Origin**: Centre of the frame
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases upward
//!
//! The flip to the SVG pixel convention (Y downward) happens only in
//! [`Viewport`](crate::draw::Viewport).

/// A 2D point in scene coordinate space.
///
/// Points are also used as offsets (vectors); [`Point::add_point`] and
/// [`Point::sub_point`] perform the usual vector math.
///
/// # Examples
///
/// ```
/// # use tableau_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy of this point with a different x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns a copy of this point with a different y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Component-wise addition
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Component-wise subtraction
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Length of this point interpreted as a vector from the origin
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction, or zero for
    /// a zero-length vector.
    pub fn normalize(self) -> Self {
        let length = self.hypot();
        if length <= f32::EPSILON {
            Self::default()
        } else {
            self.scale(1.0 / length)
        }
    }

    /// Linear interpolation, `t = 0` yields `self` and `t = 1` yields `other`.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: t.mul_add(other.x - self.x, self.x),
            y: t.mul_add(other.y - self.y, self.y),
        }
    }

    /// Rotates this point counter-clockwise about `center` by `radians`.
    ///
    /// ```
    /// # use tableau_core::geometry::Point;
    /// let p = Point::new(1.0, 0.0).rotate_about(Point::default(), std::f32::consts::FRAC_PI_2);
    /// assert!(p.x().abs() < 1e-6);
    /// assert!((p.y() - 1.0).abs() < 1e-6);
    /// ```
    pub fn rotate_about(self, center: Point, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let offset = self.sub_point(center);
        Self {
            x: center.x + offset.x * cos - offset.y * sin,
            y: center.y + offset.x * sin + offset.y * cos,
        }
    }

    /// Returns the perpendicular vector (rotated 90° counter-clockwise)
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Bounds of the given size centered on this point
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Width and height dimensions in scene units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned bounding box in scene space.
///
/// `min_y` is the bottom edge and `max_y` the top edge since Y grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds of the given size centered on `center`
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty slice.
    ///
    /// ```
    /// # use tableau_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points(&[Point::new(-1.0, 2.0), Point::new(3.0, -4.0)]).unwrap();
    /// assert_eq!(bounds.width(), 4.0);
    /// assert_eq!(bounds.height(), 6.0);
    /// ```
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(rest.iter().fold(seed, |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Y-coordinate of the top edge
    pub fn top(self) -> f32 {
        self.max_y
    }

    /// Y-coordinate of the bottom edge
    pub fn bottom(self) -> f32 {
        self.min_y
    }

    /// X-coordinate of the left edge
    pub fn left(self) -> f32 {
        self.min_x
    }

    /// X-coordinate of the right edge
    pub fn right(self) -> f32 {
        self.max_x
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Smallest bounds containing both `self` and `other`
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Where and how a figure sits in the scene.
///
/// A figure's shape is described in local coordinates around `(0, 0)`;
/// [`Placement::apply`] maps local coordinates to scene space by scaling,
/// rotating (counter-clockwise, radians) and finally translating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    position: Point,
    scale: f32,
    rotation: f32,
}

impl Placement {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Maps a local point into scene space
    pub fn apply(&self, local: Point) -> Point {
        local
            .scale(self.scale)
            .rotate_about(Point::default(), self.rotation)
            .add_point(self.position)
    }

    /// Interpolates every component linearly
    pub fn lerp(&self, other: &Placement, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            scale: t.mul_add(other.scale - self.scale, self.scale),
            rotation: t.mul_add(other.rotation - self.rotation, self.rotation),
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Point::default(),
            scale: 1.0,
            rotation: 0.0,
        }
    }
}
