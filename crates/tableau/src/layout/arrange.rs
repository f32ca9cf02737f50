//! Relative placement.
//!
//! These helpers compute where the center of an item of a known size must go
//! so that it sits beside another item, against a frame edge, or in a row or
//! column with its siblings. They never move anything themselves.

use tableau_core::geometry::{Bounds, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector pointing in this direction (`+y` is up).
    pub fn unit(self) -> Point {
        match self {
            Self::Up => Point::new(0.0, 1.0),
            Self::Down => Point::new(0.0, -1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Center for an item of `size` placed on the `direction` side of `anchor`,
/// `buff` units away from it and aligned with the anchor's center.
///
/// ```
/// # use tableau::layout::{Direction, next_to};
/// # use tableau_core::geometry::{Bounds, Point, Size};
/// let anchor = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(2.0, 2.0));
/// let label = next_to(anchor, Size::new(1.0, 0.5), Direction::Down, 0.2);
/// assert!((label.y() - -1.45).abs() < 1e-6);
/// ```
pub fn next_to(anchor: Bounds, size: Size, direction: Direction, buff: f32) -> Point {
    let center = anchor.center();
    match direction {
        Direction::Up => center.with_y(anchor.top() + buff + size.height() / 2.0),
        Direction::Down => center.with_y(anchor.bottom() - buff - size.height() / 2.0),
        Direction::Left => center.with_x(anchor.left() - buff - size.width() / 2.0),
        Direction::Right => center.with_x(anchor.right() + buff + size.width() / 2.0),
    }
}

/// Moves an item flush against one edge of `frame`, keeping its other
/// coordinate.
pub fn to_edge(frame: Bounds, item: Bounds, direction: Direction, buff: f32) -> Point {
    let center = item.center();
    let size = item.to_size();
    match direction {
        Direction::Up => center.with_y(frame.top() - buff - size.height() / 2.0),
        Direction::Down => center.with_y(frame.bottom() + buff + size.height() / 2.0),
        Direction::Left => center.with_x(frame.left() + buff + size.width() / 2.0),
        Direction::Right => center.with_x(frame.right() - buff - size.width() / 2.0),
    }
}

/// Center for an item of `size` tucked into the corner of `frame` named by
/// a vertical and a horizontal direction.
pub fn to_corner(
    frame: Bounds,
    size: Size,
    vertical: Direction,
    horizontal: Direction,
    buff: f32,
) -> Point {
    let item = Bounds::new_from_center(Point::default(), size);
    let y = to_edge(frame, item, vertical, buff).y();
    let x = to_edge(frame, item, horizontal, buff).x();
    Point::new(x, y)
}

/// Centers for items laid out one after another in `direction`, `buff`
/// apart, with the whole group centered on the origin.
///
/// Items are centered on the cross axis.
pub fn arrange(sizes: &[Size], direction: Direction, buff: f32) -> Vec<Point> {
    let extent = |size: &Size| {
        if direction.is_vertical() {
            size.height()
        } else {
            size.width()
        }
    };
    let total = sizes.iter().map(extent).sum::<f32>()
        + buff * sizes.len().saturating_sub(1) as f32;

    let unit = direction.unit();
    let mut cursor = -total / 2.0;
    sizes
        .iter()
        .map(|size| {
            let middle = cursor + extent(size) / 2.0;
            cursor += extent(size) + buff;
            unit.scale(middle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn frame() -> Bounds {
        Bounds::new_from_center(Point::default(), Size::new(14.0, 8.0))
    }

    #[test]
    fn test_next_to_each_side() {
        let anchor = Bounds::new_from_center(Point::new(1.0, 1.0), Size::new(2.0, 2.0));
        let size = Size::new(1.0, 1.0);
        assert_eq!(next_to(anchor, size, Direction::Up, 0.5), Point::new(1.0, 3.0));
        assert_eq!(next_to(anchor, size, Direction::Right, 0.5), Point::new(3.0, 1.0));
        assert_eq!(next_to(anchor, size, Direction::Left, 0.0), Point::new(-0.5, 1.0));
    }

    #[test]
    fn test_to_edge_keeps_other_axis() {
        let item = Bounds::new_from_center(Point::new(2.0, 0.0), Size::new(1.0, 0.5));
        let top = to_edge(frame(), item, Direction::Up, 0.5);
        assert_approx_eq!(f32, top.x(), 2.0);
        assert_approx_eq!(f32, top.y(), 3.25);

        let bottom = to_edge(frame(), item, Direction::Down, 0.85);
        assert_approx_eq!(f32, bottom.y(), -2.9);
    }

    #[test]
    fn test_to_corner() {
        let corner = to_corner(
            frame(),
            Size::new(2.0, 1.0),
            Direction::Up,
            Direction::Right,
            0.5,
        );
        assert_eq!(corner, Point::new(5.5, 3.0));
    }

    #[test]
    fn test_arrange_horizontal_is_centered() {
        let sizes = [Size::new(1.0, 1.0), Size::new(2.0, 1.0), Size::new(1.0, 3.0)];
        let centers = arrange(&sizes, Direction::Right, 1.0);
        assert_approx_eq!(f32, centers[0].x(), -2.5);
        assert_approx_eq!(f32, centers[1].x(), 0.0);
        assert_approx_eq!(f32, centers[2].x(), 2.5);
        assert!(centers.iter().all(|c| c.y() == 0.0));
    }

    #[test]
    fn test_arrange_down_starts_at_top() {
        let sizes = [Size::new(1.0, 1.0), Size::new(1.0, 1.0)];
        let centers = arrange(&sizes, Direction::Down, 0.3);
        assert_approx_eq!(f32, centers[0].y(), 0.65);
        assert_approx_eq!(f32, centers[1].y(), -0.65);
    }

    #[test]
    fn test_arrange_empty() {
        assert!(arrange(&[], Direction::Right, 1.0).is_empty());
    }
}
