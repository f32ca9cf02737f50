use std::f32::consts::TAU;

use tableau_core::geometry::Point;

/// Vertices of a regular `sides`-gon centered on the origin, counter-clockwise
/// starting at `start_angle` radians from the positive x axis.
///
/// ```
/// # use tableau::layout::regular_polygon;
/// let pentagon = regular_polygon(5, 2.4, 0.0);
/// assert_eq!(pentagon.len(), 5);
/// assert!((pentagon[0].x() - 2.4).abs() < 1e-6);
/// ```
pub fn regular_polygon(sides: usize, radius: f32, start_angle: f32) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = start_angle + TAU * i as f32 / sides as f32;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_vertices_on_circle() {
        for vertex in regular_polygon(7, 1.5, 0.3) {
            assert_approx_eq!(f32, vertex.hypot(), 1.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_edges_have_equal_length() {
        let square = regular_polygon(4, 1.0, 0.0);
        let side = square[0].distance(square[1]);
        assert_approx_eq!(f32, side, 2f32.sqrt(), epsilon = 1e-5);
        assert_approx_eq!(f32, square[3].distance(square[0]), side, epsilon = 1e-5);
    }

    #[test]
    fn test_empty_polygon() {
        assert!(regular_polygon(0, 1.0, 0.0).is_empty());
    }
}
