//! Flow paths through pillar arrays.
//!
//! A [`FlowPath`] is an immutable list of control points travelling strictly
//! downward. Paths come from a [`PathSampler`], either routed through chosen
//! gaps of a [`PillarArray`](crate::layout::PillarArray) or as free
//! streamlines across it, and are smoothed into a [`SmoothCurve`] before a
//! particle rides them.

mod particles;
mod sampler;

pub use particles::{Particle, seed_particles};
pub use sampler::{Jitter, PathPolicy, PathSampler};

use tableau_core::{curve::SmoothCurve, geometry::Point};

use crate::TableauError;

/// Control points of a downward path together with the smooth curve through
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPath {
    points: Vec<Point>,
    curve: SmoothCurve,
}

impl FlowPath {
    /// Validates and smooths `points`.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] when there are fewer than two
    /// points, a coordinate is not finite, or y does not strictly decrease
    /// from one point to the next.
    ///
    /// ```
    /// # use tableau::path::FlowPath;
    /// # use tableau_core::geometry::Point;
    /// let path = FlowPath::new(vec![Point::new(0.0, 1.0), Point::new(0.5, -1.0)]).unwrap();
    /// assert_eq!(path.end(), Point::new(0.5, -1.0));
    ///
    /// assert!(FlowPath::new(vec![Point::new(0.0, -1.0), Point::new(0.0, 1.0)]).is_err());
    /// ```
    pub fn new(points: Vec<Point>) -> Result<Self, TableauError> {
        if let Some(bad) = points
            .iter()
            .find(|point| !point.x().is_finite() || !point.y().is_finite())
        {
            return Err(TableauError::configuration(format!(
                "flow path point {bad:?} is not finite"
            )));
        }
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[1].y() >= pair[0].y())
        {
            return Err(TableauError::configuration(format!(
                "flow path must travel downward, but point {} is not below point {index}",
                index + 1
            )));
        }
        let curve = SmoothCurve::new(points.clone())
            .map_err(|err| TableauError::configuration(format!("invalid flow path: {err}")))?;
        Ok(Self { points, curve })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> Point {
        self.curve.start()
    }

    pub fn end(&self) -> Point {
        self.curve.end()
    }

    /// Smooth curve through the control points.
    pub fn smooth(&self) -> &SmoothCurve {
        &self.curve
    }

    /// Control points strictly below `y`, in travel order.
    ///
    /// Used to splice another trajectory onto this path once it has dropped
    /// past a given row.
    pub fn tail_below(&self, y: f32) -> Vec<Point> {
        self.points
            .iter()
            .copied()
            .filter(|point| point.y() < y)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_paths() {
        assert!(FlowPath::new(vec![]).is_err());
        assert!(FlowPath::new(vec![Point::new(0.0, 1.0)]).is_err());
    }

    #[test]
    fn test_rejects_flat_segment() {
        let err = FlowPath::new(vec![
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("point 2"));
    }

    #[test]
    fn test_rejects_nan() {
        assert!(FlowPath::new(vec![Point::new(f32::NAN, 1.0), Point::new(0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_tail_below() {
        let path = FlowPath::new(vec![
            Point::new(0.0, 3.0),
            Point::new(0.2, 1.0),
            Point::new(0.4, -1.0),
            Point::new(0.6, -3.0),
        ])
        .unwrap();
        assert_eq!(
            path.tail_below(1.0),
            vec![Point::new(0.4, -1.0), Point::new(0.6, -3.0)]
        );
        assert!(path.tail_below(-5.0).is_empty());
    }

    #[test]
    fn test_smooth_curve_passes_through_points() {
        let points = vec![Point::new(0.0, 2.0), Point::new(1.0, 0.0), Point::new(0.0, -2.0)];
        let path = FlowPath::new(points.clone()).unwrap();
        assert_eq!(path.smooth().points(), points.as_slice());
        assert_eq!(path.start(), points[0]);
    }
}
