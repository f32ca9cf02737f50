//! Smooth curves through control points.
//!
//! A [`SmoothCurve`] passes through every control point and joins them with
//! cubic Bézier segments whose tangents follow the Catmull-Rom construction.
//! Particles travel along curves by arc length, so each curve carries a
//! lookup table mapping distance travelled to segment parameters.
//!
//! Tangent handles are clamped to the vertical range of their segment, so a
//! curve through points with strictly decreasing y never swings back up
//! between two control points.

use thiserror::Error;

use crate::geometry::{Bounds, Point};

/// Number of samples per segment used to build the arc-length table.
const SAMPLES_PER_SEGMENT: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("a curve needs at least two control points, got {0}")]
    TooFewPoints(usize),
}

/// One cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicSegment {
    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x() + b * self.control1.x() + c * self.control2.x() + d * self.end.x(),
            a * self.start.y() + b * self.control1.y() + c * self.control2.y() + d * self.end.y(),
        )
    }
}

/// A smooth curve through an ordered list of control points.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothCurve {
    points: Vec<Point>,
    segments: Vec<CubicSegment>,
    /// Cumulative length at each sample; `SAMPLES_PER_SEGMENT` samples per
    /// segment plus the starting zero.
    lengths: Vec<f32>,
}

impl SmoothCurve {
    /// Builds the curve through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::TooFewPoints`] when fewer than two points are given.
    ///
    /// ```
    /// # use tableau_core::{curve::SmoothCurve, geometry::Point};
    /// let curve = SmoothCurve::new(vec![
    ///     Point::new(0.0, 2.0),
    ///     Point::new(0.5, 0.0),
    ///     Point::new(0.0, -2.0),
    /// ]).unwrap();
    /// assert_eq!(curve.segments().len(), 2);
    /// assert_eq!(curve.point_at(0.0), Point::new(0.0, 2.0));
    /// ```
    pub fn new(points: Vec<Point>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }

        let segments = catmull_rom_segments(&points);
        let lengths = arc_length_table(&segments);

        Ok(Self {
            points,
            segments,
            lengths,
        })
    }

    /// The control points the curve passes through
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Total arc length (approximated by the sample table)
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or_default()
    }

    /// Point reached after travelling `fraction` of the total arc length.
    /// `fraction` is clamped to `[0, 1]`.
    pub fn point_at(&self, fraction: f32) -> Point {
        let fraction = fraction.clamp(0.0, 1.0);
        let total = self.length();
        if total <= f32::EPSILON {
            return self.start();
        }
        if fraction >= 1.0 {
            return self.end();
        }

        let target = fraction * total;
        // Index of the first sample whose cumulative length reaches the target.
        let upper = self
            .lengths
            .partition_point(|&len| len < target)
            .clamp(1, self.lengths.len() - 1);
        let lower = upper - 1;
        let span = self.lengths[upper] - self.lengths[lower];
        let local = if span <= f32::EPSILON {
            0.0
        } else {
            (target - self.lengths[lower]) / span
        };

        let sample = lower as f32 + local;
        let segment_idx = ((sample / SAMPLES_PER_SEGMENT as f32) as usize).min(self.segments.len() - 1);
        let t = sample / SAMPLES_PER_SEGMENT as f32 - segment_idx as f32;
        self.segments[segment_idx].eval(t.clamp(0.0, 1.0))
    }

    /// `count` points evenly spaced by arc length, including both ends.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start()],
            _ => (0..count)
                .map(|i| self.point_at(i as f32 / (count - 1) as f32))
                .collect(),
        }
    }

    /// Bounds of the control polygon (segment handles included), which
    /// contain the whole curve.
    pub fn bounds(&self) -> Bounds {
        let hull: Vec<Point> = self
            .segments
            .iter()
            .flat_map(|s| [s.start, s.control1, s.control2, s.end])
            .collect();
        Bounds::from_points(&hull).unwrap_or_default()
    }

    /// Applies `f` to every control point and rebuilds the curve.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let points: Vec<Point> = self.points.iter().map(|&p| f(p)).collect();
        let segments = catmull_rom_segments(&points);
        let lengths = arc_length_table(&segments);
        Self {
            points,
            segments,
            lengths,
        }
    }
}

fn catmull_rom_segments(points: &[Point]) -> Vec<CubicSegment> {
    let last = points.len() - 1;
    (0..last)
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let start = points[i];
            let end = points[i + 1];
            let next = points[(i + 2).min(last)];

            let control1 = start.add_point(end.sub_point(prev).scale(1.0 / 6.0));
            let control2 = end.sub_point(next.sub_point(start).scale(1.0 / 6.0));
            let (control1, control2) = clamp_handles(start, end, control1, control2);

            CubicSegment {
                start,
                control1,
                control2,
                end,
            }
        })
        .collect()
}

/// Keeps the handles' y inside the segment's vertical range and in order, so
/// the segment stays monotonic in y whenever its endpoints differ in y.
fn clamp_handles(start: Point, end: Point, c1: Point, c2: Point) -> (Point, Point) {
    let low = start.y().min(end.y());
    let high = start.y().max(end.y());
    let mut y1 = c1.y().clamp(low, high);
    let mut y2 = c2.y().clamp(low, high);

    let descending = end.y() < start.y();
    if (descending && y2 > y1) || (!descending && y2 < y1) {
        let mid = (y1 + y2) / 2.0;
        y1 = mid;
        y2 = mid;
    }

    (c1.with_y(y1), c2.with_y(y2))
}

fn arc_length_table(segments: &[CubicSegment]) -> Vec<f32> {
    let mut lengths = Vec::with_capacity(segments.len() * SAMPLES_PER_SEGMENT + 1);
    lengths.push(0.0);

    let mut total = 0.0;
    for segment in segments {
        let mut previous = segment.start;
        for step in 1..=SAMPLES_PER_SEGMENT {
            let point = segment.eval(step as f32 / SAMPLES_PER_SEGMENT as f32);
            total += previous.distance(point);
            lengths.push(total);
            previous = point;
        }
    }

    lengths
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_curve_requires_two_points() {
        assert_eq!(
            SmoothCurve::new(vec![Point::default()]),
            Err(CurveError::TooFewPoints(1))
        );
    }

    #[test]
    fn test_straight_line_length() {
        let curve = SmoothCurve::new(vec![Point::new(0.0, 0.0), Point::new(0.0, -4.0)]).unwrap();
        assert_approx_eq!(f32, curve.length(), 4.0, epsilon = 1e-4);

        let quarter = curve.point_at(0.25);
        assert_approx_eq!(f32, quarter.x(), 0.0, epsilon = 1e-4);
        assert_approx_eq!(f32, quarter.y(), -1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_curve_passes_through_control_points() {
        let points = vec![
            Point::new(0.0, 3.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, -1.0),
            Point::new(0.0, -3.0),
        ];
        let curve = SmoothCurve::new(points.clone()).unwrap();

        for (segment, pair) in curve.segments().iter().zip(points.windows(2)) {
            assert_eq!(segment.start, pair[0]);
            assert_eq!(segment.end, pair[1]);
            assert_eq!(segment.eval(0.0), pair[0]);
        }
        assert_eq!(curve.point_at(1.0), Point::new(0.0, -3.0));
    }

    #[test]
    fn test_sample_counts() {
        let curve = SmoothCurve::new(vec![Point::new(0.0, 1.0), Point::new(0.0, -1.0)]).unwrap();
        assert!(curve.sample(0).is_empty());
        assert_eq!(curve.sample(1), vec![Point::new(0.0, 1.0)]);
        assert_eq!(curve.sample(5).len(), 5);
    }

    #[test]
    fn test_uneven_spacing_does_not_overshoot() {
        // A long drop followed by a tiny step used to push the handle below
        // the next control point.
        let curve = SmoothCurve::new(vec![
            Point::new(0.0, 100.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, -1.0),
        ])
        .unwrap();
        let samples = curve.sample(200);
        for pair in samples.windows(2) {
            assert!(pair[1].y() <= pair[0].y() + 1e-4);
        }
    }

    #[test]
    fn test_map_points_translates() {
        let curve = SmoothCurve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)]).unwrap();
        let moved = curve.map_points(|p| p.add_point(Point::new(2.0, 0.0)));
        assert_eq!(moved.start(), Point::new(2.0, 1.0));
        assert_approx_eq!(f32, moved.length(), curve.length(), epsilon = 1e-4);
    }

    proptest! {
        #[test]
        fn prop_descending_control_points_give_descending_curve(
            xs in proptest::collection::vec(-3.0f32..3.0, 2..10),
            steps in proptest::collection::vec(0.05f32..2.0, 10),
        ) {
            let mut y = 5.0;
            let points: Vec<Point> = xs
                .iter()
                .zip(steps.iter())
                .map(|(&x, &step)| {
                    y -= step;
                    Point::new(x, y)
                })
                .collect();
            let curve = SmoothCurve::new(points).unwrap();
            for segment in curve.segments() {
                let mut previous = segment.start.y();
                for i in 1..=50 {
                    let y = segment.eval(i as f32 / 50.0).y();
                    prop_assert!(y <= previous + 1e-4);
                    previous = y;
                }
            }
        }
    }
}
