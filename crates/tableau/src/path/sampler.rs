//! Gate routing and streamline sampling.

use std::f32::consts::FRAC_PI_4;

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use tableau_core::geometry::Point;

use super::FlowPath;
use crate::{TableauError, layout::PillarArray};

/// Vertical clearance between the array outline and a path's end points.
const DEFAULT_MARGIN: f32 = 0.5;

/// Share of a gap's free width that jittered gate points may use.
const GATE_CLEARANCE: f32 = 0.9;

/// How far streamlines extend past the outermost pillars on either side.
const STREAMLINE_OVERHANG: f32 = 0.5;

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    t.mul_add(to - from, from)
}

/// Bounded random perturbation of a path's midline.
///
/// The random source is owned by the jitter and injected at construction,
/// so two jitters built from the same seed produce the same paths.
#[derive(Debug, Clone)]
pub struct Jitter {
    rng: StdRng,
    amplitude: f32,
    sway: f32,
    resolution: usize,
}

impl Jitter {
    /// * `amplitude` - largest random offset of a single point.
    /// * `sway` - amplitude of the slow alternating wave along streamlines.
    /// * `resolution` - number of control points per streamline, end points
    ///   included.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] when `amplitude` or `sway` is
    /// not finite.
    pub fn new(rng: StdRng, amplitude: f32, sway: f32, resolution: usize) -> Result<Self, TableauError> {
        if !amplitude.is_finite() || !sway.is_finite() {
            return Err(TableauError::configuration(format!(
                "jitter needs finite amplitudes, got amplitude {amplitude} and sway {sway}"
            )));
        }
        Ok(Self {
            rng,
            amplitude: amplitude.abs(),
            sway,
            resolution: resolution.max(2),
        })
    }

    /// # Errors
    ///
    /// See [`Jitter::new`].
    pub fn seeded(seed: u64, amplitude: f32, sway: f32, resolution: usize) -> Result<Self, TableauError> {
        Self::new(StdRng::seed_from_u64(seed), amplitude, sway, resolution)
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// The underlying random source, for decisions that must come from the
    /// same seeded stream (how many particles ride a streamline).
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    fn noise(&mut self) -> f32 {
        if self.amplitude > 0.0 {
            self.rng.random_range(-self.amplitude..=self.amplitude)
        } else {
            0.0
        }
    }

    /// Wave offset of the `step`-th interior point. Even steps bend one way,
    /// odd steps the other.
    fn sway_at(&self, step: usize) -> f32 {
        let wave = self.sway * (step as f32 * FRAC_PI_4).sin();
        if step % 2 == 0 { wave } else { -wave }
    }
}

/// How the sampler places points between the fixed ends of a path.
#[derive(Debug, Clone)]
pub enum PathPolicy {
    /// Points sit exactly on the gate midpoints.
    Deterministic,
    /// Points are perturbed sideways by a seeded [`Jitter`]. Gate points
    /// never move closer to a pillar than its radius.
    Stochastic(Jitter),
}

impl PathPolicy {
    fn noise(&mut self) -> f32 {
        match self {
            Self::Deterministic => 0.0,
            Self::Stochastic(jitter) => jitter.noise(),
        }
    }
}

/// Produces [`FlowPath`]s over a pillar array.
///
/// Every path starts `margin` above the array outline and ends `margin`
/// below it. Lateral perturbations only ever move points sideways, so paths
/// keep travelling strictly downward whatever the policy.
#[derive(Debug, Clone, Copy)]
pub struct PathSampler<'a> {
    array: &'a PillarArray,
    margin: f32,
    lateral_offset: f32,
}

impl<'a> PathSampler<'a> {
    pub fn new(array: &'a PillarArray) -> Self {
        Self {
            array,
            margin: DEFAULT_MARGIN,
            lateral_offset: 0.0,
        }
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Shifts routed paths sideways, e.g. to run two lanes through the same
    /// gap side by side.
    pub fn with_lateral_offset(mut self, offset: f32) -> Self {
        self.lateral_offset = offset;
        self
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn lateral_offset(&self) -> f32 {
        self.lateral_offset
    }

    fn check_margin(&self) -> Result<(), TableauError> {
        if self.margin.is_nan() || self.margin <= 0.0 {
            return Err(TableauError::configuration(format!(
                "path margin must be positive, got {}",
                self.margin
            )));
        }
        Ok(())
    }

    /// Routes a path through one gap per row, `gates[row]` naming the gap
    /// between pillars `gate` and `gate + 1` of that row.
    ///
    /// The path starts above the first gate, passes each gate in order and
    /// ends below the array, continuing the sideways drift between the last
    /// two points. Start and end stay fixed under either policy; a
    /// stochastic policy only perturbs the gate points.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] when `gates` is empty, names
    /// more rows than the array has, or names a gap that does not exist.
    ///
    /// ```
    /// # use tableau::{layout::{ArraySpec, PillarArray}, path::{PathPolicy, PathSampler}};
    /// let array = PillarArray::new(ArraySpec::new(3, 3, 1.0, 0.2)).unwrap();
    /// let path = PathSampler::new(&array)
    ///     .sample(&[1, 1, 0], &mut PathPolicy::Deterministic)
    ///     .unwrap();
    /// assert_eq!(path.points().len(), 5);
    /// ```
    pub fn sample(&self, gates: &[usize], policy: &mut PathPolicy) -> Result<FlowPath, TableauError> {
        self.check_margin()?;
        let rows = self.array.rows().len();
        if gates.is_empty() || gates.len() > rows {
            return Err(TableauError::configuration(format!(
                "expected between 1 and {rows} gates, got {}",
                gates.len()
            )));
        }

        let shift = Point::new(self.lateral_offset, 0.0);
        let gate_points = gates
            .iter()
            .enumerate()
            .map(|(row, &gate)| Ok(self.array.gap_center(row, gate)?.add_point(shift)))
            .collect::<Result<Vec<_>, TableauError>>()?;

        let bounds = self.array.bounds();
        let (first, last) = match (gate_points.first(), gate_points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(TableauError::configuration("no gate points")),
        };
        let start = Point::new(first.x(), bounds.top() + self.margin);
        let previous = gate_points
            .len()
            .checked_sub(2)
            .map_or(start, |index| gate_points[index]);
        let end = Point::new(
            last.x() + (last.x() - previous.x()),
            bounds.bottom() - self.margin,
        );

        // Sideways room left in a gap once the routed point clears both
        // neighbouring pillars.
        let spec = self.array.spec();
        let clearance = (spec.spacing_x() / 2.0 - spec.radius()) * GATE_CLEARANCE;
        let mut points = Vec::with_capacity(gate_points.len() + 2);
        points.push(start);
        for point in gate_points {
            let noise = policy.noise();
            if noise == 0.0 {
                points.push(point);
                continue;
            }
            let lower = (-clearance - self.lateral_offset).min(0.0);
            let upper = (clearance - self.lateral_offset).max(0.0);
            points.push(point.add_point(Point::new(noise.clamp(lower, upper), 0.0)));
        }
        points.push(end);

        debug!(gates:? = gates, points = points.len(); "Sampled gate path");
        FlowPath::new(points)
    }

    /// A vertical streamline at `x` from above the array to below it.
    ///
    /// A deterministic policy yields a straight two-point path. A stochastic
    /// policy adds `resolution - 2` evenly spaced interior points that sway
    /// alternately left and right and carry bounded random jitter.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] for a non-positive margin.
    pub fn streamline(&self, x: f32, policy: &mut PathPolicy) -> Result<FlowPath, TableauError> {
        self.check_margin()?;
        let bounds = self.array.bounds();
        let start = Point::new(x, bounds.top() + self.margin);
        let end = Point::new(x, bounds.bottom() - self.margin);

        let mut points = vec![start];
        if let PathPolicy::Stochastic(jitter) = policy {
            let last = jitter.resolution - 1;
            for step in 1..last {
                let y = lerp(start.y(), end.y(), step as f32 / last as f32);
                let offset = jitter.sway_at(step) + jitter.noise();
                points.push(Point::new(x + offset, y));
            }
        }
        points.push(end);

        FlowPath::new(points)
    }

    /// `count` streamlines evenly spread across the array, overhanging the
    /// outermost pillars slightly on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] for a zero count or a
    /// non-positive margin.
    pub fn streamlines(
        &self,
        count: usize,
        policy: &mut PathPolicy,
    ) -> Result<Vec<FlowPath>, TableauError> {
        if count == 0 {
            return Err(TableauError::configuration("at least one streamline is required"));
        }
        let bounds = self.array.bounds();
        let left = bounds.left() - STREAMLINE_OVERHANG;
        let right = bounds.right() + STREAMLINE_OVERHANG;

        let paths = (0..count)
            .map(|i| {
                let x = if count == 1 {
                    (left + right) / 2.0
                } else {
                    lerp(left, right, i as f32 / (count - 1) as f32)
                };
                self.streamline(x, policy)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = paths.len(); "Sampled streamlines");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::layout::ArraySpec;

    fn lattice() -> PillarArray {
        PillarArray::new(ArraySpec::new(3, 3, 1.0, 0.2)).unwrap()
    }

    fn is_descending(path: &FlowPath) -> bool {
        path.points().windows(2).all(|pair| pair[1].y() < pair[0].y())
    }

    #[test]
    fn test_gate_points_sit_on_gap_midpoints() {
        let array = lattice();
        let path = PathSampler::new(&array)
            .sample(&[1, 1, 0], &mut PathPolicy::Deterministic)
            .unwrap();
        let points = path.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[1], array.gap_center(0, 1).unwrap());
        assert_eq!(points[2], array.gap_center(1, 1).unwrap());
        assert_eq!(points[3], array.gap_center(2, 0).unwrap());
        assert!(is_descending(&path));
    }

    #[test]
    fn test_end_continues_last_drift() {
        let array = lattice();
        let path = PathSampler::new(&array)
            .sample(&[1, 1, 0], &mut PathPolicy::Deterministic)
            .unwrap();
        assert_approx_eq!(f32, path.end().x(), -1.5);
        assert_approx_eq!(f32, path.end().y(), -1.7);
        assert_approx_eq!(f32, path.start().y(), 1.7);
    }

    #[test]
    fn test_single_gate_runs_straight() {
        let array = lattice();
        let path = PathSampler::new(&array)
            .sample(&[0], &mut PathPolicy::Deterministic)
            .unwrap();
        assert_eq!(path.points().len(), 3);
        assert_approx_eq!(f32, path.start().x(), path.end().x());
    }

    #[test]
    fn test_lateral_offset() {
        let array = lattice();
        let path = PathSampler::new(&array)
            .with_lateral_offset(-0.25)
            .sample(&[0, 0], &mut PathPolicy::Deterministic)
            .unwrap();
        assert_approx_eq!(f32, path.points()[1].x(), -0.75);
    }

    #[test]
    fn test_sample_rejects_bad_gates() {
        let array = lattice();
        let sampler = PathSampler::new(&array);
        let policy = &mut PathPolicy::Deterministic;
        assert!(sampler.sample(&[], policy).is_err());
        assert!(sampler.sample(&[0, 0, 0, 0], policy).is_err());
        assert!(sampler.sample(&[2], policy).is_err());
        assert!(sampler.with_margin(0.0).sample(&[0], policy).is_err());
    }

    #[test]
    fn test_deterministic_streamline_is_straight() {
        let array = lattice();
        let path = PathSampler::new(&array)
            .streamline(0.3, &mut PathPolicy::Deterministic)
            .unwrap();
        assert_eq!(path.points().len(), 2);
    }

    #[test]
    fn test_seeded_streamlines_repeat() {
        let array = lattice();
        let sampler = PathSampler::new(&array).with_margin(1.5);
        let mut first = PathPolicy::Stochastic(Jitter::seeded(42, 0.05, 0.15, 12).unwrap());
        let mut second = PathPolicy::Stochastic(Jitter::seeded(42, 0.05, 0.15, 12).unwrap());
        assert_eq!(
            sampler.streamlines(15, &mut first).unwrap(),
            sampler.streamlines(15, &mut second).unwrap()
        );
    }

    #[test]
    fn test_streamlines_span_array() {
        let array = lattice();
        let paths = PathSampler::new(&array)
            .streamlines(5, &mut PathPolicy::Deterministic)
            .unwrap();
        assert_eq!(paths.len(), 5);
        assert_approx_eq!(f32, paths[0].start().x(), -1.7);
        assert_approx_eq!(f32, paths[4].start().x(), 1.7);
        assert!(
            PathSampler::new(&array)
                .streamlines(0, &mut PathPolicy::Deterministic)
                .is_err()
        );
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let array = lattice();
        let mut policy = PathPolicy::Stochastic(Jitter::seeded(3, 0.1, 0.0, 20).unwrap());
        let path = PathSampler::new(&array).streamline(0.0, &mut policy).unwrap();
        assert_eq!(path.points().len(), 20);
        assert!(path.points().iter().all(|p| p.x().abs() <= 0.1 + 1e-6));
    }

    #[test]
    fn test_jitter_rejects_unbounded_amplitude() {
        assert!(Jitter::seeded(1, f32::INFINITY, 0.15, 12).is_err());
        assert!(Jitter::seeded(1, f32::NAN, 0.15, 12).is_err());
        assert!(Jitter::seeded(1, 0.05, f32::NEG_INFINITY, 12).is_err());
        let jitter = Jitter::seeded(1, -0.05, 0.0, 0).unwrap();
        assert_approx_eq!(f32, jitter.amplitude(), 0.05);
        assert_eq!(jitter.resolution(), 2);
    }

    #[test]
    fn test_large_jitter_keeps_gate_points_in_gap() {
        let array = lattice();
        let mut policy = PathPolicy::Stochastic(Jitter::seeded(9, 5.0, 0.0, 12).unwrap());
        let path = PathSampler::new(&array).sample(&[0, 1, 0], &mut policy).unwrap();
        for (row, (point, gate)) in path.points()[1..4].iter().zip([0, 1, 0]).enumerate() {
            let center = array.gap_center(row, gate).unwrap();
            assert!((point.x() - center.x()).abs() < 0.5 - 0.2);
        }
    }

    proptest! {
        #[test]
        fn prop_gate_points_clear_pillars(
            seed in any::<u64>(),
            amplitude in 0.0f32..3.0,
            offset in -0.25f32..0.25,
            gates in proptest::collection::vec(0usize..2, 1..=3),
        ) {
            let array = lattice();
            let mut policy = PathPolicy::Stochastic(Jitter::seeded(seed, amplitude, 0.15, 12).unwrap());
            let path = PathSampler::new(&array)
                .with_lateral_offset(offset)
                .sample(&gates, &mut policy)
                .unwrap();
            let radius = array.radius();
            for (row, &gate) in gates.iter().enumerate() {
                let point = path.points()[row + 1];
                for column in [gate, gate + 1] {
                    let pillar = array.pillar(row, column).unwrap();
                    prop_assert!(point.distance(pillar) > radius);
                }
            }
        }

        #[test]
        fn prop_stochastic_paths_descend(
            seed in any::<u64>(),
            other in any::<u64>(),
            amplitude in 0.01f32..0.3,
        ) {
            let array = lattice();
            let sampler = PathSampler::new(&array);
            let mut policy = PathPolicy::Stochastic(Jitter::seeded(seed, amplitude, 0.15, 12).unwrap());
            let path = sampler.sample(&[1, 1, 0], &mut policy).unwrap();
            prop_assert_eq!(path.points().len(), 5);
            prop_assert!(is_descending(&path));

            let line = sampler.streamline(0.0, &mut policy).unwrap();
            prop_assert_eq!(line.points().len(), 12);
            prop_assert!(is_descending(&line));

            prop_assume!(seed != other);
            let mut a = PathPolicy::Stochastic(Jitter::seeded(seed, amplitude, 0.15, 12).unwrap());
            let mut b = PathPolicy::Stochastic(Jitter::seeded(other, amplitude, 0.15, 12).unwrap());
            prop_assert_ne!(
                sampler.streamline(0.0, &mut a).unwrap(),
                sampler.streamline(0.0, &mut b).unwrap()
            );
        }
    }
}
