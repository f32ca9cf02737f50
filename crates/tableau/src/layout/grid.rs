//! Pillar rows and row-shifted pillar arrays.

use log::trace;

use tableau_core::geometry::{Bounds, Point};

use crate::TableauError;

/// Centers of `count` pillars in a single horizontal row.
///
/// Adjacent centers are `spacing` apart and the row is centered on the
/// origin. `radius` only takes part in validation; it is the size of the
/// pillars the centers will carry.
///
/// # Errors
///
/// Returns [`TableauError::Configuration`] for a zero count or a spacing or
/// radius that is not positive.
///
/// ```
/// # use tableau::layout::generate_grid;
/// let row = generate_grid(10, 0.75, 0.3).unwrap();
/// assert_eq!(row.len(), 10);
/// assert!((row[9].x() - row[0].x() - 6.75).abs() < 1e-5);
/// ```
pub fn generate_grid(count: usize, spacing: f32, radius: f32) -> Result<Vec<Point>, TableauError> {
    if count == 0 {
        return Err(TableauError::configuration("a pillar row needs at least one pillar"));
    }
    check_positive("spacing", spacing)?;
    check_positive("radius", radius)?;

    let start = -((count - 1) as f32) * spacing / 2.0;
    Ok((0..count)
        .map(|i| Point::new(start + i as f32 * spacing, 0.0))
        .collect())
}

fn check_positive(name: &str, value: f32) -> Result<(), TableauError> {
    if value.is_nan() || value <= 0.0 {
        return Err(TableauError::configuration(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Parameters of a [`PillarArray`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArraySpec {
    columns: usize,
    rows: usize,
    spacing_x: f32,
    spacing_y: f32,
    radius: f32,
    /// Horizontal offset of each row relative to the previous one, as a
    /// fraction of `spacing_x`.
    row_shift: f32,
}

impl ArraySpec {
    /// Square lattice without row shift.
    pub fn new(columns: usize, rows: usize, spacing: f32, radius: f32) -> Self {
        Self {
            columns,
            rows,
            spacing_x: spacing,
            spacing_y: spacing,
            radius,
            row_shift: 0.0,
        }
    }

    pub fn with_vertical_spacing(mut self, spacing_y: f32) -> Self {
        self.spacing_y = spacing_y;
        self
    }

    pub fn with_row_shift(mut self, row_shift: f32) -> Self {
        self.row_shift = row_shift;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn spacing_x(&self) -> f32 {
        self.spacing_x
    }

    pub fn spacing_y(&self) -> f32 {
        self.spacing_y
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn row_shift(&self) -> f32 {
        self.row_shift
    }
}

/// Rows of pillars stacked downward, each shifted sideways by a fixed
/// fraction of the pillar spacing relative to the row above.
///
/// The first row is centered horizontally and the whole stack is centered
/// vertically on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarArray {
    spec: ArraySpec,
    rows: Vec<Vec<Point>>,
}

impl PillarArray {
    /// Lays out the array.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] for zero rows or columns, or a
    /// spacing or radius that is not positive.
    pub fn new(spec: ArraySpec) -> Result<Self, TableauError> {
        if spec.rows == 0 {
            return Err(TableauError::configuration("a pillar array needs at least one row"));
        }
        check_positive("vertical spacing", spec.spacing_y)?;
        if !spec.row_shift.is_finite() {
            return Err(TableauError::configuration(format!(
                "row shift must be finite, got {}",
                spec.row_shift
            )));
        }

        let base = generate_grid(spec.columns, spec.spacing_x, spec.radius)?;
        let top = (spec.rows - 1) as f32 * spec.spacing_y / 2.0;
        let rows = (0..spec.rows)
            .map(|row| {
                let offset = Point::new(
                    row as f32 * spec.row_shift * spec.spacing_x,
                    top - row as f32 * spec.spacing_y,
                );
                base.iter().map(|center| center.add_point(offset)).collect()
            })
            .collect();

        trace!(columns = spec.columns, rows = spec.rows, row_shift = spec.row_shift; "Pillar array laid out");
        Ok(Self { spec, rows })
    }

    pub fn spec(&self) -> &ArraySpec {
        &self.spec
    }

    pub fn radius(&self) -> f32 {
        self.spec.radius
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Vec<Point>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Point]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn pillar(&self, row: usize, column: usize) -> Option<Point> {
        self.rows.get(row)?.get(column).copied()
    }

    /// Vertical position of a row.
    pub fn row_y(&self, row: usize) -> Option<f32> {
        self.pillar(row, 0).map(Point::y)
    }

    /// Midpoint of the gap between pillars `gate` and `gate + 1` of `row`.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] when the row does not exist or
    /// the row has no gap with that index.
    pub fn gap_center(&self, row: usize, gate: usize) -> Result<Point, TableauError> {
        let pillars = self.row(row).ok_or_else(|| {
            TableauError::configuration(format!(
                "row {row} is outside an array of {} rows",
                self.rows.len()
            ))
        })?;
        match (pillars.get(gate), pillars.get(gate + 1)) {
            (Some(left), Some(right)) => Ok(left.midpoint(*right)),
            _ => Err(TableauError::configuration(format!(
                "gate {gate} is outside row {row}, which has {} gaps",
                pillars.len().saturating_sub(1)
            ))),
        }
    }

    /// Every pillar center, row by row.
    pub fn centers(&self) -> impl Iterator<Item = Point> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Extent of the array including the pillar outlines.
    pub fn bounds(&self) -> Bounds {
        let centers: Vec<Point> = self.centers().collect();
        Bounds::from_points(&centers)
            .unwrap_or_default()
            .expand(self.spec.radius)
    }

    /// The same array moved by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|center| center.add_point(offset)).collect())
            .collect();
        Self {
            spec: self.spec,
            rows,
        }
    }

    /// The same array with a different row shift fraction.
    ///
    /// # Errors
    ///
    /// Returns [`TableauError::Configuration`] for a non-finite fraction.
    pub fn shifted(&self, row_shift: f32) -> Result<Self, TableauError> {
        Self::new(self.spec.with_row_shift(row_shift))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_generate_grid_matches_reference_row() {
        let row = generate_grid(10, 0.75, 0.3).unwrap();
        assert_eq!(row.len(), 10);
        assert_approx_eq!(f32, row[0].x(), -3.375, epsilon = 1e-5);
        assert_approx_eq!(f32, row[9].x(), 3.375, epsilon = 1e-5);
    }

    #[test]
    fn test_generate_grid_single_pillar_at_origin() {
        let row = generate_grid(1, 2.0, 0.5).unwrap();
        assert_eq!(row, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_generate_grid_rejects_bad_parameters() {
        assert!(matches!(
            generate_grid(0, 1.0, 0.3),
            Err(TableauError::Configuration(_))
        ));
        assert!(generate_grid(4, 0.0, 0.3).is_err());
        assert!(generate_grid(4, 1.0, -0.3).is_err());
        assert!(generate_grid(4, f32::NAN, 0.3).is_err());
    }

    #[test]
    fn test_array_rows_shift_cumulatively() {
        let array = PillarArray::new(ArraySpec::new(4, 3, 2.0, 0.4).with_row_shift(0.25)).unwrap();
        assert_eq!(array.rows().len(), 3);

        let first = array.pillar(0, 0).unwrap();
        let third = array.pillar(2, 0).unwrap();
        assert_approx_eq!(f32, third.x() - first.x(), 1.0);
        assert_approx_eq!(f32, first.y(), 2.0);
        assert_approx_eq!(f32, third.y(), -2.0);
    }

    #[test]
    fn test_gap_center() {
        let array = PillarArray::new(ArraySpec::new(3, 3, 1.0, 0.2)).unwrap();
        let gap = array.gap_center(1, 1).unwrap();
        assert_approx_eq!(f32, gap.x(), 0.5);
        assert_approx_eq!(f32, gap.y(), 0.0);

        assert!(array.gap_center(1, 2).is_err());
        assert!(array.gap_center(3, 0).is_err());
    }

    #[test]
    fn test_bounds_include_radius() {
        let array = PillarArray::new(ArraySpec::new(2, 2, 1.0, 0.25)).unwrap();
        let bounds = array.bounds();
        assert_approx_eq!(f32, bounds.width(), 1.5);
        assert_approx_eq!(f32, bounds.top(), 0.75);
    }

    #[test]
    fn test_shifted_keeps_first_row() {
        let array = PillarArray::new(ArraySpec::new(3, 2, 1.0, 0.2)).unwrap();
        let shifted = array.shifted(0.2).unwrap();
        assert_eq!(array.row(0), shifted.row(0));
        assert_approx_eq!(
            f32,
            shifted.pillar(1, 0).unwrap().x() - array.pillar(1, 0).unwrap().x(),
            0.2,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_translated_moves_bounds() {
        let array = PillarArray::new(ArraySpec::new(3, 2, 1.0, 0.2)).unwrap();
        let moved = array.translated(Point::new(0.0, 2.0));
        assert_approx_eq!(f32, moved.bounds().top(), array.bounds().top() + 2.0);
        assert_eq!(moved.spec(), array.spec());
    }

    proptest! {
        #[test]
        fn prop_grid_is_centered_and_evenly_spaced(
            count in 1usize..40,
            spacing in 0.05f32..5.0,
        ) {
            let row = generate_grid(count, spacing, spacing / 4.0).unwrap();
            prop_assert_eq!(row.len(), count);

            let centroid = row.iter().map(|p| p.x()).sum::<f32>() / count as f32;
            prop_assert!(centroid.abs() < 1e-3);

            for pair in row.windows(2) {
                prop_assert!((pair[0].distance(pair[1]) - spacing).abs() < 1e-3);
            }
        }
    }
}
