use tableau_core::geometry::Point;

/// Centers of the entries of a `rows` x `columns` matrix, row by row.
///
/// Neighbouring columns are `h_buff` apart and neighbouring rows `v_buff`
/// apart; the block of entries is centered on the origin.
pub fn matrix_cells(rows: usize, columns: usize, h_buff: f32, v_buff: f32) -> Vec<Vec<Point>> {
    let half_width = columns.saturating_sub(1) as f32 / 2.0;
    let half_height = rows.saturating_sub(1) as f32 / 2.0;
    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| {
                    Point::new(
                        (column as f32 - half_width) * h_buff,
                        (half_height - row as f32) * v_buff,
                    )
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_cells_are_centered() {
        let cells = matrix_cells(5, 5, 1.5, 1.0);
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[2][2], Point::new(0.0, 0.0));
        assert_approx_eq!(f32, cells[0][0].x(), -3.0);
        assert_approx_eq!(f32, cells[0][0].y(), 2.0);
        assert_approx_eq!(f32, cells[4][4].y(), -2.0);
    }

    #[test]
    fn test_single_row() {
        let cells = matrix_cells(1, 2, 2.0, 1.0);
        assert_eq!(cells, vec![vec![Point::new(-1.0, 0.0), Point::new(1.0, 0.0)]]);
    }
}
