//! Layout and path sampling through the public API.

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use tableau::{
    layout::{ArraySpec, PillarArray, generate_grid},
    path::{PathPolicy, PathSampler},
};

#[test]
fn test_row_of_ten_spans_nine_pitches() {
    let row = generate_grid(10, 0.75, 0.3).unwrap();
    assert_approx_eq!(f32, row[9].x() - row[0].x(), 6.75, epsilon = 1e-5);
    assert_approx_eq!(f32, row[0].x() + row[9].x(), 0.0, epsilon = 1e-5);
}

#[test]
fn test_three_row_sample_has_entry_gates_and_exit() {
    let array = PillarArray::new(ArraySpec::new(3, 3, 1.0, 0.2)).unwrap();
    let path = PathSampler::new(&array)
        .sample(&[1, 1, 0], &mut PathPolicy::Deterministic)
        .unwrap();
    assert_eq!(path.points().len(), 5);
    assert!(path.start().y() > array.bounds().top());
    assert!(path.end().y() < array.bounds().bottom());
}

proptest! {
    #[test]
    fn prop_streamlines_travel_down(seed in 0u64..500, x in -1.0f32..1.0) {
        let array = PillarArray::new(ArraySpec::new(4, 4, 1.2, 0.3).with_row_shift(0.2)).unwrap();
        let mut policy = PathPolicy::Stochastic(tableau::path::Jitter::seeded(seed, 0.05, 0.15, 12).unwrap());
        let path = PathSampler::new(&array).streamline(x, &mut policy).unwrap();
        for pair in path.points().windows(2) {
            prop_assert!(pair[1].y() < pair[0].y());
        }
    }
}
