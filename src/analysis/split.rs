//! This file provides the deterministic train/test split
//! and the accuracy measure used by the analyzer.

use rand::prelude::*;


/// Split the row indices `0..n_sample` into a train and a test
/// partition. The indices are shuffled by a generator seeded with
/// `seed`; the first `ceil(test_ratio * n_sample)` shuffled indices
/// form the test partition and the rest the train partition.
///
/// The outcome depends only on `(n_sample, test_ratio, seed)`,
/// so every split over data of the same shape lands on the same
/// row indices. The test partition always keeps at least one row
/// on each side.
///
/// # Example
/// ```
/// use accidata::analysis::split_indices;
///
/// let (train, test) = split_indices(10, 0.3, 42);
/// assert_eq!(train.len(), 7);
/// assert_eq!(test.len(), 3);
///
/// // Same shape, same seed: same split.
/// assert_eq!(split_indices(10, 0.3, 42), (train, test));
/// ```
#[inline]
pub fn split_indices(
    n_sample: usize,
    test_ratio: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>)
{
    if n_sample == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut ix = (0..n_sample).collect::<Vec<_>>();
    let mut rng = StdRng::seed_from_u64(seed);
    ix.shuffle(&mut rng);

    let test_size = ((test_ratio * n_sample as f64).ceil() as usize)
        .clamp(1, n_sample.saturating_sub(1).max(1));

    let train = ix.split_off(test_size);
    (train, ix)
}


/// The fraction of predictions matching the true labels,
/// in `[0, 1]`. Both slices must have the same length.
#[inline]
pub fn accuracy_score(truth: &[i64], predictions: &[i64]) -> f64 {
    assert_eq!(
        truth.len(),
        predictions.len(),
        "Accuracy needs one prediction per true label",
    );

    let hits = truth.iter()
        .zip(predictions)
        .filter(|(y, p)| y == p)
        .count();

    hits as f64 / truth.len() as f64
}
