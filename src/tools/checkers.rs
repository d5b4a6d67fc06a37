//! This file defines some functions that check pre-conditions,
//! e.g., shape of data and weight-vector validity.

use crate::Sample;
use crate::constants::SIMPLEX_TOLERANCE;

/// Check whether the training sample is valid or not.
#[inline(always)]
pub fn sample(sample: &Sample) {
    let (n_examples, n_feature) = sample.shape();

    assert!(n_examples > 0, "The sample has no rows");
    assert!(n_feature > 0, "The sample has no features");
}

/// Check that `weights` has one entry per row of `n_sample`.
#[inline(always)]
pub fn aligned(n_sample: usize, weights: &[f64]) {
    assert_eq!(
        n_sample, weights.len(),
        "weight vector length {} does not match the sample size {n_sample}",
        weights.len(),
    );
}

/// Check that `weights` is a non-negative vector.
#[inline(always)]
pub fn non_negative(weights: &[f64]) {
    assert!(
        weights.iter().all(|w| *w >= 0f64),
        "weights must be non-negative. weights = {weights:?}"
    );
}

/// Check that `dist` is a probability vector
/// (non-negative entries whose sum is `1`).
#[inline(always)]
pub fn distribution(dist: &[f64]) {
    non_negative(dist);
    let sum = dist.iter().sum::<f64>();
    assert!(
        (sum - 1f64).abs() < SIMPLEX_TOLERANCE,
        "sum(dist[..]) = {sum}, expected 1",
    );
}
