//! Provides some helper functions.
use rayon::prelude::*;

use crate::{
    Sample,
    Classifier,
};

/// Returns the margin vector `y[i] * h(x[i])` of a single hypothesis.
///
/// Time complexity: `O(m)`, where `m` is the number of training examples.
#[inline(always)]
pub fn margins<'a, H>(sample: &'a Sample, h: &'a H)
    -> impl Iterator<Item = f64> + 'a
    where H: Classifier,
{
    let targets = sample.target();

    targets.iter()
        .enumerate()
        .map(|(i, y)| y * h.confidence(sample, i))
}

/// Compute the inner-product of the given two slices.
#[inline(always)]
pub fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.into_par_iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}

/// Normalize `items` so that its entries sum to `1` in absolute value.
#[inline(always)]
pub fn normalize(items: &mut [f64]) {
    let z = items.iter()
        .map(|it| it.abs())
        .sum::<f64>();

    assert_ne!(z, 0f64, "Tried to normalize an all-zero vector");

    items.par_iter_mut()
        .for_each(|item| { *item /= z; });
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_inner_product() {
        let v1 = vec![1.0, 2.0, 3.0];
        let v2 = vec![0.5, 0.0, -1.0];
        let result = inner_product(&v1[..], &v2[..]);
        let expect = -2.5;
        assert!(
            (result - expect).abs() < TEST_TOLERANCE,
            "expected {expect}, got {result}",
        );
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![1.0, 3.0, 4.0];
        normalize(&mut v[..]);
        let sum = v.iter().sum::<f64>();
        assert!(
            (sum - 1f64).abs() < TEST_TOLERANCE,
            "expected a sum of 1, got {sum}",
        );
        assert!((v[0] - 0.125).abs() < TEST_TOLERANCE);
    }

    #[test]
    #[should_panic]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0];
        normalize(&mut v[..]);
    }
}
