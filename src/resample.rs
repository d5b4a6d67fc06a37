//! Converts a weight vector into a duplicated or resampled training table.
//!
//! All policies take a sample, a normalized weight vector, and a
//! multiplier `p`, and return a table of approximately `N * p` rows.
//! A row of weight `0` never appears in the output of any policy.
use rand::prelude::*;
use rand::distributions::WeightedIndex;

use crate::Sample;
use crate::tools::checkers;

/// Per-row duplicate counts of the deterministic policy:
/// `count[i] = round(weight[i] * N * p)`.
/// The total may deviate from `N * p` by rounding error;
/// this is accepted, not corrected.
pub fn deterministic_counts(weights: &[f64], p: f64) -> Vec<usize> {
    checkers::non_negative(weights);
    let n_sample = weights.len() as f64;

    weights.iter()
        .map(|w| (w * n_sample * p).round() as usize)
        .collect()
}

/// Per-row duplicate counts of the stochastic (fractional) policy:
/// `count[i] = floor(weight[i] * N * p) + Bernoulli(fractional part)`.
/// An unbiased per-row estimator of the deterministic target
/// with integral counts.
pub fn stochastic_counts<R: Rng>(weights: &[f64], p: f64, rng: &mut R)
    -> Vec<usize>
{
    checkers::non_negative(weights);
    let n_sample = weights.len() as f64;

    weights.iter()
        .map(|w| {
            let scaled = w * n_sample * p;
            let deterministic = scaled.floor();
            let stochastic = rng.gen_bool(scaled - deterministic) as usize;
            deterministic as usize + stochastic
        })
        .collect()
}

/// Build the duplicated table where row `i` appears `counts[i]` times,
/// in row order.
pub fn duplicate(sample: &Sample, counts: &[usize]) -> Sample {
    let n_sample = sample.shape().0;
    assert_eq!(
        n_sample, counts.len(),
        "count vector length {} does not match the sample size {n_sample}",
        counts.len(),
    );

    let ix = counts.iter()
        .enumerate()
        .flat_map(|(i, &c)| std::iter::repeat(i).take(c))
        .collect::<Vec<_>>();
    sample.select_rows(ix)
}

/// Deterministic duplication: `round(weight[i] * N * p)` copies of row `i`.
pub fn deterministic(sample: &Sample, weights: &[f64], p: f64) -> Sample {
    checkers::aligned(sample.shape().0, weights);
    let counts = deterministic_counts(weights, p);
    duplicate(sample, &counts[..])
}

/// Stochastic (fractional) duplication.
pub fn stochastic<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    p: f64,
    rng: &mut R,
) -> Sample
{
    checkers::aligned(sample.shape().0, weights);
    let counts = stochastic_counts(weights, p, rng);
    duplicate(sample, &counts[..])
}

/// Weighted-replacement sampling: draw exactly `round(N * p)` rows
/// with replacement, probability proportional to weight.
pub fn bootstrap<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    p: f64,
    rng: &mut R,
) -> Sample
{
    let n_sample = sample.shape().0;
    checkers::aligned(n_sample, weights);
    checkers::non_negative(weights);

    let n_draw = (n_sample as f64 * p).round() as usize;
    let index = WeightedIndex::new(weights)
        .unwrap_or_else(|e| {
            panic!("invalid bootstrap weights: {e}")
        });

    let ix = (0..n_draw)
        .map(|_| index.sample(rng))
        .collect::<Vec<_>>();
    sample.select_rows(ix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn test_sample() -> Sample {
        let csv = b"\
            feat,class\n\
            0.1,1.0\n\
            0.2,-1.0\n\
            0.3,1.0\n\
            0.4,-1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    #[test]
    fn test_deterministic_counts() {
        // N = 4, p = 1: scaled masses are [2, 1.2, 0.8, 0].
        let weights = vec![0.5, 0.3, 0.2, 0.0];
        let counts = deterministic_counts(&weights[..], 1.0);
        assert_eq!(counts, vec![2, 1, 1, 0]);
    }

    #[test]
    fn test_deterministic_uniform_identity() {
        let sample = test_sample();
        let weights = vec![0.25; 4];
        let dup = deterministic(&sample, &weights[..], 1.0);

        assert_eq!(dup.shape(), sample.shape());
        for i in 0..4 {
            assert_eq!(dup.at(i), sample.at(i));
        }
    }

    #[test]
    fn test_deterministic_single_heavy_row() {
        let sample = test_sample();
        let weights = vec![0.0, 1.0, 0.0, 0.0];
        let dup = deterministic(&sample, &weights[..], 1.0);

        assert_eq!(dup.shape().0, 4);
        for i in 0..4 {
            assert_eq!(dup.at(i), sample.at(1));
        }
    }

    #[test]
    fn test_stochastic_counts_bounds() {
        let mut rng = StdRng::seed_from_u64(777);
        let weights = vec![0.5, 0.3, 0.2, 0.0];
        let counts = stochastic_counts(&weights[..], 1.0, &mut rng);

        // floor(w*N*p) <= count <= floor(w*N*p) + 1, and 0 stays 0.
        assert_eq!(counts[0], 2);
        assert!((1..=2).contains(&counts[1]));
        assert!((0..=1).contains(&counts[2]));
        assert_eq!(counts[3], 0);
    }

    #[test]
    fn test_stochastic_counts_mean_converges() {
        let mut rng = StdRng::seed_from_u64(777);
        let weights = vec![0.5, 0.3, 0.2, 0.0];

        let n_trial = 10_000;
        let mut total = vec![0usize; 4];
        for _ in 0..n_trial {
            let counts = stochastic_counts(&weights[..], 1.0, &mut rng);
            for (t, c) in total.iter_mut().zip(counts) {
                *t += c;
            }
        }

        // E[count[1]] = 1.2 over repeated draws.
        let mean = total[1] as f64 / n_trial as f64;
        assert!(
            (mean - 1.2).abs() < 0.02,
            "expected a mean close to 1.2, got {mean}",
        );
    }

    #[test]
    fn test_bootstrap_draw_count() {
        let sample = test_sample();
        let mut rng = StdRng::seed_from_u64(777);
        let weights = vec![0.25; 4];
        let dup = bootstrap(&sample, &weights[..], 2.5, &mut rng);

        assert_eq!(dup.shape().0, 10);
    }

    #[test]
    fn test_bootstrap_skips_zero_weight() {
        let sample = test_sample();
        let mut rng = StdRng::seed_from_u64(777);
        let weights = vec![0.5, 0.0, 0.5, 0.0];
        let dup = bootstrap(&sample, &weights[..], 10.0, &mut rng);

        let (x1, _) = sample.at(1);
        let (x3, _) = sample.at(3);
        for i in 0..dup.shape().0 {
            let (x, _) = dup.at(i);
            assert_ne!(x, x1, "a zero-weight row was drawn");
            assert_ne!(x, x3, "a zero-weight row was drawn");
        }
    }

    #[test]
    fn test_duplicate_total() {
        let sample = test_sample();
        let counts = vec![3, 0, 1, 2];
        let dup = duplicate(&sample, &counts[..]);
        assert_eq!(dup.shape().0, 6);
        // Row order: repeats are emitted in the original row order.
        assert_eq!(dup.at(0), sample.at(0));
        assert_eq!(dup.at(2), sample.at(0));
        assert_eq!(dup.at(3), sample.at(2));
        assert_eq!(dup.at(5), sample.at(3));
    }
}
