//! Per-row weight sampling.
use rand::prelude::*;
use rand_distr::{Exp, Gamma};

use crate::constants::GAMMA_SCALE;

/// A distribution from which one weight per training row is drawn.
/// The caller normalizes the drawn vector before use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightScheme {
    /// I.i.d. exponential weights with the given rate.
    Exponential {
        /// Rate parameter of the exponential distribution.
        rate: f64,
    },
    /// `weight_a` on a fixed fraction of rows, `weight_b` on the rest,
    /// with the assignment permuted uniformly across rows.
    Binary {
        /// The fraction of rows receiving `weight_a`.
        split: f64,
        /// The weight of the first group.
        weight_a: f64,
        /// The weight of the second group.
        weight_b: f64,
    },
}

impl WeightScheme {
    /// Exponential weights with rate `rate`.
    pub fn exponential(rate: f64) -> Self {
        assert!(
            rate > 0f64,
            "the exponential rate must be positive. got {rate}",
        );
        Self::Exponential { rate, }
    }

    /// A two-valued weighting: `round(split * N)` rows get `weight_a`,
    /// the rest get `weight_b`, shuffled across rows.
    pub fn binary(split: f64, weight_a: f64, weight_b: f64) -> Self {
        assert!(
            (0f64..=1f64).contains(&split),
            "the split fraction must be in [0, 1]. got {split}",
        );
        assert!(
            weight_a >= 0f64 && weight_b >= 0f64,
            "weights must be non-negative. got ({weight_a}, {weight_b})",
        );
        Self::Binary { split, weight_a, weight_b, }
    }

    /// Draw one weight per row.
    pub fn draw<R: Rng>(&self, n_sample: usize, rng: &mut R) -> Vec<f64> {
        match *self {
            Self::Exponential { rate } => {
                let exp = Exp::new(rate)
                    .expect("the exponential rate must be positive");
                (0..n_sample)
                    .map(|_| exp.sample(rng))
                    .collect()
            },
            Self::Binary { split, weight_a, weight_b } => {
                let n_a = (split * n_sample as f64).round() as usize;
                let n_a = n_a.min(n_sample);

                let mut weights = vec![weight_a; n_a];
                weights.extend(vec![weight_b; n_sample - n_a]);
                weights.shuffle(rng);
                weights
            },
        }
    }
}

/// Correctness-driven gamma reweighting:
/// correctly predicted rows draw `Gamma(shape_correct, 0.25)`,
/// misclassified rows draw `Gamma(shape_wrong, 0.25)`.
pub fn gamma_by_correctness<R: Rng>(
    correct: &[bool],
    shape_correct: f64,
    shape_wrong: f64,
    rng: &mut R,
) -> Vec<f64>
{
    let right = Gamma::new(shape_correct, GAMMA_SCALE)
        .expect("gamma shape parameters must be positive");
    let wrong = Gamma::new(shape_wrong, GAMMA_SCALE)
        .expect("gamma shape parameters must be positive");

    correct.iter()
        .map(|c| {
            if *c { right.sample(rng) } else { wrong.sample(rng) }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::helpers;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_exponential_draw() {
        let mut rng = StdRng::seed_from_u64(777);
        let scheme = WeightScheme::exponential(1.0);
        let weights = scheme.draw(1_000, &mut rng);

        assert_eq!(weights.len(), 1_000);
        assert!(weights.iter().all(|w| *w >= 0f64));

        // Mean of Exp(1) is 1; a loose sanity band suffices here.
        let mean = weights.iter().sum::<f64>() / 1_000f64;
        assert!(
            (0.8..=1.2).contains(&mean),
            "expected a mean close to 1, got {mean}",
        );
    }

    #[test]
    fn test_binary_draw_counts() {
        let mut rng = StdRng::seed_from_u64(777);
        let scheme = WeightScheme::binary(0.3, 5.0, 1.0);
        let weights = scheme.draw(10, &mut rng);

        let n_a = weights.iter().filter(|w| **w == 5.0).count();
        let n_b = weights.iter().filter(|w| **w == 1.0).count();
        assert_eq!(n_a, 3, "expected 3 heavy rows, got {n_a}");
        assert_eq!(n_b, 7, "expected 7 light rows, got {n_b}");
    }

    #[test]
    fn test_binary_draw_is_permuted() {
        // With 50 of each weight the probability that a shuffle keeps
        // the block layout is negligible; a fixed seed keeps this stable.
        let mut rng = StdRng::seed_from_u64(42);
        let scheme = WeightScheme::binary(0.5, 2.0, 1.0);
        let weights = scheme.draw(100, &mut rng);

        let block_layout = weights[..50].iter().all(|w| *w == 2.0);
        assert!(!block_layout, "expected a shuffled assignment");
    }

    #[test]
    fn test_normalized_draw_is_distribution() {
        let mut rng = StdRng::seed_from_u64(1234);
        let scheme = WeightScheme::exponential(2.0);
        let mut weights = scheme.draw(100, &mut rng);
        helpers::normalize(&mut weights[..]);

        let sum = weights.iter().sum::<f64>();
        assert!(
            (sum - 1f64).abs() < TEST_TOLERANCE,
            "expected a sum of 1, got {sum}",
        );
    }

    #[test]
    fn test_gamma_by_correctness() {
        let mut rng = StdRng::seed_from_u64(777);
        let correct = vec![true, false, true, false];
        let weights = gamma_by_correctness(&correct[..], 2.0, 4.0, &mut rng);

        assert_eq!(weights.len(), 4);
        assert!(weights.iter().all(|w| *w >= 0f64));
    }

    #[test]
    #[should_panic]
    fn test_exponential_invalid_rate() {
        let _ = WeightScheme::exponential(0.0);
    }

    #[test]
    #[should_panic]
    fn test_binary_invalid_split() {
        let _ = WeightScheme::binary(1.5, 1.0, 1.0);
    }
}
