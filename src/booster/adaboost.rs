//! Provides AdaBoost by Freund & Schapire, 1995.
use rayon::prelude::*;

use crate::{
    Booster,
    Classifier,
    Sample,
    WeakLearner,
    WeightedMajority,
};
use crate::tools::helpers;

use std::ops::ControlFlow;

/// The AdaBoost algorithm
/// based on the book:
/// [Boosting: Foundations and Algorithms](https://direct.mit.edu/books/oa-monograph/5342/BoostingFoundations-and-Algorithms)
/// by Robert E. Schapire and Yoav Freund.
///
/// In this harness AdaBoost plays the role of the reference ensemble:
/// capped at a fixed number of rounds it guesses binarization
/// thresholds, provides warm-start labels for the tree fitter,
/// and scores feature subsets during backward elimination.
///
/// # Example
/// ```no_run
/// use treesample::prelude::*;
///
/// let sample = SampleReader::default()
///     .file("/path/to/csv/file.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap()
///     .into_binary_labels();
///
/// let mut booster = AdaBoost::init(&sample)
///     .force_quit_at(40);
/// let weak_learner = DecisionStump::new(&sample);
///
/// let f = booster.run(&weak_learner);
/// let predictions = f.predict_all(&sample);
/// ```
pub struct AdaBoost<'a, F> {
    // Training sample
    sample: &'a Sample,

    // Distribution over the training rows.
    dist: Vec<f64>,

    // Tolerance parameter
    tolerance: f64,

    // Weights on hypotheses in `hypotheses`
    weights: Vec<f64>,

    // Hypotheses obtained by the weak learner.
    hypotheses: Vec<F>,

    // Max iteration until AdaBoost guarantees the optimality.
    max_iter: usize,

    // Optional. If this value is `Some(it)`,
    // the algorithm terminates after `it` iterations.
    force_quit_at: Option<usize>,
}

impl<'a, F> AdaBoost<'a, F> {
    /// Construct a new instance of `AdaBoost`.
    pub fn init(sample: &'a Sample) -> Self {
        let n_sample = sample.shape().0;

        let uni = 1.0 / n_sample as f64;
        Self {
            sample,

            dist: vec![uni; n_sample],
            tolerance: 1.0 / (n_sample as f64 + 1.0),

            weights: Vec::new(),
            hypotheses: Vec::new(),

            max_iter: usize::MAX,
            force_quit_at: None,
        }
    }

    /// Returns the maximum iteration
    /// of `AdaBoost` to find a combined hypothesis
    /// that has error at most `tolerance`.
    pub fn max_loop(&self) -> usize {
        let n_sample = self.sample.shape().0 as f64;

        (n_sample.ln() / self.tolerance.powi(2)) as usize
    }

    /// Force quits after `it` iterations.
    /// Note that if `it` is smaller than the iteration bound
    /// for AdaBoost, the returned hypothesis has no guarantee.
    pub fn force_quit_at(mut self, it: usize) -> Self {
        self.force_quit_at = Some(it);
        self
    }

    /// Set the tolerance parameter.
    /// Default value is `1 / (n_sample + 1)`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns a weight on the new hypothesis.
    /// `update_params` also updates `self.dist`.
    #[inline]
    fn update_params(&mut self, margins: Vec<f64>, edge: f64) -> f64 {
        let n_sample = self.sample.shape().0;

        // Compute the weight on the new hypothesis.
        // This is the returned value of this function.
        let weight = ((1.0 + edge) / (1.0 - edge)).ln() / 2.0;

        // To prevent overflow, take the logarithm.
        self.dist.par_iter_mut()
            .zip(margins)
            .for_each(|(d, p)| *d = d.ln() - weight * p);

        // Sort indices by ascending order of the log-distribution.
        let mut indices = (0..n_sample).collect::<Vec<usize>>();
        indices.sort_unstable_by(|&i, &j| {
            self.dist[i].partial_cmp(&self.dist[j]).unwrap()
        });

        let mut normalizer = self.dist[indices[0]];
        for i in indices.into_iter().skip(1) {
            let mut a = normalizer;
            let mut b = self.dist[i];
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }

            normalizer = a + (1.0 + (b - a).exp()).ln();
        }

        // Update self.dist
        self.dist.par_iter_mut()
            .for_each(|d| *d = (*d - normalizer).exp());

        weight
    }
}

impl<F> Booster<F> for AdaBoost<'_, F>
    where F: Classifier + Clone,
{
    type Output = WeightedMajority<F>;

    fn name(&self) -> &str {
        "AdaBoost"
    }

    fn preprocess(&mut self) {
        self.sample.is_valid_binary_instance();

        let n_sample = self.sample.shape().0;
        let uni = 1.0 / n_sample as f64;
        self.dist = vec![uni; n_sample];

        self.weights = Vec::new();
        self.hypotheses = Vec::new();

        self.max_iter = self.max_loop();

        if let Some(it) = self.force_quit_at {
            self.max_iter = it;
        }
    }

    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> ControlFlow<usize>
        where W: WeakLearner<Hypothesis = F>,
    {
        if self.max_iter < iteration {
            return ControlFlow::Break(self.max_iter);
        }

        // Get a new hypothesis
        let h = weak_learner.produce(self.sample, &self.dist);

        // Each element in `margins` is the product of
        // the predicted vector and the correct vector
        let margins = helpers::margins(self.sample, &h)
            .collect::<Vec<_>>();

        let edge = helpers::inner_product(&margins, &self.dist);

        // If `h` predicted all the examples in `sample` correctly,
        // use it as the combined classifier.
        if edge.abs() >= 1.0 {
            self.weights = vec![edge.signum()];
            self.hypotheses = vec![h];
            return ControlFlow::Break(iteration);
        }

        // Compute the weight on the new hypothesis
        let weight = self.update_params(margins, edge);
        self.weights.push(weight);
        self.hypotheses.push(h);

        ControlFlow::Continue(())
    }

    fn postprocess(&mut self) -> Self::Output {
        WeightedMajority::from_slices(&self.weights[..], &self.hypotheses[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecisionStump;
    use std::io::BufReader;

    fn test_sample() -> Sample {
        // Not separable by a single stump:
        // positive iff both coordinates are large.
        let csv = b"\
            x,y,class\n\
            0.9,0.8,1.0\n\
            0.8,0.9,1.0\n\
            0.7,0.7,1.0\n\
            0.9,0.1,-1.0\n\
            0.1,0.9,-1.0\n\
            0.2,0.2,-1.0\n\
            0.1,0.1,-1.0\n\
            0.3,0.2,-1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    #[test]
    fn test_boosting_reduces_training_error() {
        let sample = test_sample();
        let mut booster = AdaBoost::init(&sample)
            .force_quit_at(40);
        let weak_learner = DecisionStump::new(&sample);
        let f = booster.run(&weak_learner);

        let errors = sample.target()
            .iter()
            .zip(f.predict_all(&sample))
            .filter(|(y, hx)| **y as i64 != *hx)
            .count();
        assert_eq!(
            errors, 0,
            "expected zero training errors after boosting, got {errors}",
        );
    }

    #[test]
    fn test_force_quit_caps_rounds() {
        let sample = test_sample();
        let mut booster = AdaBoost::init(&sample)
            .force_quit_at(3);
        let weak_learner = DecisionStump::new(&sample);
        let f = booster.run(&weak_learner);

        assert!(
            f.hypotheses.len() <= 3,
            "expected at most 3 hypotheses, got {}", f.hypotheses.len(),
        );
    }
}
