//! Provides the `WeakLearner` trait and the decision-stump learner.
mod stump;

pub use stump::{DecisionStump, StumpClassifier};

use crate::Sample;

/// An algorithm that, given a distribution over the training examples,
/// produces a hypothesis with non-trivial accuracy
/// with respect to that distribution.
pub trait WeakLearner {
    /// The type of the produced hypothesis.
    type Hypothesis;

    /// Returns the name of the weak learner.
    fn name(&self) -> &str;

    /// Produce a hypothesis for the given `sample` and
    /// distribution `dist` over its rows.
    fn produce(&self, sample: &Sample, dist: &[f64]) -> Self::Hypothesis;
}
