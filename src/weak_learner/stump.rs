//! The decision-stump weak learner.
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::{Classifier, Sample};
use crate::tools::checkers;
use crate::tree::{LeftRight, Splitter};
use super::WeakLearner;

/// The side of the threshold on which a stump predicts `+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositiveSide {
    /// Rows with feature value below the threshold predict `+1`.
    Lhs,
    /// Rows with feature value at or above the threshold predict `+1`.
    Rhs,
}

/// A one-split classifier: compare a single feature to a threshold
/// and predict `±1` by side.
/// You can read/write this struct by `Serde` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StumpClassifier {
    splitter: Splitter,
    positive_side: PositiveSide,
}

impl StumpClassifier {
    /// The feature this stump splits on.
    pub fn feature(&self) -> &str {
        &self.splitter.feature
    }

    /// The threshold this stump splits at.
    pub fn threshold(&self) -> f64 {
        self.splitter.threshold
    }
}

impl Classifier for StumpClassifier {
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        let side = self.splitter.split(sample, row);
        match (side, self.positive_side) {
            (LeftRight::Left,  PositiveSide::Lhs) =>  1f64,
            (LeftRight::Left,  PositiveSide::Rhs) => -1f64,
            (LeftRight::Right, PositiveSide::Lhs) => -1f64,
            (LeftRight::Right, PositiveSide::Rhs) =>  1f64,
        }
    }
}

/// The decision-stump weak learner.
/// Given a distribution over the training rows,
/// [`DecisionStump::produce`] returns the stump
/// maximizing the absolute edge.
///
/// The sweep order of every feature is computed once at construction,
/// so each `produce` call costs `O(n_feature * n_sample)`.
pub struct DecisionStump {
    // Per feature, the row indices sorted by feature value.
    sorted_rows: Vec<Vec<usize>>,
}

impl DecisionStump {
    /// Precompute the sorted sweep orders for `sample`.
    pub fn new(sample: &Sample) -> Self {
        let n_sample = sample.shape().0;
        let sorted_rows = sample.features()
            .par_iter()
            .map(|feat| {
                let mut ix = (0..n_sample).collect::<Vec<_>>();
                ix.sort_by(|&i, &j| {
                    feat[i].partial_cmp(&feat[j]).unwrap()
                });
                ix
            })
            .collect::<Vec<_>>();

        Self { sorted_rows, }
    }
}

impl WeakLearner for DecisionStump {
    type Hypothesis = StumpClassifier;

    fn name(&self) -> &str {
        "Decision Stump"
    }

    fn produce(&self, sample: &Sample, dist: &[f64]) -> Self::Hypothesis {
        let n_sample = sample.shape().0;
        checkers::aligned(n_sample, dist);

        let target = sample.target();

        // Edge of the hypothesis predicting `+1` everywhere.
        let init_edge = dist.iter()
            .zip(target)
            .map(|(d, y)| d * y)
            .sum::<f64>();

        let (edge, name, threshold) = sample.features()
            .par_iter()
            .zip(&self.sorted_rows[..])
            .map(|(feat, ix)| {
                // Threshold below every value: all rows on the right.
                let mut best_edge = init_edge;
                let mut best_threshold = feat[ix[0]];

                let mut edge = init_edge;
                for k in 0..n_sample - 1 {
                    let i = ix[k];
                    edge -= 2f64 * dist[i] * target[i];

                    let (v, v_next) = (feat[i], feat[ix[k + 1]]);
                    if v == v_next { continue; }

                    if best_edge.abs() < edge.abs() {
                        best_edge = edge;
                        best_threshold = (v + v_next) / 2f64;
                    }
                }

                (best_edge, feat.name(), best_threshold)
            })
            .max_by(|(e1, _, _), (e2, _, _)| {
                e1.abs().partial_cmp(&e2.abs())
                    .expect("Stump edges must not be NaN")
            })
            .expect("The sample has no features");

        let positive_side = if edge >= 0f64 {
            PositiveSide::Rhs
        } else {
            PositiveSide::Lhs
        };

        StumpClassifier {
            splitter: Splitter::new(name, threshold),
            positive_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn test_sample() -> Sample {
        let csv = b"\
            feat,unused,class\n\
            0.1,0.3,1.0\n\
            0.2,0.3,1.0\n\
            0.3,0.3,1.0\n\
            0.6,0.3,-1.0\n\
            0.7,0.3,-1.0\n\
            0.8,0.3,-1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    #[test]
    fn test_produce_separates() {
        let sample = test_sample();
        let n_sample = sample.shape().0;
        let dist = vec![1f64 / n_sample as f64; n_sample];

        let learner = DecisionStump::new(&sample);
        let h = learner.produce(&sample, &dist[..]);

        assert_eq!(h.feature(), "feat");
        assert!(
            (0.3..=0.6).contains(&h.threshold()),
            "expected a threshold in [0.3, 0.6], got {}", h.threshold(),
        );

        let predictions = h.predict_all(&sample);
        let expect = vec![1, 1, 1, -1, -1, -1];
        assert_eq!(predictions, expect);
    }

    #[test]
    fn test_produce_follows_distribution() {
        let sample = test_sample();
        // All the mass on two rows with inverted labels:
        // the best stump must fit those two rows, not the majority.
        let dist = vec![0.0, 0.0, 0.5, 0.5, 0.0, 0.0];

        let learner = DecisionStump::new(&sample);
        let h = learner.produce(&sample, &dist[..]);

        assert_eq!(h.predict(&sample, 2), 1);
        assert_eq!(h.predict(&sample, 3), -1);
    }
}
