//! Weighted misclassification loss and accuracy.
use crate::{Classifier, Sample};
use crate::tools::checkers;

/// The weighted misclassification loss of `f` on `sample`:
/// `sum(weights[i])` over the rows `f` predicts incorrectly.
/// With weights normalized to sum to `1`,
/// uniform weights make this equal to `1 - accuracy`.
pub fn weighted_loss<H>(sample: &Sample, weights: &[f64], f: &H) -> f64
    where H: Classifier,
{
    checkers::aligned(sample.shape().0, weights);
    checkers::non_negative(weights);

    let target = sample.target();
    f.predict_all(sample)
        .into_iter()
        .zip(target)
        .zip(weights)
        .filter(|((hx, y), _)| *hx != **y as i64)
        .map(|(_, w)| w)
        .sum::<f64>()
}

/// The fraction of rows `f` predicts correctly.
pub fn accuracy<H>(sample: &Sample, f: &H) -> f64
    where H: Classifier,
{
    let n_sample = sample.shape().0;
    assert!(n_sample > 0, "Tried to evaluate on an empty sample");

    correctness(sample, f)
        .into_iter()
        .filter(|c| *c)
        .count() as f64
        / n_sample as f64
}

/// Per-row correctness mask of `f` on `sample`.
pub fn correctness<H>(sample: &Sample, f: &H) -> Vec<bool>
    where H: Classifier,
{
    let target = sample.target();
    f.predict_all(sample)
        .into_iter()
        .zip(target)
        .map(|(hx, y)| hx == *y as i64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, Splitter};
    use std::io::BufReader;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn test_sample() -> Sample {
        let csv = b"\
            feat,class\n\
            0.1,1.0\n\
            0.2,1.0\n\
            0.8,-1.0\n\
            0.9,1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    // Predicts +1 below 0.5 and -1 above:
    // correct on rows 0, 1, 2 and wrong on row 3.
    fn test_classifier() -> Node {
        Node::branch(
            Splitter::new("feat", 0.5),
            Box::new(Node::leaf(1.0)),
            Box::new(Node::leaf(-1.0)),
        )
    }

    #[test]
    fn test_accuracy() {
        let sample = test_sample();
        let f = test_classifier();
        let acc = accuracy(&sample, &f);
        assert!(
            (acc - 0.75).abs() < TEST_TOLERANCE,
            "expected 0.75, got {acc}",
        );
    }

    #[test]
    fn test_uniform_weighted_loss_is_one_minus_accuracy() {
        let sample = test_sample();
        let f = test_classifier();

        let n_sample = sample.shape().0;
        let weights = vec![1f64 / n_sample as f64; n_sample];

        let loss = weighted_loss(&sample, &weights[..], &f);
        let acc = accuracy(&sample, &f);
        assert!(
            (loss - (1f64 - acc)).abs() < TEST_TOLERANCE,
            "expected loss {}, got {loss}", 1f64 - acc,
        );
    }

    #[test]
    fn test_weighted_loss_counts_only_mistakes() {
        let sample = test_sample();
        let f = test_classifier();

        // All the mass on the misclassified row.
        let weights = vec![0.0, 0.0, 0.0, 1.0];
        let loss = weighted_loss(&sample, &weights[..], &f);
        assert!(
            (loss - 1f64).abs() < TEST_TOLERANCE,
            "expected 1, got {loss}",
        );

        // No mass on the misclassified row.
        let weights = vec![0.5, 0.25, 0.25, 0.0];
        let loss = weighted_loss(&sample, &weights[..], &f);
        assert!(
            loss.abs() < TEST_TOLERANCE,
            "expected 0, got {loss}",
        );
    }

    #[test]
    fn test_correctness_mask() {
        let sample = test_sample();
        let f = test_classifier();
        let mask = correctness(&sample, &f);
        assert_eq!(mask, vec![true, true, true, false]);
    }
}
