//! Decision-tree plumbing shared by the weak learner and the tree fitter,
//! plus the regularized, depth-budgeted fitter itself.
use serde::{Serialize, Deserialize};

use crate::Sample;

mod fitter;
mod node;

pub use fitter::{TreeConfig, TreeFitter};
pub use node::{Node, TreeClassifier};

/// The output of the function `split` of [`Splitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRight {
    /// The instance goes to the left child.
    Left,
    /// The instance goes to the right child.
    Right,
}

/// A single split rule: compare one named feature against a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splitter {
    /// The feature this rule inspects.
    pub feature: String,
    /// The threshold the feature value is compared against.
    pub threshold: f64,
}

impl Splitter {
    /// Construct a new rule over the feature named `name`.
    #[inline]
    pub fn new(name: &str, threshold: f64) -> Self {
        let feature = name.to_string();
        Self { feature, threshold, }
    }

    /// Defines the splitting.
    #[inline]
    pub fn split(&self, sample: &Sample, row: usize) -> LeftRight {
        let name = &self.feature;

        let value = sample[name][row];

        if value < self.threshold { LeftRight::Left } else { LeftRight::Right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn test_sample() -> Sample {
        let csv = b"\
            feat,class\n\
            0.1,1.0\n\
            0.9,-1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    #[test]
    fn test_split() {
        let sample = test_sample();
        let rule = Splitter::new("feat", 0.5);
        assert_eq!(rule.split(&sample, 0), LeftRight::Left);
        assert_eq!(rule.split(&sample, 1), LeftRight::Right);
    }
}
