//! A node struct used by the fitted tree.
use serde::{Serialize, Deserialize};

use crate::{Classifier, Sample};
use super::{LeftRight, Splitter};

/// One node of a fitted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// An internal node: route by `splitter`, then recurse.
    Branch {
        /// The split rule of this node.
        splitter: Splitter,
        /// Subtree for instances with feature value below the threshold.
        left: Box<Node>,
        /// Subtree for the remaining instances.
        right: Box<Node>,
    },
    /// A terminal node predicting with fixed confidence.
    Leaf {
        /// Prediction confidence in `[-1, +1]`.
        confidence: f64,
    },
}

impl Node {
    /// Construct an internal node.
    pub fn branch(splitter: Splitter, left: Box<Node>, right: Box<Node>)
        -> Self
    {
        Self::Branch { splitter, left, right, }
    }

    /// Construct a leaf node.
    pub fn leaf(confidence: f64) -> Self {
        Self::Leaf { confidence, }
    }

    /// Number of leaves under (and including) this node.
    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Branch { left, right, .. } => {
                left.n_leaves() + right.n_leaves()
            },
            Self::Leaf { .. } => 1,
        }
    }

    /// Depth of the subtree rooted at this node.
    /// A single leaf has depth `0`.
    pub fn depth(&self) -> usize {
        match self {
            Self::Branch { left, right, .. } => {
                1 + left.depth().max(right.depth())
            },
            Self::Leaf { .. } => 0,
        }
    }
}

impl Classifier for Node {
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        match self {
            Self::Branch { splitter, left, right, .. } => {
                match splitter.split(sample, row) {
                    LeftRight::Left  => left.confidence(sample, row),
                    LeftRight::Right => right.confidence(sample, row),
                }
            },
            Self::Leaf { confidence, .. } => {
                *confidence
            },
        }
    }
}

/// A fitted tree, the output of [`TreeFitter`](super::TreeFitter).
/// You can read/write this struct by `Serde` trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeClassifier {
    root: Node,
}

impl TreeClassifier {
    pub(super) fn from_root(root: Node) -> Self {
        Self { root, }
    }

    /// The root node of the fitted tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves of the fitted tree.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Depth of the fitted tree.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Classifier for TreeClassifier {
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        self.root.confidence(sample, row)
    }
}
