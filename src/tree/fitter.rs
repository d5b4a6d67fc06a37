//! The regularized, depth-budgeted tree fitter.
use rayon::prelude::*;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::Sample;
use crate::constants::{
    DEFAULT_DEPTH_BUDGET,
    DEFAULT_REGULARIZATION,
    DEFAULT_TIME_LIMIT_SECS,
};
use crate::tools::checkers;
use super::{LeftRight, Node, Splitter, TreeClassifier};

/// Configuration of one tree fit.
///
/// `warm_start` carries the training-set predictions of a reference
/// model (the boosted-stump ensemble) in memory;
/// growing stops once the tree's training error mass reaches the
/// error mass of that reference labeling.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Per-leaf penalty: a split must reduce the training error mass
    /// by more than this value to be admitted.
    pub regularization: f64,
    /// Maximal depth of the fitted tree.
    pub depth_budget: usize,
    /// Wall-clock budget for one fit.
    pub time_limit: Duration,
    /// Reference labels on the training rows, if any.
    pub warm_start: Option<Vec<i64>>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            regularization: DEFAULT_REGULARIZATION,
            depth_budget: DEFAULT_DEPTH_BUDGET,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            warm_start: None,
        }
    }
}

/// Fits a [`TreeClassifier`] under a [`TreeConfig`].
///
/// The tree is grown best-gain-first from the root:
/// the frontier split with the largest reduction of training error mass
/// is expanded next, so an exhausted budget (depth, penalty, deadline,
/// or warm-start bound) always leaves the most valuable splits in place.
pub struct TreeFitter {
    config: TreeConfig,
}

// Arena representation used while growing; converted to `Node` at the end.
enum Slot {
    Leaf { confidence: f64 },
    Branch { splitter: Splitter, left: usize, right: usize },
}

// A frontier split, ordered by gain.
struct Candidate {
    gain: f64,
    slot: usize,
    depth: usize,
    splitter: Splitter,
    left: LeafPlan,
    right: LeafPlan,
}

// What a child leaf would look like if the candidate is expanded.
struct LeafPlan {
    indices: Vec<usize>,
    confidence: f64,
    error: f64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.gain.eq(&other.gain)
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain.partial_cmp(&other.gain)
            .expect("Split gains must not be NaN")
    }
}

impl TreeFitter {
    /// Construct a fitter from the given configuration.
    pub fn new(config: TreeConfig) -> Self {
        Self { config, }
    }

    /// Fit a tree on `sample`.
    /// Every row carries mass `1 / n_sample`;
    /// weighting is expressed by row duplication upstream.
    pub fn fit(&self, sample: &Sample) -> TreeClassifier {
        checkers::sample(sample);
        sample.is_valid_binary_instance();

        let deadline = Instant::now() + self.config.time_limit;
        let n_sample = sample.shape().0;
        let mass = 1f64 / n_sample as f64;

        let bound = self.warm_start_bound(sample, mass);

        let indices = (0..n_sample).collect::<Vec<_>>();
        let (confidence, error) = leaf_stats(sample, &indices[..], mass);

        let mut arena = vec![Slot::Leaf { confidence }];
        let mut total_error = error;
        let mut frontier = BinaryHeap::new();

        let root = LeafPlan { indices, confidence, error, };
        if let Some(c) = self.candidate(sample, mass, &root, 0, 0) {
            frontier.push(c);
        }

        while let Some(c) = frontier.pop() {
            if total_error <= bound { break; }
            if Instant::now() >= deadline { break; }

            let left_id = arena.len();
            arena.push(Slot::Leaf { confidence: c.left.confidence });
            let right_id = arena.len();
            arena.push(Slot::Leaf { confidence: c.right.confidence });
            arena[c.slot] = Slot::Branch {
                splitter: c.splitter,
                left: left_id,
                right: right_id,
            };
            total_error -= c.gain;

            let depth = c.depth + 1;
            for (plan, slot) in [(c.left, left_id), (c.right, right_id)] {
                if let Some(c) = self.candidate(sample, mass, &plan, slot, depth) {
                    frontier.push(c);
                }
            }
        }

        TreeClassifier::from_root(build(&arena, 0))
    }

    // Error mass of the warm-start labeling, or `0` without one
    // (growth then only stops at zero training error).
    fn warm_start_bound(&self, sample: &Sample, mass: f64) -> f64 {
        match &self.config.warm_start {
            Some(labels) => {
                let target = sample.target();
                assert_eq!(
                    labels.len(), target.len(),
                    "warm-start labels must cover every training row",
                );
                target.iter()
                    .zip(labels)
                    .filter(|(y, wy)| **y as i64 != **wy)
                    .map(|_| mass)
                    .sum::<f64>()
            },
            None => 0f64,
        }
    }

    // The best admissible split of the leaf described by `plan`,
    // or `None` when the depth budget, the purity of the leaf,
    // or the per-leaf penalty forbids splitting it.
    fn candidate(
        &self,
        sample: &Sample,
        mass: f64,
        plan: &LeafPlan,
        slot: usize,
        depth: usize,
    ) -> Option<Candidate>
    {
        if depth >= self.config.depth_budget || plan.error <= 0f64 {
            return None;
        }

        let (splitter, _) = best_split(sample, &plan.indices[..], mass)?;

        let mut lix = Vec::new();
        let mut rix = Vec::new();
        for &i in plan.indices.iter() {
            match splitter.split(sample, i) {
                LeftRight::Left  => { lix.push(i); },
                LeftRight::Right => { rix.push(i); },
            }
        }
        if lix.is_empty() || rix.is_empty() {
            return None;
        }

        let (lconf, lerr) = leaf_stats(sample, &lix[..], mass);
        let (rconf, rerr) = leaf_stats(sample, &rix[..], mass);

        let gain = plan.error - (lerr + rerr);
        if gain <= self.config.regularization {
            return None;
        }

        Some(Candidate {
            gain,
            slot,
            depth,
            splitter,
            left: LeafPlan {
                indices: lix,
                confidence: lconf,
                error: lerr,
            },
            right: LeafPlan {
                indices: rix,
                confidence: rconf,
                error: rerr,
            },
        })
    }
}

// Majority-vote confidence and training error mass of a leaf
// over the rows in `indices`.
fn leaf_stats(sample: &Sample, indices: &[usize], mass: f64) -> (f64, f64) {
    assert!(!indices.is_empty());
    let target = sample.target();

    let mut pos = 0f64;
    let mut neg = 0f64;
    for &i in indices {
        if target[i] > 0f64 { pos += mass; } else { neg += mass; }
    }

    let total = pos + neg;
    let confidence = ((pos - neg) / total).clamp(-1f64, 1f64);
    let error = pos.min(neg);

    (confidence, error)
}

// The split of `indices` minimizing the summed error mass of both sides.
// Returns the rule and its error, or `None` when no feature
// takes two distinct values on these rows.
fn best_split(sample: &Sample, indices: &[usize], mass: f64)
    -> Option<(Splitter, f64)>
{
    let target = sample.target();

    sample.features()
        .par_iter()
        .filter_map(|feat| {
            let mut rows = indices.iter()
                .map(|&i| (feat[i], target[i]))
                .collect::<Vec<_>>();
            rows.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap());

            let total_pos = rows.iter()
                .filter(|(_, y)| *y > 0f64)
                .map(|_| mass)
                .sum::<f64>();
            let total_neg = mass * rows.len() as f64 - total_pos;

            let mut pos = 0f64;
            let mut neg = 0f64;
            let mut best: Option<(f64, f64)> = None;

            for k in 0..rows.len() - 1 {
                let (v, y) = rows[k];
                if y > 0f64 { pos += mass; } else { neg += mass; }

                let v_next = rows[k + 1].0;
                if v == v_next { continue; }

                let error = pos.min(neg)
                    + (total_pos - pos).min(total_neg - neg);
                let threshold = (v + v_next) / 2f64;

                let better = best
                    .map(|(_, e)| error < e)
                    .unwrap_or(true);
                if better {
                    best = Some((threshold, error));
                }
            }

            best.map(|(threshold, error)| {
                (Splitter::new(feat.name(), threshold), error)
            })
        })
        .min_by(|(_, e1), (_, e2)| {
            e1.partial_cmp(e2)
                .expect("Split errors must not be NaN")
        })
}

// Convert the grow-time arena into an owned tree.
fn build(arena: &[Slot], id: usize) -> Node {
    match &arena[id] {
        Slot::Leaf { confidence } => Node::leaf(*confidence),
        Slot::Branch { splitter, left, right } => {
            Node::branch(
                splitter.clone(),
                Box::new(build(arena, *left)),
                Box::new(build(arena, *right)),
            )
        },
    }
}
