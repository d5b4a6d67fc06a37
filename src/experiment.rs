//! The experiment methods: one linear pipeline per sampling strategy.
//!
//! Every method takes the original sample and a weight vector normalized
//! to sum to `1`, runs resampling, threshold guessing, and tree fitting,
//! and reports weighted training loss on the original rows.
use rand::Rng;

use std::time::Duration;

use crate::{
    Classifier,
    Sample,
    ThresholdSet,
    TreeClassifier,
    TreeConfig,
    TreeFitter,
};
use crate::constants::{
    DEFAULT_DEPTH_BUDGET,
    DEFAULT_REGULARIZATION,
    DEFAULT_ROUNDS,
    DEFAULT_TIME_LIMIT_SECS,
};
use crate::evaluate;
use crate::resample;
use crate::threshold;
use crate::tools::{checkers, helpers};
use crate::weights;

// Gamma shapes of the correctness-driven reweighting.
const COMPARE_SHAPE_CORRECT: f64 = 2.0;
const COMPARE_SHAPE_WRONG:   f64 = 4.0;
const BASELINE_SHAPE_CORRECT: f64 = 1.0;
const BASELINE_SHAPE_WRONG:   f64 = 100_000.0;

// Duplication multiplier of the retraining step of
// `resample_and_compare_baseline`.
const RETRAIN_MULTIPLIER: f64 = 10.0;

/// Parameters of one experiment run.
/// Every stage reads its knobs from here; nothing is global.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Boosting rounds for threshold guessing, warm starts,
    /// and backward elimination.
    pub n_rounds: usize,
    /// Depth budget of the tree fitter.
    pub depth_budget: usize,
    /// Per-leaf penalty of the tree fitter.
    pub regularization: f64,
    /// Wall-clock budget of one tree fit.
    pub time_limit: Duration,
    /// Run backward feature elimination on the binarized table
    /// before fitting.
    pub backselect: bool,
    /// Dataset multiplier: the duplicated table has about `N * p` rows.
    pub p: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_rounds: DEFAULT_ROUNDS,
            depth_budget: DEFAULT_DEPTH_BUDGET,
            regularization: DEFAULT_REGULARIZATION,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
            backselect: true,
            p: 1.0,
        }
    }
}

/// The scalar results of one experiment run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// One weighted training loss.
    Plain {
        /// Weighted training loss on the original rows.
        loss: f64,
    },
    /// Losses before and after retraining under redrawn weights.
    Compare {
        /// Loss of the first model under the redrawn weights.
        initial: f64,
        /// Loss of the retrained model under the same weights.
        retrained: f64,
    },
    /// Weighted loss and accuracy of an unweighted and a weighted tree.
    FourWay {
        /// Weighted loss of the unweighted tree.
        initial_loss: f64,
        /// Accuracy of the unweighted tree.
        initial_accuracy: f64,
        /// Weighted loss of the weighted tree.
        weighted_loss: f64,
        /// Accuracy of the weighted tree.
        weighted_accuracy: f64,
    },
}

/// An [`Outcome`] plus the last tree the method fitted.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The scalar results.
    pub outcome: Outcome,
    /// The last fitted tree of the run.
    pub model: TreeClassifier,
}

// One preprocessed training table:
// guessed thresholds, the binarized (and possibly reduced) table,
// and the tree configuration carrying the warm-start labels.
struct Preprocessed {
    thresholds: ThresholdSet,
    train: Sample,
    tree_config: TreeConfig,
}

// Threshold guessing, binarization, optional backward elimination,
// and the warm-start ensemble, all on the (duplicated) training table.
fn preprocess(train: &Sample, config: &ExperimentConfig) -> Preprocessed {
    let thresholds = ThresholdSet::guess(train, config.n_rounds);
    let mut train = thresholds.binarize(train);
    if config.backselect {
        train = threshold::backward_eliminate(&train, config.n_rounds);
    }

    let ensemble = threshold::fit_stump_ensemble(&train, config.n_rounds);
    let warm_start = ensemble.predict_all(&train);

    let tree_config = TreeConfig {
        regularization: config.regularization,
        depth_budget: config.depth_budget,
        time_limit: config.time_limit,
        warm_start: Some(warm_start),
    };

    Preprocessed { thresholds, train, tree_config, }
}

// Fit on `train`, evaluate the weighted loss on `eval`
// (binarized with the thresholds guessed on `train`).
fn fit_and_score(
    train: &Sample,
    eval: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
) -> (f64, TreeClassifier)
{
    let pre = preprocess(train, config);
    let tree = TreeFitter::new(pre.tree_config).fit(&pre.train);

    let eval_table = pre.thresholds.binarize(eval);
    let loss = evaluate::weighted_loss(&eval_table, weights, &tree);

    (loss, tree)
}

/// Baseline: no duplication, fit on the original table.
pub fn baseline(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
) -> RunResult
{
    checkers::distribution(weights);
    let (loss, model) = fit_and_score(sample, sample, weights, config);
    RunResult { outcome: Outcome::Plain { loss }, model, }
}

/// Deterministic duplication: `round(weight[i] * N * p)` copies of row `i`.
pub fn deterministic(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
) -> RunResult
{
    checkers::distribution(weights);
    let dup = resample::deterministic(sample, weights, config.p);
    let (loss, model) = fit_and_score(&dup, sample, weights, config);
    RunResult { outcome: Outcome::Plain { loss }, model, }
}

/// Stochastic (fractional) duplication.
pub fn mathias<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
    rng: &mut R,
) -> RunResult
{
    checkers::distribution(weights);
    let dup = resample::stochastic(sample, weights, config.p, rng);
    let (loss, model) = fit_and_score(&dup, sample, weights, config);
    RunResult { outcome: Outcome::Plain { loss }, model, }
}

/// Weighted-replacement (bootstrap) sampling.
pub fn sampling<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
    rng: &mut R,
) -> RunResult
{
    checkers::distribution(weights);
    let dup = resample::bootstrap(sample, weights, config.p, rng);
    let (loss, model) = fit_and_score(&dup, sample, weights, config);
    RunResult { outcome: Outcome::Plain { loss }, model, }
}

/// Fit on the deterministic duplication, redraw weights from the model's
/// correctness mask, then refit on the redrawn weights and report both
/// losses (each normalized by the redrawn weight total).
pub fn resample_and_compare_deterministic<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
    rng: &mut R,
) -> RunResult
{
    checkers::distribution(weights);

    let dup = resample::deterministic(sample, weights, config.p);
    let pre = preprocess(&dup, config);
    let model_init = TreeFitter::new(pre.tree_config).fit(&pre.train);

    let eval_init = pre.thresholds.binarize(sample);
    let correct = evaluate::correctness(&eval_init, &model_init);
    let redrawn = weights::gamma_by_correctness(
        &correct[..],
        COMPARE_SHAPE_CORRECT,
        COMPARE_SHAPE_WRONG,
        rng,
    );
    let total = redrawn.iter().sum::<f64>();
    let initial = evaluate::weighted_loss(&eval_init, &redrawn[..], &model_init);

    let mut normalized = redrawn.clone();
    helpers::normalize(&mut normalized[..]);
    let dup = resample::deterministic(sample, &normalized[..], config.p);
    let pre = preprocess(&dup, config);
    let model_new = TreeFitter::new(pre.tree_config).fit(&pre.train);

    let eval_new = pre.thresholds.binarize(sample);
    let retrained = evaluate::weighted_loss(&eval_new, &redrawn[..], &model_new);

    RunResult {
        outcome: Outcome::Compare {
            initial: initial / total,
            retrained: retrained / total,
        },
        model: model_new,
    }
}

/// Baseline fit, correctness-driven gamma reweighting concentrated on
/// the mistakes, retraining via stochastic duplication at a fixed
/// multiplier, and the improvement `initial - retrained` as the result.
pub fn resample_and_compare_baseline<R: Rng>(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
    rng: &mut R,
) -> RunResult
{
    checkers::distribution(weights);

    let pre = preprocess(sample, config);
    let model = TreeFitter::new(pre.tree_config).fit(&pre.train);
    let eval = pre.thresholds.binarize(sample);
    let initial = evaluate::weighted_loss(&eval, weights, &model);

    let correct = evaluate::correctness(&eval, &model);
    let mut redrawn = weights::gamma_by_correctness(
        &correct[..],
        BASELINE_SHAPE_CORRECT,
        BASELINE_SHAPE_WRONG,
        rng,
    );
    helpers::normalize(&mut redrawn[..]);

    let dup = resample::stochastic(sample, &redrawn[..], RETRAIN_MULTIPLIER, rng);
    let (retrained, model) = fit_and_score(&dup, sample, &redrawn[..], config);

    RunResult {
        outcome: Outcome::Plain { loss: initial - retrained },
        model,
    }
}

/// Compare a tree fitted without weighting to one fitted on the
/// deterministic duplication; report weighted loss and accuracy of both
/// on the original rows.
pub fn no_weights_vs_weighted(
    sample: &Sample,
    weights: &[f64],
    config: &ExperimentConfig,
) -> RunResult
{
    checkers::distribution(weights);

    let pre = preprocess(sample, config);
    let model_init = TreeFitter::new(pre.tree_config).fit(&pre.train);
    let eval_init = pre.thresholds.binarize(sample);
    let initial_loss = evaluate::weighted_loss(&eval_init, weights, &model_init);
    let initial_accuracy = evaluate::accuracy(&eval_init, &model_init);

    let dup = resample::deterministic(sample, weights, config.p);
    let pre = preprocess(&dup, config);
    let model_weighted = TreeFitter::new(pre.tree_config).fit(&pre.train);
    let eval_weighted = pre.thresholds.binarize(sample);
    let weighted_loss =
        evaluate::weighted_loss(&eval_weighted, weights, &model_weighted);
    let weighted_accuracy = evaluate::accuracy(&eval_weighted, &model_weighted);

    RunResult {
        outcome: Outcome::FourWay {
            initial_loss,
            initial_accuracy,
            weighted_loss,
            weighted_accuracy,
        },
        model: model_weighted,
    }
}
