//!
//! `treesample` is an experimentation harness for comparing
//! dataset-resampling and instance-weighting strategies when training a
//! sparse, depth-budgeted decision tree warm-started by a boosted-stump
//! ensemble.
//!
//! Given a weighted binary-classification dataset, the harness
//! 1. draws a per-row weight vector from a configured distribution,
//! 2. converts the weights into a duplicated or resampled training table,
//! 3. guesses binarization thresholds with a boosted-stump ensemble,
//! 4. fits a regularized tree on the binarized table, and
//! 5. reports the weighted misclassification loss on the original rows.
//!
//! Every step is available as a library function; the `treesample` binary
//! wires them together and appends one CSV row per run.

pub mod constants;
pub mod prelude;
pub mod tools;
pub mod sample;
pub mod hypothesis;
pub mod weak_learner;
pub mod booster;
pub mod tree;
pub mod weights;
pub mod resample;
pub mod threshold;
pub mod evaluate;
pub mod experiment;
pub mod report;

pub use tools::{
    checkers,
    helpers,
};

pub use sample::{
    Feature,
    Sample,
    SampleReader,
};

pub use hypothesis::{
    Classifier,
    WeightedMajority,
};

pub use weak_learner::{
    DecisionStump,
    StumpClassifier,
    WeakLearner,
};

pub use booster::{
    AdaBoost,
    Booster,
};

pub use tree::{
    LeftRight,
    Splitter,
    TreeClassifier,
    TreeConfig,
    TreeFitter,
};

pub use weights::WeightScheme;
pub use threshold::ThresholdSet;
pub use experiment::{
    ExperimentConfig,
    Outcome,
    RunResult,
};
pub use report::ReportWriter;
