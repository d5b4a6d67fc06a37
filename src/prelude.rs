//! Exports the common types of this crate.
//!
pub use crate::sample::{
    Feature,
    Sample,
    SampleReader,
};

pub use crate::hypothesis::{
    Classifier,
    WeightedMajority,
};

pub use crate::weak_learner::{
    DecisionStump,
    StumpClassifier,
    WeakLearner,
};

pub use crate::booster::{
    AdaBoost,
    Booster,
};

pub use crate::tree::{
    TreeClassifier,
    TreeConfig,
    TreeFitter,
};

pub use crate::weights::WeightScheme;
pub use crate::threshold::ThresholdSet;
pub use crate::experiment::{
    ExperimentConfig,
    Outcome,
    RunResult,
};
pub use crate::report::ReportWriter;
