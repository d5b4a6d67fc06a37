//! Threshold guessing, feature binarization,
//! and greedy backward feature elimination.
use std::collections::{BTreeMap, HashMap};

use crate::{
    AdaBoost,
    Booster,
    DecisionStump,
    Feature,
    Sample,
    StumpClassifier,
    WeightedMajority,
};
use crate::evaluate;
use crate::tools::checkers;

/// Fit the reference boosted-stump ensemble:
/// AdaBoost over decision stumps, capped at `n_rounds` rounds.
pub fn fit_stump_ensemble(sample: &Sample, n_rounds: usize)
    -> WeightedMajority<StumpClassifier>
{
    let mut booster = AdaBoost::init(sample)
        .force_quit_at(n_rounds);
    let weak_learner = DecisionStump::new(sample);
    booster.run(&weak_learner)
}

/// Total hypothesis weight attached to each feature of the ensemble.
/// Features the ensemble never splits on are absent from the map.
pub fn importances(f: &WeightedMajority<StumpClassifier>)
    -> HashMap<String, f64>
{
    let mut imp = HashMap::new();
    f.weights.iter()
        .zip(&f.hypotheses[..])
        .for_each(|(w, h)| {
            *imp.entry(h.feature().to_string()).or_insert(0f64) += w;
        });
    imp
}

/// A mapping from feature name to an ordered list of cut points,
/// produced by threshold guessing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    cuts: BTreeMap<String, Vec<f64>>,
}

impl ThresholdSet {
    /// Guess cut points for `sample`:
    /// boost stumps for `n_rounds` rounds on the raw features and
    /// harvest the thresholds the stumps chose,
    /// deduplicated and sorted per feature.
    pub fn guess(sample: &Sample, n_rounds: usize) -> Self {
        checkers::sample(sample);

        let f = fit_stump_ensemble(sample, n_rounds);

        let mut cuts: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for h in f.hypotheses.iter() {
            cuts.entry(h.feature().to_string())
                .or_default()
                .push(h.threshold());
        }
        cuts.values_mut()
            .for_each(|ts| {
                ts.sort_by(|a, b| a.partial_cmp(b).unwrap());
                ts.dedup();
            });

        Self { cuts, }
    }

    /// The cut points, keyed by feature name.
    pub fn cuts(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.cuts
    }

    /// Total number of cut points over all features.
    pub fn n_cuts(&self) -> usize {
        self.cuts.values()
            .map(|ts| ts.len())
            .sum()
    }

    /// Binarize `sample`: one indicator column `feat<=t` per cut point
    /// (`1.0` if the feature value is at most `t`),
    /// the target column preserved.
    pub fn binarize(&self, sample: &Sample) -> Sample {
        checkers::sample(sample);
        assert!(
            self.n_cuts() > 0,
            "Threshold guessing produced no cut points",
        );

        let features = self.cuts.iter()
            .flat_map(|(name, ts)| {
                let col = &sample[name];
                ts.iter()
                    .map(|&t| {
                        let vals = col.vals()
                            .iter()
                            .map(|&v| if v <= t { 1f64 } else { 0f64 })
                            .collect::<Vec<_>>();
                        Feature::from_vals(format!("{name}<={t}"), vals)
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Sample::from_parts(features, sample.target().to_vec())
    }
}

/// Greedy backward feature elimination over a binarized table.
///
/// Fit the reference ensemble on all columns, then repeatedly drop the
/// least-important column and refit while the reduced model's training
/// accuracy does not regress below the original and unexamined columns
/// remain. The last removed column is restored before returning.
/// A one-step local search; there is no backtracking.
pub fn backward_eliminate(sample: &Sample, n_rounds: usize) -> Sample {
    checkers::sample(sample);
    let n_feature = sample.shape().1;

    let base = fit_stump_ensemble(sample, n_rounds);
    let base_score = evaluate::accuracy(sample, &base);

    let mut current = sample.clone();
    let mut model = base;
    let mut score = f64::INFINITY;
    let mut last_dropped: Option<Feature> = None;
    let mut itr = 0;

    while score >= base_score && itr < n_feature - 1 {
        let imp = importances(&model);
        let name = current.feature_names()
            .iter()
            .map(|name| {
                let weight = imp.get(*name).copied().unwrap_or(0f64);
                (weight, name.to_string())
            })
            .min_by(|(w1, _), (w2, _)| w1.partial_cmp(w2).unwrap())
            .map(|(_, name)| name)
            .expect("The binarized sample has no columns");

        last_dropped = Some(current[&name].clone());
        current = current.without_feature(&name);
        model = fit_stump_ensemble(&current, n_rounds);
        score = evaluate::accuracy(&current, &model);
        itr += 1;
    }

    match last_dropped {
        Some(feat) => current.with_feature(feat),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn test_sample() -> Sample {
        let csv = b"\
            x,noise,class\n\
            0.1,0.5,1.0\n\
            0.2,0.4,1.0\n\
            0.3,0.5,1.0\n\
            0.6,0.4,-1.0\n\
            0.7,0.5,-1.0\n\
            0.8,0.4,-1.0";
        let reader = BufReader::new(&csv[..]);
        Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class")
    }

    #[test]
    fn test_guess_finds_separating_cut() {
        let sample = test_sample();
        let thresholds = ThresholdSet::guess(&sample, 10);

        let cuts = thresholds.cuts()
            .get("x")
            .expect("expected a cut on the separating feature");
        assert!(
            cuts.iter().any(|t| (0.3..=0.6).contains(t)),
            "expected a separating cut in [0.3, 0.6], got {cuts:?}",
        );
    }

    #[test]
    fn test_binarize_is_indicator_table() {
        let sample = test_sample();
        let thresholds = ThresholdSet::guess(&sample, 10);
        let binarized = thresholds.binarize(&sample);

        assert_eq!(binarized.shape().0, sample.shape().0);
        assert_eq!(binarized.shape().1, thresholds.n_cuts());
        assert_eq!(binarized.target(), sample.target());

        for feat in binarized.features() {
            assert!(
                feat.vals()
                    .iter()
                    .all(|v| *v == 0f64 || *v == 1f64),
                "column \"{}\" is not an indicator", feat.name(),
            );
        }
    }

    #[test]
    fn test_backward_eliminate_keeps_signal() {
        let sample = test_sample();
        let thresholds = ThresholdSet::guess(&sample, 10);
        let binarized = thresholds.binarize(&sample);

        let reduced = backward_eliminate(&binarized, 10);

        assert!(reduced.shape().1 >= 1);
        assert!(reduced.shape().1 <= binarized.shape().1);

        // The surviving table must still support a perfect ensemble.
        let f = fit_stump_ensemble(&reduced, 10);
        let acc = evaluate::accuracy(&reduced, &f);
        assert_eq!(acc, 1.0, "expected accuracy 1.0, got {acc}");
    }

    #[test]
    fn test_backward_eliminate_on_noisy_data() {
        // Positive iff both coordinates are large:
        // no single stump separates this, so guessing yields
        // several cuts and elimination has columns to drop.
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
        let sample = Sample::from_reader(reader, true)
            .unwrap()
            .set_target("class");

        let thresholds = ThresholdSet::guess(&sample, 20);
        let binarized = thresholds.binarize(&sample);
        assert!(binarized.shape().1 >= 2);

        let reduced = backward_eliminate(&binarized, 20);
        assert!(reduced.shape().1 >= 1);
        assert!(reduced.shape().1 <= binarized.shape().1);

        // Every surviving column is one of the original indicators.
        for name in reduced.feature_names() {
            assert!(
                binarized.feature_names().contains(&name),
                "unexpected column \"{name}\" after elimination",
            );
        }
    }

    #[test]
    fn test_backward_eliminate_single_column() {
        let sample = test_sample();
        let thresholds = ThresholdSet::guess(&sample, 10);
        let binarized = thresholds.binarize(&sample);

        // Reduce to one column by hand; elimination must keep it.
        let name = binarized.feature_names()[0].to_string();
        let single = Sample::from_parts(
            vec![binarized[&name].clone()],
            binarized.target().to_vec(),
        );
        let reduced = backward_eliminate(&single, 10);
        assert_eq!(reduced.shape().1, 1);
    }
}
