use std::path::Path;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::collections::{HashMap, HashSet};
use std::ops::Index;

use rayon::prelude::*;
use super::feature::Feature;

/// A batch of training examples:
/// dense feature columns plus one target column.
///
/// Row order carries no meaning beyond weight alignment;
/// `weight[i]` always refers to row `i` of this table.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}

impl Sample {
    /// Read a CSV format file into [`Sample`].
    /// This method returns `Err` if the file does not exist.
    ///
    /// If the CSV file has no header row,
    /// a default name is assigned to each column:
    /// `Feat. [1]`, `Feat. [2]`, ..., `Feat. [n]`.
    ///
    /// **Do not forget** to call [`Sample::set_target`] to
    /// assign the class label.
    pub(crate) fn from_csv<P>(file: P, has_header: bool) -> io::Result<Self>
        where P: AsRef<Path>,
    {
        let file = File::open(file)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader, has_header)
    }

    /// Read a CSV table from a [`BufReader`].
    pub fn from_reader<R>(reader: BufReader<R>, mut has_header: bool)
        -> io::Result<Self>
        where R: Read,
    {
        let mut lines = reader.lines();

        let mut features = Vec::new();
        if has_header {
            let line = lines.next()
                .expect("Tried to read an empty CSV source");
            features = line?.split(',')
                .map(|name| Feature::new(name.trim()))
                .collect::<Vec<_>>();
        }
        let mut n_sample = 0_usize;

        for (i, line) in lines.enumerate() {
            let line = line?;

            // If the header does not exist, construct a dummy one
            // from the first data row.
            if !has_header {
                let xs = line.split(',')
                    .map(|x| {
                        x.trim().parse::<f64>()
                            .unwrap_or_else(|_| {
                                panic!(
                                    "The file contains a non-numerical \
                                     value. Got {x} in Line {i}"
                                )
                            })
                    })
                    .collect::<Vec<_>>();

                let n_feature = xs.len();
                features = (1..=n_feature).map(|k| {
                        let name = format!("Feat. [{k}]");
                        Feature::new(name)
                    })
                    .collect::<Vec<_>>();

                for (feat, x) in features.iter_mut().zip(xs) {
                    feat.append(x);
                }

                has_header = true;
                n_sample += 1;
                continue;
            }

            line.split(',')
                .map(|x| {
                    x.trim().parse::<f64>()
                        .unwrap_or_else(|_| {
                            panic!(
                                "The file contains a non-numerical value. \
                                 Got {x} in Line {i}"
                            )
                        })
                })
                .enumerate()
                .for_each(|(k, x)| {
                    features[k].append(x);
                });

            n_sample += 1;
        }

        let n_feature = features.len();
        let target = Vec::with_capacity(0);

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };

        Ok(sample)
    }

    /// Construct a sample from pre-built columns and a target vector.
    /// Every column must have exactly `target.len()` rows.
    pub fn from_parts(features: Vec<Feature>, target: Vec<f64>) -> Self {
        let n_sample = target.len();
        features.iter()
            .for_each(|feat| {
                assert_eq!(
                    feat.len(), n_sample,
                    "Column \"{}\" has {} rows, expected {n_sample}",
                    feat.name(), feat.len(),
                );
            });
        let n_feature = features.len();
        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        Self { name_to_index, features, target, n_sample, n_feature, }
    }

    /// Returns the slice of target values.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }

    /// Returns a slice of the features.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }

    /// The column names in their stored order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter()
            .map(|feat| feat.name())
            .collect()
    }

    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Self {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|feat| feat.name() == target)
            .unwrap_or_else(|| {
                panic!("The target class \"{target}\" does not exist")
            });

        let target = self.features.remove(pos).into_vals();
        self.target = target;
        self.n_feature -= 1;

        self.name_to_index = self.features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        self
    }

    /// Returns the pair of the number of examples and
    /// the number of features.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }

    /// Returns the `idx`-th instance `(x, y)`.
    pub fn at(&self, idx: usize) -> (Vec<f64>, f64) {
        let x = self.features.iter()
            .map(|feat| feat[idx])
            .collect::<Vec<f64>>();
        let y = self.target[idx];

        (x, y)
    }

    /// Build a new sample whose `k`-th row is row `ix[k]` of `self`.
    /// Indices may repeat or be omitted, so this single operation
    /// covers duplication, bootstrap draws, and plain filtering.
    pub fn select_rows<T>(&self, ix: T) -> Self
        where T: AsRef<[usize]>,
    {
        self.target_is_specified();
        let ix = ix.as_ref();

        let features = self.features
            .par_iter()
            .map(|feat| {
                let vals = ix.iter()
                    .map(|&i| feat[i])
                    .collect::<Vec<_>>();
                Feature::from_vals(feat.name(), vals)
            })
            .collect::<Vec<_>>();
        let target = ix.iter()
            .map(|&i| self.target[i])
            .collect::<Vec<_>>();

        Self::from_parts(features, target)
    }

    /// Returns `self` without the column named `name`.
    /// The target column is kept as is.
    pub fn without_feature<S: AsRef<str>>(&self, name: S) -> Self {
        let name = name.as_ref();
        assert!(
            self.name_to_index.contains_key(name),
            "The feature \"{name}\" does not exist",
        );
        let features = self.features.iter()
            .filter(|feat| feat.name() != name)
            .cloned()
            .collect::<Vec<_>>();
        Self::from_parts(features, self.target.clone())
    }

    /// Returns `self` with `feature` appended as the last column.
    pub fn with_feature(&self, feature: Feature) -> Self {
        assert!(
            !self.name_to_index.contains_key(feature.name()),
            "The feature \"{}\" already exists", feature.name(),
        );
        let mut features = self.features.clone();
        features.push(feature);
        Self::from_parts(features, self.target.clone())
    }

    /// Remap the two distinct target values onto `{-1, +1}`
    /// (the smaller value becomes `-1`).
    /// Panics when the target does not take exactly two values.
    pub fn into_binary_labels(mut self) -> Self {
        self.target_is_specified();

        let mut kinds = self.target.iter()
            .copied()
            .map(|y| {
                assert!(
                    y.trunc().eq(&y),
                    "Target values must be integers. Got {y}."
                );
                y as i64
            })
            .collect::<HashSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        kinds.sort_unstable();

        let n_label = kinds.len();
        assert_eq!(
            n_label, 2,
            "The target values take {n_label} kinds. Expected 2 kinds.",
        );

        let neg = kinds[0] as f64;
        self.target.iter_mut()
            .for_each(|y| {
                *y = if *y == neg { -1f64 } else { 1f64 };
            });
        self
    }

    fn target_is_specified(&self) {
        let n_sample = self.shape().0;

        if n_sample != self.target.len() {
            panic!(
                "The target class is not specified.\n\
                 Use `Sample::set_target(\"Column Name\")`."
            );
        }
    }

    /// Check whether `self` is
    /// a training set for binary classification or not.
    pub fn is_valid_binary_instance(&self) {
        self.target_is_specified();

        let set = self.target.iter()
            .copied()
            .map(|yi| yi as i64)
            .collect::<HashSet<_>>();
        let is_pm = set.iter().all(|y| y.eq(&1) || y.eq(&-1));
        if !is_pm {
            let line = set.iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            panic!(
                "The target values must take values in {{-1, +1}}. \
                 Currently, the labels are: [{line}]. \
                 Use `Sample::into_binary_labels`."
            );
        }
    }
}

impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;

    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = *self.name_to_index.get(name)
            .unwrap_or_else(|| {
                panic!("The feature \"{name}\" does not exist")
            });
        &self.features[k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_examples(bytes: &[u8], has_header: bool) -> Sample {
        let reader = BufReader::new(bytes);
        Sample::from_reader(reader, has_header)
            .unwrap()
            .set_target("class")
    }

    fn toy_sample() -> Sample {
        let bytes = b"\
            test,dummy,class\n\
            0.1,0.2,1.0\n\
            -8.0,2.0,-1.0\n\
            3.0,-9.0,1.0\n\
            -0.001,0.0,-1.0";
        training_examples(bytes, true)
    }

    #[test]
    fn test_from_reader() {
        let sample = toy_sample();
        let (n_sample, n_feature) = sample.shape();
        assert_eq!(n_sample, 4);
        assert_eq!(n_feature, 2);
        assert_eq!(sample.target(), &[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(sample["dummy"][2], -9.0);
    }

    #[test]
    fn test_select_rows_repeats() {
        let sample = toy_sample();
        let dup = sample.select_rows([0, 0, 3, 1]);

        let (n_sample, n_feature) = dup.shape();
        assert_eq!(n_sample, 4);
        assert_eq!(n_feature, 2);
        assert_eq!(dup.at(0), sample.at(0));
        assert_eq!(dup.at(1), sample.at(0));
        assert_eq!(dup.at(2), sample.at(3));
        assert_eq!(dup.at(3), sample.at(1));
    }

    #[test]
    fn test_select_rows_empty() {
        let sample = toy_sample();
        let empty = sample.select_rows([]);
        assert_eq!(empty.shape(), (0, 2));
    }

    #[test]
    fn test_without_and_with_feature() {
        let sample = toy_sample();
        let dropped = sample.without_feature("test");
        assert_eq!(dropped.shape(), (4, 1));

        let restored = dropped.with_feature(sample["test"].clone());
        assert_eq!(restored.shape(), (4, 2));
        assert_eq!(restored["test"][1], -8.0);
    }

    #[test]
    fn test_into_binary_labels() {
        let bytes = b"\
            feat,class\n\
            0.1,0.0\n\
            0.2,1.0\n\
            0.3,0.0";
        let sample = training_examples(bytes, true)
            .into_binary_labels();
        assert_eq!(sample.target(), &[-1.0, 1.0, -1.0]);
        sample.is_valid_binary_instance();
    }

    #[test]
    #[should_panic]
    fn test_into_binary_labels_single_class() {
        let bytes = b"\
            feat,class\n\
            0.1,1.0\n\
            0.2,1.0";
        let _ = training_examples(bytes, true).into_binary_labels();
    }
}
