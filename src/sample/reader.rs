use std::path::Path;
use std::io;

use super::sample_struct::Sample;

/// A struct that returns [`Sample`].
/// Using this struct, one can read a CSV file to [`Sample`].
/// Other formats are not supported.
///
/// # Example
/// The following code is a simple example to read a CSV file.
/// ```no_run
/// use treesample::SampleReader;
/// let filename = "/path/to/csv/file.csv";
/// let sample = SampleReader::default()
///     .file(filename)
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// ```
pub struct SampleReader<P, S> {
    file: Option<P>,
    has_header: bool,
    target: Option<S>,
}

impl<P, S> Default for SampleReader<P, S> {
    fn default() -> Self {
        Self {
            file: None,
            has_header: false,
            target: None,
        }
    }
}

impl<P, S> SampleReader<P, S> {
    /// Set the flag whether the file has the header row or not.
    /// Default is `false.`
    pub fn has_header(mut self, flag: bool) -> Self {
        self.has_header = flag;
        self
    }
}

impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }
}

impl<P, S> SampleReader<P, S>
    where S: AsRef<str>
{
    /// Set the column name that is used for target label.
    /// When no target column is set, the last column of the file
    /// is used (the harness convention: the label column is last).
    pub fn target_feature(mut self, column: S) -> Self {
        self.target = Some(column);
        self
    }
}

impl<P, S> SampleReader<P, S>
    where P: AsRef<Path>,
          S: AsRef<str>
{
    /// Reads the file based on the arguments,
    /// and returns `std::io::Result<Sample>`.
    /// This method consumes `self.`
    pub fn read(self) -> io::Result<Sample> {
        if self.file.is_none() {
            panic!("The CSV file name is not set");
        }
        let file = self.file.unwrap();
        let file = file.as_ref();

        let sample = Sample::from_csv(file, self.has_header)?;
        let sample = match self.target {
            Some(target) => sample.set_target(target.as_ref()),
            None => {
                let last = sample.feature_names()
                    .last()
                    .map(|name| name.to_string())
                    .expect("The CSV file has no columns");
                sample.set_target(last)
            },
        };
        Ok(sample)
    }
}
