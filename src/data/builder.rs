use log::{debug, warn};
use rand::Rng;

use super::dataset::{DatasetSplit, LabeledDataset, LabeledExample, Sample, one_hot};
use crate::{
    config::{PipelineConfig, VALIDATION_FRACTION},
    error::{PipelineError, Result},
    shuffle::Shuffler,
};

/// Returns `(num_train, num_validation)` for a class of `len` samples.
///
/// The validation share is rounded up, so any non-empty class keeps at least one validation
/// sample when `fraction > 0`.
pub fn split_sizes(len: usize, fraction: f64) -> (usize, usize) {
    let num_validation = ((fraction * len as f64).ceil() as usize).min(len);
    (len - num_validation, num_validation)
}

/// Builds stratified train/validation datasets out of per-class sample collections.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    validation_fraction: f64,
    allow_empty_classes: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self {
            validation_fraction: VALIDATION_FRACTION,
            allow_empty_classes: true,
        }
    }
}

impl DatasetBuilder {
    /// Creates a new `DatasetBuilder` holding out 15% of every class.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `DatasetBuilder` following `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            validation_fraction: config.validation_fraction,
            allow_empty_classes: config.allow_empty_classes,
        }
    }

    /// Sets the fraction of every class routed to validation.
    pub fn validation_fraction(mut self, fraction: f64) -> Self {
        self.validation_fraction = fraction;
        self
    }

    /// Sets whether classes without samples are skipped or rejected.
    pub fn allow_empty_classes(mut self, allow: bool) -> Self {
        self.allow_empty_classes = allow;
        self
    }

    /// Shuffles, splits and labels `examples` into a train and a validation dataset.
    ///
    /// Each class is shuffled on its own and split so that `ceil(fraction * len)` samples go
    /// to validation and the rest to training. The per-class subsets are concatenated in class
    /// order and both pools are shuffled once more to interleave the classes. All shuffles
    /// draw from `shuffler` in that order.
    ///
    /// # Arguments
    /// * `examples` - One collection of samples per class, indexed by class.
    /// * `num_classes` - The number of classes, must equal `examples.len()`.
    /// * `shuffler` - The shuffler every stage draws from.
    ///
    /// # Errors
    /// * `InvalidClassCount` if `num_classes` doesn't match the number of collections.
    /// * `FeatureSizeMismatch` if the samples don't all have the same length.
    /// * `EmptyClass` if a collection is empty and empty classes aren't allowed.
    /// * `InvalidConfig` if the validation fraction is outside `[0, 1]`.
    pub fn build<R: Rng>(
        &self,
        examples: Vec<Vec<Sample>>,
        num_classes: usize,
        shuffler: &mut Shuffler<R>,
    ) -> Result<DatasetSplit> {
        self.validate(&examples, num_classes)?;
        let num_features = feature_size(&examples)?;

        let examples: Vec<Vec<Sample>> = examples
            .into_iter()
            .map(|class| shuffler.shuffle_vec(class))
            .collect();

        let mut train = Vec::new();
        let mut validation = Vec::new();

        for (class, samples) in examples.into_iter().enumerate() {
            if samples.is_empty() {
                warn!(class = class; "class has no samples, skipping");
                continue;
            }

            let y = one_hot(class, num_classes);
            let (num_train, num_validation) = split_sizes(samples.len(), self.validation_fraction);
            debug!(class = class, train = num_train, validation = num_validation; "split class");

            for (i, data) in samples.into_iter().enumerate() {
                let example = LabeledExample::with_label(data, y.clone(), class);
                if i < num_train {
                    train.push(example);
                } else {
                    validation.push(example);
                }
            }
        }

        let train = shuffler.shuffle_vec(train);
        let validation = shuffler.shuffle_vec(validation);

        debug!(
            "dataset built: {} training, {} validation",
            train.len(),
            validation.len()
        );

        Ok(DatasetSplit {
            train: LabeledDataset::from_examples(&train, num_features, num_classes)?,
            validation: LabeledDataset::from_examples(&validation, num_features, num_classes)?,
        })
    }

    fn validate(&self, examples: &[Vec<Sample>], num_classes: usize) -> Result<()> {
        let fraction = self.validation_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PipelineError::InvalidConfig(format!(
                "validation_fraction must be within [0, 1], got {fraction}"
            )));
        }

        if examples.len() != num_classes {
            return Err(PipelineError::InvalidClassCount {
                got: examples.len(),
                expected: num_classes,
            });
        }

        let first_empty = examples.iter().position(Vec::is_empty);
        if let Some(class) = first_empty.filter(|_| !self.allow_empty_classes) {
            return Err(PipelineError::EmptyClass { class });
        }

        Ok(())
    }
}

/// Returns the feature length shared by every sample, `0` if there are none.
fn feature_size(examples: &[Vec<Sample>]) -> Result<usize> {
    let Some(expected) = examples.iter().flatten().map(|s| s.len()).next() else {
        return Ok(0);
    };

    for (class, samples) in examples.iter().enumerate() {
        for (index, sample) in samples.iter().enumerate() {
            if sample.len() != expected {
                return Err(PipelineError::FeatureSizeMismatch {
                    class,
                    index,
                    got: sample.len(),
                    expected,
                });
            }
        }
    }

    Ok(expected)
}
