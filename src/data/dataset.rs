use std::num::NonZeroUsize;

use ndarray::{Array1, Array2, ArrayView1, Axis, ShapeError};

use super::dataloader::DataLoader;
use crate::error::{PipelineError, Result};

/// A single feature vector. Its class is implied by the collection holding it.
pub type Sample = Array1<f32>;

/// A sample paired with the one-hot encoding of its class.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    data: Sample,
    label: Array1<f32>,
    class: usize,
}

impl LabeledExample {
    /// Creates a new `LabeledExample`.
    ///
    /// # Arguments
    /// * `data` - The feature vector.
    /// * `class` - The class index the sample belongs to.
    /// * `num_classes` - The length of the one-hot label.
    pub fn new(data: Sample, class: usize, num_classes: usize) -> Self {
        Self {
            data,
            label: one_hot(class, num_classes),
            class,
        }
    }

    /// Same as `new` but reusing an already built label, it must be the one-hot of `class`.
    pub(crate) fn with_label(data: Sample, label: Array1<f32>, class: usize) -> Self {
        Self { data, label, class }
    }

    #[inline]
    pub fn data(&self) -> &Sample {
        &self.data
    }

    #[inline]
    pub fn label(&self) -> &Array1<f32> {
        &self.label
    }

    #[inline]
    pub fn class(&self) -> usize {
        self.class
    }
}

/// Returns the one-hot encoding of `class`: a vector of `num_classes` zeros with a single `1.0`
/// at position `class`. A `class` outside the range yields all zeros.
pub fn one_hot(class: usize, num_classes: usize) -> Array1<f32> {
    let mut label = Array1::zeros(num_classes);
    if let Some(slot) = label.get_mut(class) {
        *slot = 1.0;
    }
    label
}

/// A materialized set of labeled examples, stored row-wise so batches are zero-copy views.
///
/// Row `i` of `xs` holds the features of example `i` and row `i` of `ys` its one-hot label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    xs: Array2<f32>,
    ys: Array2<f32>,
}

impl LabeledDataset {
    /// Stacks `examples` into a dataset, keeping their order.
    ///
    /// # Arguments
    /// * `examples` - The examples, all with `num_features` features and `num_classes` labels.
    /// * `num_features` - The feature vector length.
    /// * `num_classes` - The label vector length.
    ///
    /// # Returns
    /// An error if any example doesn't have the given shape.
    pub fn from_examples(
        examples: &[LabeledExample],
        num_features: usize,
        num_classes: usize,
    ) -> Result<Self> {
        let n = examples.len();
        let mut xs = Vec::with_capacity(n * num_features);
        let mut ys = Vec::with_capacity(n * num_classes);

        for (index, example) in examples.iter().enumerate() {
            let got = example.data.len();
            if got != num_features {
                return Err(PipelineError::FeatureSizeMismatch {
                    class: example.class,
                    index,
                    got,
                    expected: num_features,
                });
            }

            xs.extend(example.data.iter().copied());
            ys.extend(example.label.iter().copied());
        }

        let shape_err =
            |e: ShapeError| PipelineError::InvalidConfig(format!("malformed dataset: {e}"));
        let xs = Array2::from_shape_vec((n, num_features), xs).map_err(shape_err)?;
        let ys = Array2::from_shape_vec((n, num_classes), ys).map_err(shape_err)?;

        Ok(Self { xs, ys })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.xs.ncols()
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.ys.ncols()
    }

    /// Returns the `(xs, ys)` pair at `idx`, or `None` if out of bounds.
    pub fn get(&self, idx: usize) -> Option<(ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        if idx >= self.len() {
            return None;
        }

        Some((self.xs.row(idx), self.ys.row(idx)))
    }

    /// Lazily yields the `(xs, ys)` pairs in dataset order.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = (ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        self.xs.outer_iter().zip(self.ys.outer_iter())
    }

    /// Lazily yields the class index of every example, in dataset order.
    pub fn classes(&self) -> impl Iterator<Item = usize> + '_ {
        self.ys
            .axis_iter(Axis(0))
            .map(|row| row.iter().position(|&v| v == 1.0).unwrap_or(usize::MAX))
    }

    /// Every feature vector, one per row.
    #[inline]
    pub fn xs(&self) -> &Array2<f32> {
        &self.xs
    }

    /// Every one-hot label, one per row.
    #[inline]
    pub fn ys(&self) -> &Array2<f32> {
        &self.ys
    }

    /// Creates a loader yielding borrowed batches of at most `batch_size` rows.
    pub fn batches(&self, batch_size: NonZeroUsize) -> DataLoader<'_> {
        DataLoader::new(self, batch_size)
    }

    /// Consumes the dataset, returning the `(xs, ys)` matrices.
    pub fn into_arrays(self) -> (Array2<f32>, Array2<f32>) {
        (self.xs, self.ys)
    }
}

/// The train and validation datasets produced from the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train: LabeledDataset,
    pub validation: LabeledDataset,
}

impl DatasetSplit {
    /// Total number of examples across both datasets.
    pub fn len(&self) -> usize {
        self.train.len() + self.validation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
