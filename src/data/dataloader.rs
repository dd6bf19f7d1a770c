use std::num::NonZeroUsize;

use ndarray::{ArrayView2, s};

use super::dataset::LabeledDataset;

/// Borrowed batch view (zero-copy), one example per row.
#[derive(Debug, Clone, Copy)]
pub struct BatchRef<'a> {
    pub xs: ArrayView2<'a, f32>,
    pub ys: ArrayView2<'a, f32>,
}

impl BatchRef<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// DataLoader producing borrowed `(xs, ys)` batches in dataset order.
#[derive(Debug, Clone)]
pub struct DataLoader<'a> {
    dataset: &'a LabeledDataset,
    batch_size: NonZeroUsize,
    cursor: usize,
}

impl<'a> DataLoader<'a> {
    pub fn new(dataset: &'a LabeledDataset, batch_size: NonZeroUsize) -> Self {
        Self {
            dataset,
            batch_size,
            cursor: 0,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Returns the next borrowed batch, or None if exhausted.
    pub fn next_batch(&mut self) -> Option<BatchRef<'a>> {
        let total = self.dataset.len();
        if self.cursor >= total {
            return None;
        }

        let end = (self.cursor + self.batch_size.get()).min(total);

        let xs = self.dataset.xs().slice(s![self.cursor..end, ..]);
        let ys = self.dataset.ys().slice(s![self.cursor..end, ..]);

        self.cursor = end;
        Some(BatchRef { xs, ys })
    }
}

impl<'a> Iterator for DataLoader<'a> {
    type Item = BatchRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}
