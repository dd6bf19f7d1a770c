pub mod builder;
pub mod dataloader;
pub mod dataset;

pub use builder::{DatasetBuilder, split_sizes};
pub use dataloader::{BatchRef, DataLoader};
pub use dataset::{DatasetSplit, LabeledDataset, LabeledExample, Sample, one_hot};
