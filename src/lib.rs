pub mod config;
pub mod data;
pub mod error;
pub mod predict;
pub mod sampler;
pub mod shuffle;

pub use config::{PipelineConfig, VALIDATION_FRACTION};
pub use data::{
    BatchRef, DataLoader, DatasetBuilder, DatasetSplit, LabeledDataset, LabeledExample, Sample,
    one_hot, split_sizes,
};
pub use error::{PipelineError, Result};
pub use predict::{
    DEFAULT_TOP_K, ModelOutput, Prediction, rank_classes, softmax, top_k, top_k_classes,
    top_k_from_logits,
};
pub use sampler::{
    CorpusSource, FileSource, HttpSource, SAMPLE_CAP, Sampler, Source, sample_corpus, source_for,
};
pub use shuffle::{Shuffler, fisher_yates, fisher_yates_in_place};
