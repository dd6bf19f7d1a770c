mod corpus;
mod source;

use std::num::NonZeroUsize;

use log::debug;
use rand::{Rng, rngs::StdRng};

pub use corpus::CorpusSource;
pub use source::{FileSource, HttpSource, Source, source_for};

use crate::{config::PipelineConfig, error::Result, shuffle::Shuffler};

/// Maximum number of corpus lines kept as training candidates.
pub const SAMPLE_CAP: usize = 100;

/// Trims raw corpora down to a bounded, randomly chosen pool of lines.
///
/// The full line set is shuffled before truncating, so the kept lines don't depend on their
/// position in the corpus.
#[derive(Debug, Clone)]
pub struct Sampler<R: Rng = StdRng> {
    cap: NonZeroUsize,
    shuffler: Shuffler<R>,
}

impl Sampler<StdRng> {
    /// Creates a `Sampler` following `config`'s cap and seed.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.sample_cap, Shuffler::new(config.seed))
    }
}

impl Default for Sampler<StdRng> {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl<R: Rng> Sampler<R> {
    /// Creates a new `Sampler`.
    ///
    /// # Arguments
    /// * `cap` - The maximum number of lines to keep.
    /// * `shuffler` - The shuffler used to pick the lines.
    pub fn new(cap: NonZeroUsize, shuffler: Shuffler<R>) -> Self {
        Self { cap, shuffler }
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.cap.get()
    }

    /// Splits `text` on newlines, shuffles every line and keeps at most `cap` of them.
    pub fn sample_text(&mut self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut lines = self.shuffler.shuffle_vec(lines);
        lines.truncate(self.cap.get());
        lines.into_iter().map(str::to_owned).collect()
    }

    /// Fetches `source` and samples its lines.
    ///
    /// # Returns
    /// `SourceUnavailable` if the source can't be read.
    pub async fn sample_lines<S: CorpusSource>(&mut self, source: &S) -> Result<Vec<String>> {
        let text = source.fetch().await?;
        let lines = self.sample_text(&text);
        debug!(source = source.id(); "sampled {} line(s)", lines.len());
        Ok(lines)
    }

    /// Fetches `source` and samples its lines, joined back into a newline separated blob.
    ///
    /// # Returns
    /// `SourceUnavailable` if the source can't be read.
    pub async fn sample<S: CorpusSource>(&mut self, source: &S) -> Result<String> {
        Ok(self.sample_lines(source).await?.join("\n"))
    }
}

/// Fetches the corpus identified by `id` (a URL or a path) and returns up to [`SAMPLE_CAP`]
/// randomly chosen lines joined by newlines.
///
/// # Errors
/// `SourceUnavailable` if the corpus can't be read.
pub async fn sample_corpus(id: &str) -> Result<String> {
    Sampler::default().sample(&source_for(id)).await
}
