use crate::error::Result;

/// Somewhere a raw text corpus can be read from.
#[allow(unused)]
#[trait_variant::make(CorpusSource: Send)]
pub trait LocalCorpusSource {
    /// Identifies the source in logs and errors.
    fn id(&self) -> &str;

    /// Reads the full text of the corpus.
    ///
    /// # Returns
    /// `SourceUnavailable` if the corpus can't be read.
    async fn fetch(&self) -> Result<String>;
}
