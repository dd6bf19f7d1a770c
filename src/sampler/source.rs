use std::path::PathBuf;

use super::corpus::CorpusSource;
use crate::error::{PipelineError, Result};

/// A corpus stored in a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    id: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            path,
        }
    }
}

impl CorpusSource for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PipelineError::unavailable(&self.id, e))
    }
}

/// A corpus served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Reuses an existing client, sharing its connection pool.
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl CorpusSource for HttpSource {
    fn id(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String> {
        let unavailable = |e: reqwest::Error| PipelineError::unavailable(&self.url, e);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?;

        let body = response.bytes().await.map_err(unavailable)?;
        String::from_utf8(body.to_vec()).map_err(|e| PipelineError::unavailable(&self.url, e))
    }
}

/// Either built-in source, picked from an identifier.
#[derive(Debug, Clone)]
pub enum Source {
    File(FileSource),
    Http(HttpSource),
}

/// Returns an `HttpSource` for `http://` and `https://` identifiers and a `FileSource` for
/// anything else.
pub fn source_for(id: &str) -> Source {
    if id.starts_with("http://") || id.starts_with("https://") {
        Source::Http(HttpSource::new(id))
    } else {
        Source::File(FileSource::new(id))
    }
}

impl CorpusSource for Source {
    fn id(&self) -> &str {
        match self {
            Source::File(s) => s.id(),
            Source::Http(s) => s.id(),
        }
    }

    async fn fetch(&self) -> Result<String> {
        match self {
            Source::File(s) => s.fetch().await,
            Source::Http(s) => s.fetch().await,
        }
    }
}
