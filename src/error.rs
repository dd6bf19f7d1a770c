use std::{error::Error, fmt, io};

/// The result type used across the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// All errors that can occur while preparing datasets or ranking predictions.
#[derive(Debug)]
pub enum PipelineError {
    /// A corpus source could not be read.
    SourceUnavailable { source_id: String, reason: String },
    /// A class collection has no samples and empty classes are not allowed.
    EmptyClass { class: usize },
    /// The declared number of classes doesn't match the given collections.
    InvalidClassCount { got: usize, expected: usize },
    /// A sample's feature length differs from the first sample seen.
    FeatureSizeMismatch {
        class: usize,
        index: usize,
        got: usize,
        expected: usize,
    },
    /// A ranked score points past the end of the label list.
    LabelIndexOutOfRange { index: usize, labels: usize },
    /// Invalid configuration, caught before running any stage.
    InvalidConfig(String),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl PipelineError {
    /// Builds a `SourceUnavailable` error from any displayable failure reason.
    ///
    /// # Arguments
    /// * `source_id` - The identifier of the source that failed.
    /// * `reason` - What went wrong.
    pub fn unavailable(source_id: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { source_id, reason } => {
                write!(f, "source '{source_id}' is unavailable: {reason}")
            }
            Self::EmptyClass { class } => write!(f, "class {class} has no samples"),
            Self::InvalidClassCount { got, expected } => write!(
                f,
                "invalid class count: got {got} class collections, expected {expected}"
            ),
            Self::FeatureSizeMismatch {
                class,
                index,
                got,
                expected,
            } => write!(
                f,
                "sample {index} of class {class} has {got} features, expected {expected}"
            ),
            Self::LabelIndexOutOfRange { index, labels } => write!(
                f,
                "score index {index} is out of range for {labels} label(s)"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<PipelineError> for io::Error {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::Io(e) => e,
            other @ PipelineError::SourceUnavailable { .. } => {
                io::Error::new(io::ErrorKind::NotFound, other)
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_keeps_source_and_reason() {
        let err = PipelineError::unavailable("corpus.txt", "no such file");
        assert_eq!(
            err.to_string(),
            "source 'corpus.txt' is unavailable: no such file"
        );
    }

    #[test]
    fn io_errors_round_trip_through_the_boundary() {
        let err = PipelineError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.source().is_some());

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn domain_errors_become_invalid_data() {
        let err = PipelineError::LabelIndexOutOfRange { index: 3, labels: 2 };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
