use std::{fs, num::NonZeroUsize, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{PipelineError, Result},
    predict::DEFAULT_TOP_K,
    sampler::SAMPLE_CAP,
};

/// Fraction of every class held out for validation.
pub const VALIDATION_FRACTION: f64 = 0.15;

const DEFAULT_SAMPLE_CAP: NonZeroUsize = NonZeroUsize::new(SAMPLE_CAP).unwrap();

/// Tunable knobs for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PipelineConfig {
    /// Per-class fraction of samples routed to the validation split, in `[0, 1]`.
    pub validation_fraction: f64,
    /// Maximum number of lines kept by the sampler.
    pub sample_cap: NonZeroUsize,
    /// How many predictions the top-k extractor returns.
    pub top_k: usize,
    /// Seed for every shuffle of the run, `None` for a non-deterministic run.
    pub seed: Option<u64>,
    /// Whether a class with no samples is skipped (`true`) or rejected (`false`).
    pub allow_empty_classes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validation_fraction: VALIDATION_FRACTION,
            sample_cap: DEFAULT_SAMPLE_CAP,
            top_k: DEFAULT_TOP_K,
            seed: None,
            allow_empty_classes: true,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a config from a JSON string. Missing fields take their default.
    ///
    /// # Errors
    /// `InvalidConfig` if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    /// `Io` if the file can't be read, `InvalidConfig` if it can't be parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("loaded pipeline config from {}", path.display());
        Self::from_json(&content)
    }

    /// Checks every field is within range.
    pub fn validate(&self) -> Result<()> {
        let fraction = self.validation_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PipelineError::InvalidConfig(format!(
                "validation_fraction must be within [0, 1], got {fraction}"
            )));
        }

        Ok(())
    }
}
