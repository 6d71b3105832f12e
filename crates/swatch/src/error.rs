//! Facade error types.

use std::path::PathBuf;

use swatch_dispatch::{
    ConfigurationError, ExtractionFailure, PipelineError, ProviderError, SerializeError,
};
use thiserror::Error;

/// Configuration files that cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Everything a [`Swatch`](crate::Swatch) call can fail with.
#[derive(Debug, Error)]
pub enum SwatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl From<ProviderError> for SwatchError {
    fn from(err: ProviderError) -> Self {
        SwatchError::Extraction(err.into())
    }
}

impl From<PipelineError> for SwatchError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Configuration(e) => SwatchError::Configuration(e),
            PipelineError::Extraction(e) => SwatchError::Extraction(e),
        }
    }
}
