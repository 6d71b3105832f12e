//! Error types for page providers and extraction.
//!
//! - [`ConfigurationError`]: the request itself is wrong. Fatal, raised before
//!   any provider work.
//! - [`ProviderError`]: the rendered-page provider failed.
//! - [`ExtractionFailure`]: a collection could not be completed, either
//!   because the provider failed or because a probe returned data that does not
//!   decode. Isolated per stage inside a pipeline.

use thiserror::Error;

/// Failures reported by a [`PageProvider`](crate::PageProvider) or
/// [`RenderedPage`](crate::RenderedPage).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to start page provider: {0}")]
    Launch(String),

    #[error("failed to open a page: {0}")]
    Acquire(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("probe '{probe}' failed: {message}")]
    Evaluation { probe: String, message: String },

    #[error("pixel capture failed: {0}")]
    Capture(String),

    #[error("page is closed")]
    Closed,
}

/// Invalid extraction requests and stage registrations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("a URL is required")]
    MissingUrl,

    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("stage name must not be empty")]
    EmptyStageName,

    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}

/// A collection that could not be completed.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("probe '{probe}' returned data that does not decode: {source}")]
    Decode {
        probe: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that end a pipeline run as a whole.
///
/// Stage failures never appear here; they become unavailable results.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        PipelineError::Extraction(err.into())
    }
}
