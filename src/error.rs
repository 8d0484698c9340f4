//! Error types for the analysis pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors surfaced at the run boundary.
#[derive(Debug, Error)]
pub enum FishboneError {
    /// Missing or invalid startup configuration, such as an absent API key.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input rejected before any inference call was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// An inference call failed; the run is aborted.
    #[error("Analysis unavailable during {stage}: {source}")]
    AnalysisUnavailable {
        stage: String,
        #[source]
        source: ProviderError,
    },

    /// An assembled result violates a structural invariant.
    #[error("Malformed analysis result: {0}")]
    MalformedResult(String),

    /// The result could not be persisted.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A saved result could not be read back.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FishboneError {
    pub(crate) fn unavailable(stage: impl Into<String>, source: ProviderError) -> Self {
        Self::AnalysisUnavailable {
            stage: stage.into(),
            source,
        }
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
