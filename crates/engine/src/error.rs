//! Engine error types.

use depot_storage::StorageError;
use thiserror::Error;

/// Errors returned by the ingestion and retention engines.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no artifacts in release {0}")]
    NoArtifacts(String),

    #[error("unable to determine artifact base path for {0}")]
    UnresolvedArtifactRoot(String),

    #[error("invalid version {0:?}: must be a single path segment")]
    InvalidVersion(String),

    #[error("version already exists: {0}")]
    VersionExists(String),

    #[error("error making release directory {tag}: {source}")]
    CreateReleaseDir {
        tag: String,
        #[source]
        source: StorageError,
    },

    #[error("unable to remove release files for {tag}: {source}")]
    RemoveRelease {
        tag: String,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] depot_core::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
