//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("manifest parse error: {0}")]
    ManifestParse(String),

    #[error("build metadata parse error: {0}")]
    MetadataParse(String),

    #[error("artifact inventory parse error: {0}")]
    ArtifactsParse(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
