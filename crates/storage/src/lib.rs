//! Storage for depot release repositories.
//!
//! This crate provides:
//! - A repository tree abstraction with a local filesystem backend
//! - Manifest load and save
//! - Readers for build tool release output
//! - Artifact root detection

pub mod backends;
pub mod error;
pub mod inputs;
pub mod manifest_store;
pub mod resolve;
pub mod traits;

pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use manifest_store::ManifestStore;
pub use resolve::{ArtifactRoot, resolve_artifact_root};
pub use traits::RepoStore;
