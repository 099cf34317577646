//! Readers for a build tool's release output directory.

use crate::error::{StorageError, StorageResult};
use depot_core::{Artifact, BuildMetadata};
use std::path::Path;

async fn read_document(path: &Path) -> StorageResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::from_io(e, path.display()))
}

/// Read the release metadata document from `dir`.
pub async fn read_metadata(dir: &Path, file_name: &str) -> StorageResult<BuildMetadata> {
    let path = dir.join(file_name);
    let json = read_document(&path).await?;
    BuildMetadata::from_json(&json).map_err(|source| StorageError::Parse { path, source })
}

/// Read the artifact inventory from `dir`.
///
/// An empty inventory is returned as-is; rejecting it is up to the caller.
pub async fn read_artifacts(dir: &Path, file_name: &str) -> StorageResult<Vec<Artifact>> {
    let path = dir.join(file_name);
    let json = read_document(&path).await?;
    Artifact::list_from_json(&json).map_err(|source| StorageError::Parse { path, source })
}
