//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// A release repository tree addressed by slash-separated keys relative to
/// the repository root.
///
/// Implementations must reject keys that would resolve outside the root.
#[async_trait]
pub trait RepoStore: Send + Sync {
    /// The repository root on disk.
    fn root(&self) -> &Path;

    /// Size in bytes of the file at `key`.
    async fn size(&self, key: &str) -> StorageResult<u64>;

    /// Read the whole file at `key`.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Write `data` to `key`, replacing any existing file.
    ///
    /// Data is flushed to disk before this returns.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Create the directory at `key` and any missing parents.
    ///
    /// Returns `false` if it already existed.
    async fn create_dir(&self, key: &str) -> StorageResult<bool>;

    /// Durably copy the external file at `source` to `key`, creating parent
    /// directories as needed. Returns the number of bytes copied.
    async fn copy_from(&self, source: &Path, key: &str) -> StorageResult<u64>;

    /// Recursively remove the directory at `key`. A missing directory is not an error.
    async fn remove_dir_all(&self, key: &str) -> StorageResult<()>;

    /// Point the symbolic link at `key` to the relative `target`, replacing
    /// any existing link.
    async fn repoint_link(&self, key: &str, target: &str) -> StorageResult<()>;
}
