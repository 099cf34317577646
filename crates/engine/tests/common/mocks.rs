use async_trait::async_trait;
use bytes::Bytes;
use depot_storage::error::{StorageError, StorageResult};
use depot_storage::{FilesystemBackend, RepoStore};
use std::path::Path;
use std::sync::Mutex;

/// Filesystem backend that fails selected operations on demand.
#[allow(dead_code)]
pub struct FlakyStore {
    pub inner: FilesystemBackend,
    /// Directory keys whose removal fails.
    pub fail_remove: Vec<String>,
    /// Copies whose destination key ends with one of these fail.
    pub fail_copy: Vec<String>,
    pub fail_link: bool,
    /// Directory removals attempted, in order.
    pub removed: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub async fn new(root: &Path) -> Self {
        Self {
            inner: FilesystemBackend::new(root).await.unwrap(),
            fail_remove: Vec::new(),
            fail_copy: Vec::new(),
            fail_link: false,
            removed: Mutex::new(Vec::new()),
        }
    }

    fn injected(what: &str) -> StorageError {
        StorageError::Io(std::io::Error::other(format!("injected failure: {what}")))
    }
}

#[async_trait]
impl RepoStore for FlakyStore {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    async fn size(&self, key: &str) -> StorageResult<u64> {
        self.inner.size(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.inner.put(key, data).await
    }

    async fn create_dir(&self, key: &str) -> StorageResult<bool> {
        self.inner.create_dir(key).await
    }

    async fn copy_from(&self, source: &Path, key: &str) -> StorageResult<u64> {
        if self.fail_copy.iter().any(|suffix| key.ends_with(suffix.as_str())) {
            return Err(Self::injected(key));
        }
        self.inner.copy_from(source, key).await
    }

    async fn remove_dir_all(&self, key: &str) -> StorageResult<()> {
        self.removed.lock().unwrap().push(key.to_string());
        if self.fail_remove.iter().any(|k| k == key) {
            return Err(Self::injected(key));
        }
        self.inner.remove_dir_all(key).await
    }

    async fn repoint_link(&self, key: &str, target: &str) -> StorageResult<()> {
        if self.fail_link {
            return Err(Self::injected(key));
        }
        self.inner.repoint_link(key, target).await
    }
}
