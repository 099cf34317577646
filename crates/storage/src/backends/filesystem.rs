//! Local filesystem storage backend.

use crate::error::{StorageError, StorageResult};
use crate::traits::RepoStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Repository tree on the local filesystem.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend, creating the root if it is missing.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Lexical key validation: only normal components, no traversal.
    fn lexical_path(root: &Path, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(format!(
                "key must be a relative path: {key:?}"
            )));
        }

        for component in Path::new(key).components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidKey(format!(
                        "contains unsafe path component: {key}"
                    )));
                }
            }
        }

        Ok(root.join(key))
    }

    /// Get the full path for a key, with path traversal protection.
    ///
    /// The checks hit the filesystem, so they run on the blocking pool.
    async fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        let root = self.root.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || Self::key_path_sync(&root, &key))
            .await
            .map_err(|e| {
                StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}")))
            })?
    }

    /// Existing paths are canonicalized and must stay inside the root. For new
    /// paths the nearest existing ancestor must stay inside the root, so a
    /// symlinked directory cannot redirect writes elsewhere.
    fn key_path_sync(root: &Path, key: &str) -> StorageResult<PathBuf> {
        let path = Self::lexical_path(root, key)?;
        let root_canonical = root.canonicalize().map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize root: {e}"),
            ))
        })?;

        let mut candidate = Some(path.as_path());
        while let Some(current) = candidate {
            match std::fs::symlink_metadata(current) {
                Ok(meta) => {
                    let canonical = current.canonicalize().map_err(|e| {
                        if meta.file_type().is_symlink() {
                            StorageError::InvalidKey(format!(
                                "symlink target missing or invalid: {key}"
                            ))
                        } else {
                            StorageError::Io(e)
                        }
                    })?;
                    if !canonical.starts_with(&root_canonical) {
                        return Err(StorageError::InvalidKey(format!(
                            "resolved path escapes storage root: {key}"
                        )));
                    }
                    break;
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(StorageError::Io(err)),
            }
            candidate = current.parent();
        }

        Ok(path)
    }

    /// Path for a link key. The link itself is not followed, since it may
    /// point at a release that has since been pruned.
    async fn link_path(&self, key: &str) -> StorageResult<PathBuf> {
        let path = Self::lexical_path(&self.root, key)?;
        if let Some(parent) = path.parent() {
            if parent != self.root {
                let parent_key = parent
                    .strip_prefix(&self.root)
                    .map_err(|_| StorageError::InvalidKey(key.to_string()))?;
                self.key_path(&parent_key.to_string_lossy()).await?;
            }
        }
        Ok(path)
    }

    /// Temp file next to `path`; renamed over it once flushed.
    fn temp_path(path: &Path) -> PathBuf {
        let temp_name = format!(".tmp.{}", Uuid::new_v4());
        path.with_file_name(
            path.file_name()
                .map(|n| format!("{}{}", n.to_string_lossy(), temp_name))
                .unwrap_or_else(|| temp_name.clone()),
        )
    }

    /// Ensure parent directory exists.
    async fn ensure_parent(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RepoStore for FilesystemBackend {
    fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn size(&self, key: &str) -> StorageResult<u64> {
        let path = self.key_path(key).await?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::from_io(e, key))?;
        Ok(metadata.len())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.key_path(key).await?;
        let data = fs::read(&path)
            .await
            .map_err(|e| StorageError::from_io(e, key))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_path(key).await?;
        self.ensure_parent(&path).await?;

        let temp_path = Self::temp_path(&path);
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        if let Err(err) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(err));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn create_dir(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_path(key).await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        match fs::create_dir(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn copy_from(&self, source: &Path, key: &str) -> StorageResult<u64> {
        let path = self.key_path(key).await?;
        self.ensure_parent(&path).await?;

        let mut src = fs::File::open(source)
            .await
            .map_err(|e| StorageError::from_io(e, source.display()))?;

        let temp_path = Self::temp_path(&path);
        let copied = async {
            let mut dst = fs::File::create(&temp_path).await?;
            let copied = tokio::io::copy(&mut src, &mut dst).await?;
            dst.sync_all().await?;
            drop(dst);
            fs::rename(&temp_path, &path).await?;
            Ok::<_, std::io::Error>(copied)
        }
        .await;

        match copied {
            Ok(copied) => Ok(copied),
            Err(err) => {
                let _ = fs::remove_file(&temp_path).await;
                Err(StorageError::Io(err))
            }
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn remove_dir_all(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key).await?;
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn repoint_link(&self, key: &str, target: &str) -> StorageResult<()> {
        let path = self.link_path(key).await?;
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io(e)),
        }

        #[cfg(unix)]
        fs::symlink(target, &path).await?;
        #[cfg(windows)]
        fs::symlink_dir(target, &path).await?;

        Ok(())
    }
}
