//! Manifest persistence.

use crate::error::{StorageError, StorageResult};
use crate::traits::RepoStore;
use bytes::Bytes;
use depot_core::Manifest;

/// Loads and rewrites the manifest document at the repository root.
pub struct ManifestStore<'a> {
    store: &'a dyn RepoStore,
    key: &'a str,
}

impl<'a> ManifestStore<'a> {
    pub fn new(store: &'a dyn RepoStore, manifest_file: &'a str) -> Self {
        Self {
            store,
            key: manifest_file,
        }
    }

    /// Load the manifest.
    ///
    /// A missing file is not an error: an empty manifest is returned along
    /// with `false` so a fresh repository can be bootstrapped.
    pub async fn load(&self) -> StorageResult<(Manifest, bool)> {
        let data = match self.store.get(self.key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => return Ok((Manifest::default(), false)),
            Err(err) => return Err(err),
        };

        let parse_error = |source: depot_core::Error| StorageError::Parse {
            path: self.store.root().join(self.key),
            source,
        };
        let text = std::str::from_utf8(&data)
            .map_err(|e| parse_error(depot_core::Error::ManifestParse(e.to_string())))?;
        let manifest = Manifest::from_yaml(text).map_err(parse_error)?;

        tracing::debug!(
            releases = manifest.releases.len(),
            last_release_id = manifest.last_release_id,
            last_asset_id = manifest.last_asset_id,
            "Manifest loaded"
        );
        Ok((manifest, true))
    }

    /// Serialize and rewrite the whole manifest.
    pub async fn save(&self, manifest: &Manifest) -> StorageResult<()> {
        let yaml = manifest.to_yaml()?;
        self.store.put(self.key, Bytes::from(yaml)).await?;
        tracing::debug!(releases = manifest.releases.len(), "Manifest saved");
        Ok(())
    }
}
