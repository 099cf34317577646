//! Release ingestion.

use crate::confirm::Confirm;
use crate::error::{EngineError, EngineResult};
use depot_core::{Asset, Manifest, Release, RepoConfig};
use depot_storage::inputs::{read_artifacts, read_metadata};
use depot_storage::{ManifestStore, RepoStore, resolve_artifact_root};
use std::path::PathBuf;
use time::OffsetDateTime;

/// Prompt shown when the version being added is already in the manifest.
pub const REPLACE_PROMPT: &str = "This release already exists, should we replace?";

/// Options for a single `add-release` invocation.
#[derive(Clone, Debug)]
pub struct IngestOptions {
    /// Build tool output directory holding the metadata and artifact inventory.
    pub release_dir: PathBuf,
    pub notes: String,
    pub draft: bool,
    pub prerelease: bool,
    /// Copy raw binary artifacts too.
    pub include_binary: bool,
    /// Replace an existing release with the same version without asking.
    pub force: bool,
    /// Overrides the build date as the publish time.
    pub published_at: Option<OffsetDateTime>,
    /// Publish at `now`; takes precedence over `published_at`.
    pub published_at_now: bool,
    pub now: OffsetDateTime,
}

impl IngestOptions {
    pub fn new(release_dir: impl Into<PathBuf>, now: OffsetDateTime) -> Self {
        Self {
            release_dir: release_dir.into(),
            notes: String::new(),
            draft: false,
            prerelease: false,
            include_binary: false,
            force: false,
            published_at: None,
            published_at_now: false,
            now,
        }
    }

    fn publish_time(&self, build_date: OffsetDateTime) -> OffsetDateTime {
        if self.published_at_now {
            self.now
        } else {
            self.published_at.unwrap_or(build_date)
        }
    }
}

/// Outcome of a successful ingestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestReport {
    pub tag: String,
    pub release_id: i64,
    /// Number of assets recorded for the release.
    pub assets: usize,
    /// Names of artifacts that were skipped because they could not be copied.
    pub skipped: Vec<String>,
    /// Whether the latest link now points at this release.
    pub latest_updated: bool,
    /// Whether an existing release with the same version was replaced.
    pub replaced: bool,
}

/// Add the release in `options.release_dir` to the repository.
///
/// Nothing is written until the inputs validate and any conflict with an
/// existing release of the same version is resolved. Artifacts that cannot be
/// found or copied are logged and skipped without failing the release.
pub async fn add_release(
    store: &dyn RepoStore,
    config: &RepoConfig,
    options: &IngestOptions,
    confirm: &dyn Confirm,
) -> EngineResult<IngestReport> {
    let manifests = ManifestStore::new(store, &config.manifest_file);
    let (mut manifest, found) = manifests.load().await?;
    if !found {
        tracing::info!(repo = %store.root().display(), "No manifest found, starting a new repo");
    }

    let migrated = manifest.migrate_legacy_ids();
    if migrated > 0 {
        tracing::debug!(migrated, "Backfilled legacy release ids");
    }

    let metadata = read_metadata(&options.release_dir, &config.metadata_file).await?;
    let tag = metadata.version.clone();
    validate_version(&tag, config)?;

    let artifacts = read_artifacts(&options.release_dir, &config.artifacts_file).await?;
    let Some(first) = artifacts.first() else {
        return Err(EngineError::NoArtifacts(tag));
    };

    let root = resolve_artifact_root(&options.release_dir, &first.path)
        .await?
        .ok_or_else(|| EngineError::UnresolvedArtifactRoot(first.path.clone()))?;

    let replaced = resolve_conflict(store, &mut manifest, &tag, options.force, confirm).await?;

    let release_id = manifest.next_release_id();
    let mut release = Release {
        id: release_id,
        release_id,
        name: metadata.name.clone(),
        tag_name: tag.clone(),
        url: tag.clone(),
        draft: options.draft,
        prerelease: options.prerelease,
        published_at: options.publish_time(metadata.date),
        release_notes: options.notes.clone(),
        assets: Vec::new(),
    };

    store
        .create_dir(&tag)
        .await
        .map_err(|source| EngineError::CreateReleaseDir {
            tag: tag.clone(),
            source,
        })?;

    let mut skipped = Vec::new();
    for artifact in &artifacts {
        if config.is_binary(&artifact.kind) && !options.include_binary {
            tracing::debug!(artifact = %artifact.name, "Skipping binary artifact");
            continue;
        }

        let source = root.source_path(&artifact.path);
        if tokio::fs::metadata(&source).await.is_err() {
            tracing::warn!(
                artifact = %artifact.name,
                "Ignoring artifact as its file does not exist"
            );
            skipped.push(artifact.name.clone());
            continue;
        }

        let Some(relative) = artifact.relative_path(root.strip) else {
            tracing::warn!(
                artifact = %artifact.name,
                path = %artifact.path,
                "Ignoring artifact with no path below the artifact root"
            );
            skipped.push(artifact.name.clone());
            continue;
        };

        let key = format!("{tag}/{relative}");
        let copied = match store.copy_from(&source, &key).await {
            Ok(_) => store.size(&key).await,
            Err(err) => Err(err),
        };
        let size = match copied {
            Ok(size) => size,
            Err(err) => {
                tracing::warn!(artifact = %artifact.name, error = %err, "Failed to copy artifact, skipping it");
                skipped.push(artifact.name.clone());
                continue;
            }
        };

        release.assets.push(Asset {
            id: manifest.next_asset_id(),
            name: artifact.name.clone(),
            size,
            url: key,
        });
    }

    let stable = release.is_stable();
    let assets = release.assets.len();
    manifest.releases.push(release);
    manifests.save(&manifest).await?;

    let latest_updated = stable && update_latest(store, config, &tag).await;

    tracing::info!(
        assets,
        skipped = skipped.len(),
        "Added release {tag} for {} to the repo {}",
        metadata.name,
        store.root().display()
    );

    Ok(IngestReport {
        tag,
        release_id,
        assets,
        skipped,
        latest_updated,
        replaced,
    })
}

/// Tags double as directory names, so they must be a single path segment
/// and must not collide with the manifest or the latest link at the root.
fn validate_version(tag: &str, config: &RepoConfig) -> EngineResult<()> {
    if tag.is_empty()
        || tag == "."
        || tag == ".."
        || tag.contains('/')
        || tag.contains('\\')
        || tag == config.latest_link
        || tag == config.manifest_file
    {
        return Err(EngineError::InvalidVersion(tag.to_string()));
    }
    Ok(())
}

/// Remove an existing release with the same tag if the operator agrees.
///
/// Returns whether a release was removed. Declining leaves the manifest and
/// the filesystem untouched.
async fn resolve_conflict(
    store: &dyn RepoStore,
    manifest: &mut Manifest,
    tag: &str,
    force: bool,
    confirm: &dyn Confirm,
) -> EngineResult<bool> {
    if manifest.find_release(tag).is_none() {
        return Ok(false);
    }

    if !force && !confirm.confirm(REPLACE_PROMPT) {
        return Err(EngineError::VersionExists(tag.to_string()));
    }

    if let Some(old) = manifest.remove_release(tag) {
        tracing::info!(tag, release_id = old.id, assets = old.assets.len(), "Replacing existing release");
    }

    // A stale directory is overwritten by the new copy.
    if let Err(err) = store.remove_dir_all(tag).await {
        tracing::warn!(tag, error = %err, "Failed to remove existing release directory");
    }

    Ok(true)
}

/// Point the latest link at `tag`. Failures are logged, not returned.
async fn update_latest(store: &dyn RepoStore, config: &RepoConfig, tag: &str) -> bool {
    match store.repoint_link(&config.latest_link, tag).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(
                link = %config.latest_link,
                tag,
                error = %err,
                "Failed to update latest link"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_publish_time_precedence() {
        let build_date = datetime!(2024-10-01 0:00 UTC);
        let explicit = datetime!(2024-10-05 22:15:21 -5);
        let now = datetime!(2024-10-08 0:00 UTC);

        let mut options = IngestOptions::new("dist", now);
        assert_eq!(options.publish_time(build_date), build_date);

        options.published_at = Some(explicit);
        assert_eq!(options.publish_time(build_date), explicit);

        options.published_at_now = true;
        assert_eq!(options.publish_time(build_date), now);
    }

    #[test]
    fn test_validate_version() {
        let config = RepoConfig::default();
        assert!(validate_version("v0.1.0", &config).is_ok());
        assert!(validate_version("1.2.3-rc.1+build.5", &config).is_ok());
        for bad in ["", ".", "..", "v1/evil", "..\\up", "latest", "manifest.yaml"] {
            assert!(
                matches!(validate_version(bad, &config), Err(EngineError::InvalidVersion(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
