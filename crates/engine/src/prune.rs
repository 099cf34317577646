//! Release retention.

use crate::error::{EngineError, EngineResult};
use depot_core::{RepoConfig, RetentionPolicy};
use depot_storage::{ManifestStore, RepoStore};
use time::OffsetDateTime;

/// Options for a single `prune` invocation.
#[derive(Clone, Copy, Debug)]
pub struct PruneOptions {
    pub policy: RetentionPolicy,
    /// Report what would be removed without deleting or rewriting anything.
    pub dry_run: bool,
    pub now: OffsetDateTime,
}

/// Outcome of a prune.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Tags removed (or that would be removed on a dry run), in removal order.
    pub pruned: Vec<String>,
    pub dry_run: bool,
}

/// Remove releases selected by the retention policy.
///
/// Release directories are deleted first and the manifest is rewritten only
/// once every deletion succeeded, so a failed deletion leaves the manifest
/// listing releases that may still be on disk rather than the reverse.
pub async fn prune(
    store: &dyn RepoStore,
    config: &RepoConfig,
    options: &PruneOptions,
) -> EngineResult<PruneReport> {
    let manifests = ManifestStore::new(store, &config.manifest_file);
    let (mut manifest, found) = manifests.load().await?;
    let mut report = PruneReport {
        pruned: Vec::new(),
        dry_run: options.dry_run,
    };
    if !found {
        tracing::info!(repo = %store.root().display(), "No manifest found, nothing to prune");
        return Ok(report);
    }

    let plan = options.policy.plan(&manifest.releases, options.now);
    for release in plan.selected(&manifest.releases) {
        tracing::info!(dry_run = options.dry_run, "Removing release: {}", release.tag_name);
        if !options.dry_run {
            store
                .remove_dir_all(&release.tag_name)
                .await
                .map_err(|source| EngineError::RemoveRelease {
                    tag: release.tag_name.clone(),
                    source,
                })?;
        }
        report.pruned.push(release.tag_name.clone());
    }

    if plan.stopped_early {
        tracing::info!(
            "The repo has only 1 release remaining, ending the prune here to keep 1 release"
        );
    }

    if !options.dry_run {
        let releases = std::mem::take(&mut manifest.releases);
        manifest.releases = plan.apply(releases);
        manifests.save(&manifest).await?;
    }

    tracing::info!(
        dry_run = options.dry_run,
        "Pruned {} release(s) from the repo",
        report.pruned.len()
    );
    Ok(report)
}
