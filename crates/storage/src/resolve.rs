//! Artifact root detection.
//!
//! Build tools record artifact paths relative to their project directory,
//! which may be the directory handed to us or one or two levels above it.

use crate::error::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// How many directories above the input directory are probed.
pub const MAX_PROBE_DEPTH: usize = 2;

/// Where artifact paths resolve from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactRoot {
    /// Directory the declared artifact paths are relative to.
    pub base: PathBuf,
    /// Leading segments to strip from a declared path to get its path inside
    /// the release directory.
    pub strip: usize,
}

impl ArtifactRoot {
    /// Location of a declared artifact path on disk.
    pub fn source_path(&self, declared: &str) -> PathBuf {
        declared
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.base.clone(), |path, segment| path.join(segment))
    }
}

/// Probe `input_dir` and up to two of its ancestors for `declared`.
///
/// Returns `None` when the declared path exists under none of them.
pub async fn resolve_artifact_root(
    input_dir: &Path,
    declared: &str,
) -> StorageResult<Option<ArtifactRoot>> {
    let input_dir = tokio::fs::canonicalize(input_dir)
        .await
        .map_err(|e| StorageError::from_io(e, input_dir.display()))?;

    for (strip, base) in input_dir.ancestors().take(MAX_PROBE_DEPTH + 1).enumerate() {
        let root = ArtifactRoot {
            base: base.to_path_buf(),
            strip,
        };
        // Any stat error means "not here"; keep probing.
        if tokio::fs::try_exists(root.source_path(declared))
            .await
            .unwrap_or(false)
        {
            tracing::debug!(base = %root.base.display(), strip, "Resolved artifact root");
            return Ok(Some(root));
        }
    }

    Ok(None)
}
