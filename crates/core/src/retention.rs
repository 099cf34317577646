//! Release retention policies.
//!
//! Planning is pure: it decides which releases go without touching the
//! filesystem, so the caller can delete directories before rewriting the
//! manifest.

use crate::manifest::Release;
use time::{Duration, OffsetDateTime};

/// How old releases are selected for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep only the newest `n` releases.
    MaxReleases(usize),
    /// Remove releases published at least this long ago, always keeping one.
    MaxAge(Duration),
}

impl RetentionPolicy {
    /// Build a policy from the two mutually exclusive limits.
    ///
    /// Zero or negative limits count as unset.
    pub fn from_limits(max_age: Option<Duration>, max_releases: Option<usize>) -> crate::Result<Self> {
        let max_age = max_age.filter(|d| d.is_positive());
        let max_releases = max_releases.filter(|n| *n > 0);
        match (max_age, max_releases) {
            (Some(_), Some(_)) => Err(crate::Error::Config(
                "must only provide one prune argument".to_string(),
            )),
            (None, None) => Err(crate::Error::Config(
                "must provide one prune argument".to_string(),
            )),
            (Some(age), None) => Ok(Self::MaxAge(age)),
            (None, Some(count)) => Ok(Self::MaxReleases(count)),
        }
    }

    /// Decide which releases to remove. `releases` is in manifest order,
    /// oldest first.
    pub fn plan(&self, releases: &[Release], now: OffsetDateTime) -> RetentionPlan {
        match *self {
            Self::MaxReleases(max) => {
                // At least one release always survives.
                let excess = releases.len().saturating_sub(max.max(1));
                RetentionPlan {
                    remove: (0..excess).rev().collect(),
                    stopped_early: false,
                }
            }
            Self::MaxAge(max_age) => {
                let mut remaining = releases.len();
                let mut plan = RetentionPlan::default();
                for (index, release) in releases.iter().enumerate() {
                    if remaining <= 1 {
                        plan.stopped_early = true;
                        break;
                    }
                    if now - release.published_at >= max_age {
                        plan.remove.push(index);
                        remaining -= 1;
                    }
                }
                plan
            }
        }
    }
}

/// Outcome of retention planning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    /// Indices into the planned release list, in deletion order.
    pub remove: Vec<usize>,
    /// The age policy stopped because only one release was left.
    pub stopped_early: bool,
}

impl RetentionPlan {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty()
    }

    /// Releases selected for removal, in deletion order.
    pub fn selected<'a>(&'a self, releases: &'a [Release]) -> impl Iterator<Item = &'a Release> {
        self.remove.iter().filter_map(|&i| releases.get(i))
    }

    /// Drop the selected releases, preserving the order of the survivors.
    pub fn apply(&self, releases: Vec<Release>) -> Vec<Release> {
        releases
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !self.remove.contains(i))
            .map(|(_, r)| r)
            .collect()
    }
}
