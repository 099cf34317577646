//! Repository manifest types.
//!
//! The manifest is the single document a self-update client reads to discover
//! releases. It is loaded, mutated and fully rewritten on every command.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// An artifact attached to a release.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier, allocated from `Manifest::last_asset_id`.
    pub id: i64,
    /// Artifact name as reported by the build tool.
    pub name: String,
    /// Size in bytes of the copied file.
    pub size: u64,
    /// Path relative to the repository root: `<tag_name>/<relative path>`.
    pub url: String,
}

/// A published or draft release.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Internal identifier.
    #[serde(default)]
    pub id: i64,
    /// Externally visible identifier.
    #[serde(default)]
    pub release_id: i64,
    /// Display name.
    pub name: String,
    /// Version string; also the directory name under the repository root.
    pub tag_name: String,
    /// Relative path segment clients resolve against (equal to `tag_name`).
    pub url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    #[serde(default)]
    pub release_notes: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Whether this release is eligible to become the `latest` release.
    pub fn is_stable(&self) -> bool {
        !self.draft && !self.prerelease
    }
}

/// The manifest document stored at the repository root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Highest release identifier ever issued.
    #[serde(default)]
    pub last_release_id: i64,
    /// Highest asset identifier ever issued.
    #[serde(default)]
    pub last_asset_id: i64,
    /// Releases in append order, newest last.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub releases: Vec<Release>,
}

impl Manifest {
    /// Allocate the next release identifier.
    pub fn next_release_id(&mut self) -> i64 {
        self.last_release_id += 1;
        self.last_release_id
    }

    /// Allocate the next asset identifier.
    pub fn next_asset_id(&mut self) -> i64 {
        self.last_asset_id += 1;
        self.last_asset_id
    }

    /// Find a release by tag name.
    pub fn find_release(&self, tag_name: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.tag_name == tag_name)
    }

    /// Remove the release with the given tag, preserving the order of the rest.
    pub fn remove_release(&mut self, tag_name: &str) -> Option<Release> {
        let index = self.releases.iter().position(|r| r.tag_name == tag_name)?;
        Some(self.releases.remove(index))
    }

    /// Backfill `id` from `release_id` on records written before the two were
    /// distinct fields. Returns the number of releases updated.
    pub fn migrate_legacy_ids(&mut self) -> usize {
        let mut migrated = 0;
        for release in self.releases.iter_mut().filter(|r| r.id == 0) {
            release.id = release.release_id;
            migrated += 1;
        }
        migrated
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Deserialize from YAML. An empty document yields an empty manifest.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| crate::Error::ManifestParse(e.to_string()))
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
