//! Build tool release output: `metadata.json` and `artifacts.json`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Per-release metadata written by the build tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Project name; becomes the release display name.
    #[serde(rename = "project_name")]
    pub name: String,
    /// Version string; becomes the release tag.
    pub version: String,
    /// Build date; the default publish timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl BuildMetadata {
    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::MetadataParse(e.to_string()))
    }
}

/// One entry of the build tool's artifact inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    /// Slash-separated path relative to an artifact root of unknown depth.
    pub path: String,
    /// Artifact category, e.g. `Archive`, `Checksum` or `Binary`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Artifact {
    /// Deserialize an inventory from JSON. A `null` document is an empty inventory.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        serde_json::from_str::<Option<Vec<Self>>>(json)
            .map(Option::unwrap_or_default)
            .map_err(|e| crate::Error::ArtifactsParse(e.to_string()))
    }

    /// Path segments of the declared path, ignoring empty segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// The declared path with `strip` leading segments removed, joined with `/`.
    ///
    /// Returns `None` when nothing remains after stripping.
    pub fn relative_path(&self, strip: usize) -> Option<String> {
        let rest: Vec<&str> = self.segments().skip(strip).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join("/"))
        }
    }
}
