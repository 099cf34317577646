//! Repository configuration.

use serde::{Deserialize, Serialize};

/// Names used inside a repository and inside a build tool's output directory.
///
/// Every field has a default, so an absent config file yields the layout the
/// self-update client expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Manifest file name at the repository root.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    /// Symbolic link at the repository root naming the newest stable release.
    #[serde(default = "default_latest_link")]
    pub latest_link: String,
    /// Artifact type denoting a raw binary, gated by `--include-binary`.
    #[serde(default = "default_binary_artifact_type")]
    pub binary_artifact_type: String,
    /// Build metadata file name inside a release input directory.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// Artifact inventory file name inside a release input directory.
    #[serde(default = "default_artifacts_file")]
    pub artifacts_file: String,
}

fn default_manifest_file() -> String {
    crate::DEFAULT_MANIFEST_FILE.to_string()
}

fn default_latest_link() -> String {
    crate::DEFAULT_LATEST_LINK.to_string()
}

fn default_binary_artifact_type() -> String {
    crate::DEFAULT_BINARY_ARTIFACT_TYPE.to_string()
}

fn default_metadata_file() -> String {
    "metadata.json".to_string()
}

fn default_artifacts_file() -> String {
    "artifacts.json".to_string()
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            manifest_file: default_manifest_file(),
            latest_link: default_latest_link(),
            binary_artifact_type: default_binary_artifact_type(),
            metadata_file: default_metadata_file(),
            artifacts_file: default_artifacts_file(),
        }
    }
}

impl RepoConfig {
    /// Validate that every configured name is a plain file name.
    pub fn validate(&self) -> crate::Result<()> {
        for (field, value) in [
            ("manifest_file", &self.manifest_file),
            ("latest_link", &self.latest_link),
            ("metadata_file", &self.metadata_file),
            ("artifacts_file", &self.artifacts_file),
        ] {
            if value.is_empty() || value == "." || value == ".." {
                return Err(crate::Error::Config(format!(
                    "{field} must be a file name, got {value:?}"
                )));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(crate::Error::Config(format!(
                    "{field} must not contain path separators: {value}"
                )));
            }
        }
        if self.binary_artifact_type.is_empty() {
            return Err(crate::Error::Config(
                "binary_artifact_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether an artifact of this type is a raw binary.
    pub fn is_binary(&self, kind: &str) -> bool {
        kind == self.binary_artifact_type
    }
}
