use depot_core::{Artifact, Manifest, RepoConfig};
use depot_storage::FilesystemBackend;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Compute SHA-256 hash of data as hex string
#[allow(dead_code)]
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// A repository root backed by a temp dir.
pub struct TestRepo {
    pub temp: TempDir,
    pub store: FilesystemBackend,
    pub config: RepoConfig,
}

#[allow(dead_code)]
impl TestRepo {
    pub async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let store = FilesystemBackend::new(temp.path()).await.unwrap();
        Self {
            temp,
            store,
            config: RepoConfig::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    pub fn manifest_bytes(&self) -> Option<Vec<u8>> {
        std::fs::read(self.path("manifest.yaml")).ok()
    }

    pub fn manifest(&self) -> Manifest {
        let bytes = self.manifest_bytes().expect("manifest should exist");
        serde_yaml::from_slice(&bytes).unwrap()
    }

    pub fn tags(&self) -> Vec<String> {
        self.manifest()
            .releases
            .iter()
            .map(|r| r.tag_name.clone())
            .collect()
    }

    pub fn latest(&self) -> Option<PathBuf> {
        std::fs::read_link(self.path("latest")).ok()
    }
}

/// Seed data for an artifact so copies can be checked by digest.
pub fn artifact_bytes(name: &str) -> Vec<u8> {
    format!("contents of {name}\n").repeat(64).into_bytes()
}

/// A goreleaser-style output tree. Declared artifact paths are relative to
/// the project directory; the input directory sits `depth` levels below it.
pub struct ReleaseInput {
    pub temp: TempDir,
    pub project_dir: PathBuf,
    pub input_dir: PathBuf,
    prefix: String,
    version: String,
    date: OffsetDateTime,
    artifacts: Vec<Artifact>,
}

#[allow(dead_code)]
impl ReleaseInput {
    /// The usual goreleaser layout: the tool is pointed at `dist/`.
    pub fn new(version: &str, date: OffsetDateTime) -> Self {
        Self::with_depth(version, date, 1)
    }

    pub fn with_depth(version: &str, date: OffsetDateTime, depth: usize) -> Self {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("project");
        let levels: Vec<&str> = ["dist", "release"].into_iter().take(depth).collect();
        let input_dir = levels
            .iter()
            .fold(project_dir.clone(), |path, level| path.join(level));
        std::fs::create_dir_all(&input_dir).unwrap();
        let prefix = levels
            .iter()
            .map(|level| format!("{level}/"))
            .collect::<String>();
        Self {
            temp,
            project_dir,
            input_dir,
            prefix,
            version: version.to_string(),
            date,
            artifacts: Vec::new(),
        }
    }

    fn declare(&mut self, name: &str, relative: &str, kind: &str) -> String {
        let declared = format!("{}{}", self.prefix, relative);
        self.artifacts.push(Artifact {
            name: name.to_string(),
            path: declared.clone(),
            kind: kind.to_string(),
        });
        declared
    }

    fn write_file(&self, declared: &str, name: &str) {
        let path = self.project_dir.join(declared);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, artifact_bytes(name)).unwrap();
    }

    /// An archive at the top of the release directory.
    pub fn archive(mut self, name: &str) -> Self {
        let declared = self.declare(name, name, "Archive");
        self.write_file(&declared, name);
        self
    }

    /// A raw binary in its own per-platform directory.
    pub fn binary(mut self, dir: &str, name: &str) -> Self {
        let declared = self.declare(name, &format!("{dir}/{name}"), "Binary");
        self.write_file(&declared, name);
        self
    }

    /// Declared in the inventory but never written to disk.
    pub fn missing(mut self, name: &str) -> Self {
        self.declare(name, name, "Archive");
        self
    }

    /// Write metadata.json and artifacts.json.
    pub fn build(self) -> Self {
        let metadata = format!(
            r#"{{"project_name":"example","tag":"{v}","version":"{v}","date":"{d}"}}"#,
            v = self.version,
            d = self.date.format(&Rfc3339).unwrap()
        );
        std::fs::write(self.input_dir.join("metadata.json"), metadata).unwrap();
        std::fs::write(
            self.input_dir.join("artifacts.json"),
            serde_json::to_string_pretty(&self.artifacts).unwrap(),
        )
        .unwrap();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.input_dir
    }
}
