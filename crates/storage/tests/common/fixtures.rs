use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A build output tree where the directory handed to the tool sits `depth`
/// levels below the directory artifact paths are relative to.
pub struct ReleaseLayout {
    pub temp: TempDir,
    pub input_dir: PathBuf,
    pub project_dir: PathBuf,
}

#[allow(dead_code)]
impl ReleaseLayout {
    pub fn new(depth: usize) -> Self {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("project");
        let mut input_dir = project_dir.clone();
        for level in 0..depth {
            input_dir = input_dir.join(format!("level{level}"));
        }
        std::fs::create_dir_all(&input_dir).unwrap();
        Self {
            temp,
            input_dir,
            project_dir,
        }
    }

    /// Write a file at a path relative to the project directory.
    pub fn write_artifact(&self, declared: &str, data: &[u8]) -> PathBuf {
        let path = self.project_dir.join(declared);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, data).unwrap();
        path
    }

    pub fn write_input(&self, name: &str, contents: &str) {
        std::fs::write(self.input_dir.join(name), contents).unwrap();
    }

    pub fn input(&self) -> &Path {
        &self.input_dir
    }
}
