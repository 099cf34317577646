//! Core domain types for depot release repositories.
//!
//! This crate defines the data model shared by the other crates:
//! - The repository manifest with its releases, assets and identifier counters
//! - Build tool release metadata and artifact inventories
//! - Retention policies and the pure pruning plan
//! - Repository configuration

pub mod build;
pub mod config;
pub mod error;
pub mod manifest;
pub mod retention;

pub use build::{Artifact, BuildMetadata};
pub use config::RepoConfig;
pub use error::{Error, Result};
pub use manifest::{Asset, Manifest, Release};
pub use retention::{RetentionPlan, RetentionPolicy};

/// Default manifest file name at the repository root.
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.yaml";

/// Default name of the symbolic link pointing at the newest stable release.
pub const DEFAULT_LATEST_LINK: &str = "latest";

/// Artifact type goreleaser assigns to raw binary executables.
pub const DEFAULT_BINARY_ARTIFACT_TYPE: &str = "Binary";
