//! Manifest mutation for depot release repositories.
//!
//! Two operations, each a single load, mutate and persist cycle:
//! - [`add_release`] ingests a build tool's release output
//! - [`prune`] removes old releases under a retention policy
//!
//! Callers must ensure only one operation runs against a repository at a time.

pub mod confirm;
pub mod error;
pub mod ingest;
pub mod prune;

pub use confirm::{Confirm, Decline};
pub use error::{EngineError, EngineResult};
pub use ingest::{IngestOptions, IngestReport, add_release};
pub use prune::{PruneOptions, PruneReport, prune};
