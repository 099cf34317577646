pub mod fixtures;
pub mod mocks;

#[allow(unused_imports)]
pub use fixtures::{ReleaseInput, TestRepo, sha256_hash};
#[allow(unused_imports)]
pub use mocks::FlakyStore;
