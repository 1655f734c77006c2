//! Domain logic - version algebra and tag search, independent of libgit2

pub mod describe;
pub mod generate;
pub mod tag_index;
pub mod version;

pub use describe::{describe, describe_commit, DescribeResult};
pub use generate::{generate_version, GenerateVersionOptions, VERSION_PLACEHOLDER};
pub use tag_index::TagIndex;
pub use version::{NextRelease, SemVer};
