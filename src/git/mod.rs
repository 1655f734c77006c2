//! Git access abstraction layer
//!
//! The describe algorithms never talk to libgit2 directly. They consume the
//! read-only [Repository] trait, which exposes just enough of a checkout to
//! walk its history: the HEAD commit, the tag references, the parents of a
//! commit and its committer time.
//!
//! # Implementations
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! ```rust
//! # use git_describe_semver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_describe_semver::Result<()> {
//! let head = repo.resolve_head()?;
//! for parent in repo.parents_of(head)? {
//!     println!("{} <- {}", head, parent);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// A tag reference as stored in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Short name of the tag (`refs/tags/` stripped)
    pub name: String,
    /// Object the reference points at: a commit for lightweight tags,
    /// a tag object for annotated ones
    pub target: Oid,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        TagRef {
            name: name.into(),
            target,
        }
    }
}

/// Read-only view of a repository's commit graph and tags
///
/// ## Error Handling
///
/// Failing to locate HEAD maps to
/// [DescribeError::RepositoryUnavailable](crate::error::DescribeError::RepositoryUnavailable);
/// any failure while reading objects maps to
/// [DescribeError::GraphTraversal](crate::error::DescribeError::GraphTraversal).
pub trait Repository {
    /// Resolve HEAD to the commit it identifies
    ///
    /// # Returns
    /// * `Ok(Oid)` - The HEAD commit
    /// * `Err` - If the repository has no commits or HEAD is unreadable
    fn resolve_head(&self) -> Result<Oid>;

    /// List every tag reference, in the order the store yields them
    fn tag_refs(&self) -> Result<Vec<TagRef>>;

    /// Dereference a tag target to a commit
    ///
    /// Annotated tags (including tags of tags) are followed until a commit is
    /// reached. A commit id is returned unchanged.
    fn peel_to_commit(&self, target: Oid) -> Result<Oid>;

    /// Parents of a commit in their recorded order; empty for a root commit
    fn parents_of(&self, commit: Oid) -> Result<Vec<Oid>>;

    /// Committer time of a commit in seconds since the Unix epoch
    fn commit_time(&self, commit: Oid) -> Result<i64>;
}
