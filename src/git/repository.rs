use crate::error::{DescribeError, Result};
use crate::git::TagRef;
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;
use tracing::{debug, trace};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository containing `path`
    ///
    /// Parent directories are searched, and linked worktrees (a `.git` file
    /// pointing at the real git dir) are followed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(DescribeError::repository)?;
        debug!(path = %repo.path().display(), shallow = repo.is_shallow(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn resolve_head(&self) -> Result<Oid> {
        let head = self.repo.head().map_err(DescribeError::repository)?;
        let commit = head.peel_to_commit().map_err(DescribeError::repository)?;

        Ok(commit.id())
    }

    fn tag_refs(&self) -> Result<Vec<TagRef>> {
        let references = self
            .repo
            .references_glob("refs/tags/*")
            .map_err(DescribeError::traversal)?;

        let mut tags = Vec::new();
        for reference in references {
            let reference = reference.map_err(DescribeError::traversal)?;

            let Some(name) = reference.shorthand() else {
                trace!("skipping tag reference with a non UTF-8 name");
                continue;
            };

            let target = match reference.target() {
                Some(oid) => oid,
                None => reference
                    .resolve()
                    .map_err(DescribeError::traversal)?
                    .target()
                    .ok_or_else(|| {
                        DescribeError::traversal(git2::Error::from_str(&format!(
                            "tag '{}' has no target",
                            name
                        )))
                    })?,
            };

            tags.push(TagRef::new(name, target));
        }

        Ok(tags)
    }

    fn peel_to_commit(&self, target: Oid) -> Result<Oid> {
        let commit = self
            .repo
            .find_object(target, None)
            .and_then(|object| object.peel_to_commit())
            .map_err(DescribeError::traversal)?;

        Ok(commit.id())
    }

    fn parents_of(&self, commit: Oid) -> Result<Vec<Oid>> {
        let commit = self
            .repo
            .find_commit(commit)
            .map_err(DescribeError::traversal)?;

        if !self.repo.is_shallow() {
            return Ok(commit.parent_ids().collect());
        }

        // Parents cut off by a shallow clone are absent from the object store
        let odb = self.repo.odb().map_err(DescribeError::traversal)?;
        let present: Vec<Oid> = commit
            .parent_ids()
            .filter(|parent| {
                let exists = odb.exists(*parent);
                if !exists {
                    trace!(commit = %commit.id(), %parent, "parent beyond shallow boundary");
                }
                exists
            })
            .collect();
        Ok(present)
    }

    fn commit_time(&self, commit: Oid) -> Result<i64> {
        let commit = self
            .repo
            .find_commit(commit)
            .map_err(DescribeError::traversal)?;

        let seconds = commit.committer().when().seconds();
        Ok(seconds)
    }
}
