use crate::domain::version::SemVer;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Mapping from commit to the semantic-version tag that names it
///
/// Only tags whose short name parses as a [SemVer] are kept. When several
/// such tags resolve to the same commit, the one with the highest version
/// precedence wins, and equal precedence goes to the greater name, so the
/// result does not depend on the order the repository lists its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    tags: HashMap<Oid, (SemVer, String)>,
}

impl TagIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the repository's tag references
    ///
    /// Annotated tags are peeled to the commit they identify. A failure
    /// while peeling a semver tag is propagated; tags that are not semver
    /// are discarded before they are resolved.
    pub fn build<R: Repository + ?Sized>(repo: &R) -> Result<Self> {
        let mut index = TagIndex::new();

        for tag in repo.tag_refs()? {
            let Ok(version) = SemVer::parse(&tag.name) else {
                trace!(tag = %tag.name, "ignoring tag that is not a semantic version");
                continue;
            };
            let commit = repo.peel_to_commit(tag.target)?;
            index.insert_version(commit, version, tag.name);
        }

        debug!(tags = index.len(), "built semver tag index");
        Ok(index)
    }

    /// Record `name` for `commit`, keeping the preferred tag on collision
    ///
    /// Names that are not semantic versions are ignored.
    pub fn insert(&mut self, commit: Oid, name: String) {
        if let Ok(version) = SemVer::parse(&name) {
            self.insert_version(commit, version, name);
        }
    }

    fn insert_version(&mut self, commit: Oid, version: SemVer, name: String) {
        if let Some((kept, kept_name)) = self.tags.get(&commit) {
            if !prefer(&version, &name, kept, kept_name) {
                trace!(%commit, kept = %kept_name, dropped = %name, "commit already tagged");
                return;
            }
        }
        self.tags.insert(commit, (version, name));
    }

    /// Parsed version of the tag on a commit
    pub fn version(&self, commit: &Oid) -> Option<&SemVer> {
        self.tags.get(commit).map(|(version, _)| version)
    }

    /// Tag name for a commit, if it carries one
    pub fn get(&self, commit: &Oid) -> Option<&str> {
        self.tags.get(commit).map(|(_, name)| name.as_str())
    }

    pub fn contains(&self, commit: &Oid) -> bool {
        self.tags.contains_key(commit)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &str)> {
        self.tags.iter().map(|(oid, (_, name))| (oid, name.as_str()))
    }
}

fn prefer(
    candidate: &SemVer,
    candidate_name: &str,
    existing: &SemVer,
    existing_name: &str,
) -> bool {
    match candidate.precedence_cmp(existing) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate_name > existing_name,
    }
}
