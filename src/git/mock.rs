use crate::error::{DescribeError, Result};
use crate::git::{Repository, TagRef};
use git2::Oid;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct MockCommit {
    parents: Vec<Oid>,
    time: i64,
}

/// Mock repository for testing without actual git operations
///
/// Commits form an in-memory DAG. Tags are kept in insertion order so
/// tests control the order [Repository::tag_refs] reports them in.
#[derive(Debug, Default)]
pub struct MockRepository {
    commits: HashMap<Oid, MockCommit>,
    annotated: HashMap<Oid, Oid>,
    tags: Vec<TagRef>,
    head: Option<Oid>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a deterministic object id from a small number
    pub fn oid(n: u8) -> Oid {
        let mut bytes = [0u8; 20];
        bytes[0] = n;
        bytes[19] = n;
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }

    /// Add a commit with its parents and committer time
    pub fn add_commit(&mut self, oid: Oid, parents: &[Oid], time: i64) {
        self.commits.insert(
            oid,
            MockCommit {
                parents: parents.to_vec(),
                time,
            },
        );
    }

    /// Add a lightweight tag pointing directly at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit: Oid) {
        self.tags.push(TagRef::new(name, commit));
    }

    /// Add an annotated tag: `tag_object` is the tag object id, which peels to `commit`
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, tag_object: Oid, commit: Oid) {
        self.annotated.insert(tag_object, commit);
        self.tags.push(TagRef::new(name, tag_object));
    }

    /// Point HEAD at a commit
    pub fn set_head(&mut self, oid: Oid) {
        self.head = Some(oid);
    }

    fn commit(&self, oid: Oid) -> Result<&MockCommit> {
        self.commits.get(&oid).ok_or_else(|| {
            DescribeError::traversal(git2::Error::from_str(&format!(
                "commit {} not found",
                oid
            )))
        })
    }
}

impl Repository for MockRepository {
    fn resolve_head(&self) -> Result<Oid> {
        self.head.ok_or_else(|| {
            DescribeError::repository(git2::Error::from_str("reference 'refs/heads/main' not found"))
        })
    }

    fn tag_refs(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn peel_to_commit(&self, target: Oid) -> Result<Oid> {
        let mut current = target;
        while let Some(next) = self.annotated.get(&current) {
            current = *next;
        }
        self.commit(current)?;
        Ok(current)
    }

    fn parents_of(&self, commit: Oid) -> Result<Vec<Oid>> {
        Ok(self.commit(commit)?.parents.clone())
    }

    fn commit_time(&self, commit: Oid) -> Result<i64> {
        Ok(self.commit(commit)?.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_head() {
        let mut repo = MockRepository::new();
        assert!(matches!(
            repo.resolve_head(),
            Err(DescribeError::RepositoryUnavailable(_))
        ));

        let oid = MockRepository::oid(1);
        repo.add_commit(oid, &[], 100);
        repo.set_head(oid);
        assert_eq!(repo.resolve_head().unwrap(), oid);
    }

    #[test]
    fn test_mock_repository_tags_keep_insertion_order() {
        let mut repo = MockRepository::new();
        let c1 = MockRepository::oid(1);
        repo.add_commit(c1, &[], 100);

        repo.add_tag("v2.0.0", c1);
        repo.add_tag("v1.0.0", c1);

        let names: Vec<String> = repo.tag_refs().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["v2.0.0", "v1.0.0"]);
    }

    #[test]
    fn test_mock_repository_peels_annotated_tags() {
        let mut repo = MockRepository::new();
        let c1 = MockRepository::oid(1);
        let tag_object = MockRepository::oid(200);
        let tag_of_tag = MockRepository::oid(201);
        repo.add_commit(c1, &[], 100);
        repo.add_annotated_tag("v1.0.0", tag_object, c1);
        repo.add_annotated_tag("v1.0.1", tag_of_tag, tag_object);

        assert_eq!(repo.peel_to_commit(tag_object).unwrap(), c1);
        assert_eq!(repo.peel_to_commit(tag_of_tag).unwrap(), c1);
        assert_eq!(repo.peel_to_commit(c1).unwrap(), c1);
        assert!(repo.peel_to_commit(MockRepository::oid(9)).is_err());
    }

    #[test]
    fn test_mock_repository_parents() {
        let mut repo = MockRepository::new();
        let c1 = MockRepository::oid(1);
        let c2 = MockRepository::oid(2);
        repo.add_commit(c1, &[], 100);
        repo.add_commit(c2, &[c1], 200);

        assert_eq!(repo.parents_of(c2).unwrap(), vec![c1]);
        assert!(repo.parents_of(c1).unwrap().is_empty());
        assert_eq!(repo.commit_time(c2).unwrap(), 200);
        assert!(matches!(
            repo.parents_of(MockRepository::oid(3)),
            Err(DescribeError::GraphTraversal(_))
        ));
    }
}
