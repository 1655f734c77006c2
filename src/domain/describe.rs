//! Nearest-tag search over the ancestor graph
//!
//! The walk is a breadth-first traversal from HEAD. Each commit is assigned
//! the length of its shortest path from HEAD the first time it is reached and
//! is never queued again, so merge-heavy histories are visited once per
//! commit. Commits at the same depth are examined newest first (committer
//! time), which decides between two tagged commits at equal distance.

use crate::domain::tag_index::TagIndex;
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of a describe: the nearest tag, how far away it is, and HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeResult {
    /// Nearest semver tag, `None` when no ancestor is tagged
    pub tag_name: Option<String>,
    /// Commits between the tag (exclusive) and HEAD (inclusive); without a
    /// tag, one more than the depth of the deepest ancestor
    pub distance: u64,
    pub head: Oid,
}

impl DescribeResult {
    /// HEAD rendered as a full hex id
    pub fn head_id(&self) -> String {
        self.head.to_string()
    }
}

/// Describe the repository's HEAD against its semver tags
///
/// # Returns
/// * `Ok(DescribeResult)` - Nearest tag (if any) and distance
/// * `Err` - If HEAD cannot be resolved or a commit cannot be read
pub fn describe<R: Repository + ?Sized>(repo: &R, tags: &TagIndex) -> Result<DescribeResult> {
    let head = repo.resolve_head()?;
    describe_commit(repo, head, tags)
}

/// Describe an arbitrary commit against the tag index
pub fn describe_commit<R: Repository + ?Sized>(
    repo: &R,
    head: Oid,
    tags: &TagIndex,
) -> Result<DescribeResult> {
    let mut distances: HashMap<Oid, u64> = HashMap::new();
    distances.insert(head, 0);

    let mut frontier = vec![head];
    let mut depth = 0u64;

    loop {
        newest_first(repo, &mut frontier)?;

        if let Some((commit, name)) = frontier
            .iter()
            .find_map(|commit| tags.get(commit).map(|name| (commit, name)))
        {
            debug!(tag = name, %commit, distance = depth, "found nearest tag");
            return Ok(DescribeResult {
                tag_name: Some(name.to_string()),
                distance: depth,
                head,
            });
        }

        let mut next = Vec::new();
        for commit in &frontier {
            for parent in repo.parents_of(*commit)? {
                if let Entry::Vacant(slot) = distances.entry(parent) {
                    slot.insert(depth + 1);
                    next.push(parent);
                }
            }
        }

        if next.is_empty() {
            break;
        }
        trace!(depth = depth + 1, commits = next.len(), "descending");
        frontier = next;
        depth += 1;
    }

    debug!(
        visited = distances.len(),
        max_depth = depth,
        "no semver tag reachable from head"
    );
    Ok(DescribeResult {
        tag_name: None,
        distance: depth + 1,
        head,
    })
}

/// Order one depth level by committer time, newest first; ids break ties
fn newest_first<R: Repository + ?Sized>(repo: &R, level: &mut Vec<Oid>) -> Result<()> {
    if level.len() < 2 {
        return Ok(());
    }

    let mut timed = level
        .iter()
        .map(|oid| Ok((repo.commit_time(*oid)?, *oid)))
        .collect::<Result<Vec<(i64, Oid)>>>()?;
    timed.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    *level = timed.into_iter().map(|(_, oid)| oid).collect();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescribeError;
    use crate::git::MockRepository;

    fn run(repo: &MockRepository) -> DescribeResult {
        let tags = TagIndex::build(repo).unwrap();
        describe(repo, &tags).unwrap()
    }

    #[test]
    fn test_describe_empty_repository_fails() {
        let repo = MockRepository::new();
        let err = describe(&repo, &TagIndex::new()).unwrap_err();
        assert!(matches!(err, DescribeError::RepositoryUnavailable(_)));
    }

    #[test]
    fn test_describe_single_untagged_commit() {
        let mut repo = MockRepository::new();
        let c1 = MockRepository::oid(1);
        repo.add_commit(c1, &[], 100);
        repo.set_head(c1);

        let result = run(&repo);
        assert_eq!(result.tag_name, None);
        assert_eq!(result.distance, 1);
        assert_eq!(result.head, c1);
    }

    #[test]
    fn test_describe_untagged_linear_history() {
        let mut repo = MockRepository::new();
        let (c1, c2, c3) = (MockRepository::oid(1), MockRepository::oid(2), MockRepository::oid(3));
        repo.add_commit(c1, &[], 100);
        repo.add_commit(c2, &[c1], 200);
        repo.add_commit(c3, &[c2], 300);
        repo.add_tag("not-a-version", c1);
        repo.set_head(c3);

        let result = run(&repo);
        assert_eq!(result.tag_name, None);
        assert_eq!(result.distance, 3);
    }

    #[test]
    fn test_describe_linear_history() {
        let mut repo = MockRepository::new();
        let (c1, c2, c3) = (MockRepository::oid(1), MockRepository::oid(2), MockRepository::oid(3));
        repo.add_commit(c1, &[], 100);
        repo.add_commit(c2, &[c1], 200);
        repo.add_commit(c3, &[c2], 300);
        repo.add_tag("v1.0.0", c1);
        let tags = TagIndex::build(&repo).unwrap();

        for (head, expected) in [(c3, 2), (c2, 1), (c1, 0)] {
            let result = describe_commit(&repo, head, &tags).unwrap();
            assert_eq!(result.tag_name.as_deref(), Some("v1.0.0"));
            assert_eq!(result.distance, expected);
            assert_eq!(result.head, head);
        }
    }

    #[test]
    fn test_describe_picks_nearest_tag() {
        let mut repo = MockRepository::new();
        let (c1, c2, c3) = (MockRepository::oid(1), MockRepository::oid(2), MockRepository::oid(3));
        repo.add_commit(c1, &[], 100);
        repo.add_commit(c2, &[c1], 200);
        repo.add_commit(c3, &[c2], 300);
        repo.add_tag("v1.0.0", c1);
        repo.add_tag("v2.0.0", c3);
        repo.set_head(c3);

        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v2.0.0"));
        assert_eq!(result.distance, 0);
    }

    #[test]
    fn test_describe_merge_of_two_branches() {
        // c1 (v1.0.0) <- c2 <- c4
        //             <- c3 <-/
        let mut repo = MockRepository::new();
        let (c1, c2, c3, c4) = (
            MockRepository::oid(1),
            MockRepository::oid(2),
            MockRepository::oid(3),
            MockRepository::oid(4),
        );
        repo.add_commit(c1, &[], 100);
        repo.add_commit(c2, &[c1], 200);
        repo.add_commit(c3, &[c1], 300);
        repo.add_commit(c4, &[c2, c3], 400);
        repo.add_tag("v1.0.0", c1);
        repo.set_head(c4);

        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v1.0.0"));
        assert_eq!(result.distance, 2);

        repo.add_tag("v2.0.0", c3);
        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v2.0.0"));
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn test_describe_uneven_merge_uses_shortest_path() {
        // c1 (v1.0.0) <- a1 <--------- m
        //             <- b1 <- b2 <-/
        let mut repo = MockRepository::new();
        let (c1, a1, b1, b2, m) = (
            MockRepository::oid(1),
            MockRepository::oid(2),
            MockRepository::oid(3),
            MockRepository::oid(4),
            MockRepository::oid(5),
        );
        repo.add_commit(c1, &[], 100);
        repo.add_commit(a1, &[c1], 200);
        repo.add_commit(b1, &[c1], 300);
        repo.add_commit(b2, &[b1], 400);
        repo.add_commit(m, &[b2, a1], 500);
        repo.add_tag("v1.0.0", c1);
        repo.set_head(m);

        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v1.0.0"));
        assert_eq!(result.distance, 2);
    }

    #[test]
    fn test_describe_equal_distance_prefers_newest_commit() {
        let mut repo = MockRepository::new();
        let (root, old, new, head) = (
            MockRepository::oid(1),
            MockRepository::oid(2),
            MockRepository::oid(3),
            MockRepository::oid(4),
        );
        repo.add_commit(root, &[], 100);
        repo.add_commit(old, &[root], 200);
        repo.add_commit(new, &[root], 300);
        repo.add_commit(head, &[old, new], 400);
        repo.add_tag("v1.0.0", old);
        repo.add_tag("v0.9.0", new);
        repo.set_head(head);

        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v0.9.0"));
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn test_describe_untagged_diamond_counts_deepest_level() {
        let mut repo = MockRepository::new();
        let (root, a, b1, b2, head) = (
            MockRepository::oid(1),
            MockRepository::oid(2),
            MockRepository::oid(3),
            MockRepository::oid(4),
            MockRepository::oid(5),
        );
        repo.add_commit(root, &[], 100);
        repo.add_commit(a, &[root], 200);
        repo.add_commit(b1, &[root], 210);
        repo.add_commit(b2, &[b1], 220);
        repo.add_commit(head, &[a, b2], 300);
        repo.set_head(head);

        // root is reached at depth 2 through `a`; b1 sits at depth 2 as well
        let result = run(&repo);
        assert_eq!(result.tag_name, None);
        assert_eq!(result.distance, 3);
    }

    #[test]
    fn test_describe_missing_parent_is_traversal_failure() {
        let mut repo = MockRepository::new();
        let c2 = MockRepository::oid(2);
        repo.add_commit(c2, &[MockRepository::oid(1)], 200);
        repo.set_head(c2);

        let err = describe(&repo, &TagIndex::new()).unwrap_err();
        assert!(matches!(err, DescribeError::GraphTraversal(_)));
    }

    #[test]
    fn test_describe_long_history_is_iterative() {
        let mut repo = MockRepository::new();
        let mut previous: Option<Oid> = None;
        let mut last = Oid::zero();
        for i in 0..20_000u32 {
            let oid = Oid::hash_object(git2::ObjectType::Blob, &i.to_be_bytes()).unwrap();
            let parents: Vec<Oid> = previous.into_iter().collect();
            repo.add_commit(oid, &parents, i as i64);
            if i == 0 {
                repo.add_tag("v0.1.0", oid);
            }
            previous = Some(oid);
            last = oid;
        }
        repo.set_head(last);

        let result = run(&repo);
        assert_eq!(result.tag_name.as_deref(), Some("v0.1.0"));
        assert_eq!(result.distance, 19_999);
    }

    #[test]
    fn test_head_id_is_full_hex() {
        let result = DescribeResult {
            tag_name: None,
            distance: 1,
            head: MockRepository::oid(0xab),
        };
        assert_eq!(result.head_id().len(), 40);
        assert!(result.head_id().starts_with("ab"));
    }
}
