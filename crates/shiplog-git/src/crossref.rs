//! Mainline cross-reference search and fork-point resolution

use std::path::{Path, PathBuf};

use git2::Sort;
use tracing::{debug, instrument, trace};

use crate::repository::{GitRepo, Result};

/// Message line prefix that links a commit to its internal review record
const CROSS_REF_PREFIX: &str = "Differential Revision:";

impl GitRepo {
    /// Search the mainline branch for a commit whose message carries the
    /// given cross-reference id. Returns the canonical sha when found.
    #[instrument(skip(self))]
    pub fn find_by_cross_reference(
        &self,
        id: &str,
        mainline: &str,
    ) -> Result<Option<String>> {
        let needle = format!("{} {}", CROSS_REF_PREFIX, id);
        let tip = self.mainline_tip(mainline)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(tip)?;

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            if commit.message().is_some_and(|m| m.contains(&needle)) {
                trace!(id, sha = %oid, "cross-reference resolved");
                return Ok(Some(oid.to_string()));
            }
        }

        debug!(id, "cross-reference not found on mainline");
        Ok(None)
    }

    /// First commit reachable from `refname` that is not an ancestor of
    /// mainline, i.e. the commit immediately after the fork point. `None`
    /// when the ref is entirely contained in mainline.
    #[instrument(skip(self))]
    pub fn first_commit_after_fork(
        &self,
        refname: &str,
        mainline: &str,
    ) -> Result<Option<String>> {
        let tip = self.resolve_ref(refname)?;
        let mainline_tip = self.mainline_tip(mainline)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk.push(tip)?;
        revwalk.hide(mainline_tip)?;

        match revwalk.next() {
            Some(oid) => Ok(Some(oid?.to_string())),
            None => Ok(None),
        }
    }

    /// Lower boundary for the commit range between `base` and `compare`.
    ///
    /// When both refs forked from mainline at the same commit the delta is
    /// entirely within compare's branch, so `base` itself is the boundary;
    /// using the shared fork point would pull in unrelated mainline history.
    /// Otherwise the boundary is base's first commit after the fork.
    #[instrument(skip(self))]
    pub fn offset_base(
        &self,
        base: &str,
        compare: &str,
        mainline: &str,
    ) -> Result<String> {
        let base_fork = self.first_commit_after_fork(base, mainline)?;
        let compare_fork = self.first_commit_after_fork(compare, mainline)?;

        match (base_fork, compare_fork) {
            (Some(b), Some(c)) if b != c => {
                debug!(offset = %b, "using base fork point as boundary");
                Ok(b)
            }
            _ => Ok(base.to_string()),
        }
    }
}

/// Cross-reference lookups that can run off the main thread.
///
/// git2 repositories are not Sync, so the resolver owns the repository path
/// and opens a fresh handle per lookup; callers run `resolve` inside
/// blocking tasks.
#[derive(Debug, Clone)]
pub struct MainlineResolver {
    path: PathBuf,
    mainline: String,
}

impl MainlineResolver {
    /// Create a resolver for the repository at `path`
    pub fn new(path: impl AsRef<Path>, mainline: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mainline: mainline.into(),
        }
    }

    /// Resolve a cross-reference id to its canonical mainline sha
    pub fn resolve(&self, id: &str) -> Result<Option<String>> {
        let repo = GitRepo::open(&self.path)?;
        repo.find_by_cross_reference(id, &self.mainline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        repo: Repository,
        path: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let repo = Repository::init(temp.path()).unwrap();
            let path = temp.path().to_path_buf();
            Self {
                _temp: temp,
                repo,
                path,
            }
        }

        fn commit(&self, message: &str) -> git2::Oid {
            let sig = Signature::now("Test", "test@example.com").unwrap();
            let tree_id = self.repo.index().unwrap().write_tree().unwrap();
            let tree = self.repo.find_tree(tree_id).unwrap();
            let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
            let parents: Vec<_> = parent.iter().collect();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
                .unwrap()
        }

        fn name_head(&self, name: &str) {
            let head = self.repo.head().unwrap().peel_to_commit().unwrap();
            self.repo.branch(name, &head, true).unwrap();
        }

        fn checkout(&self, name: &str) {
            self.repo
                .set_head(&format!("refs/heads/{}", name))
                .unwrap();
        }

        fn open(&self) -> GitRepo {
            GitRepo::open(&self.path).unwrap()
        }
    }

    #[test]
    fn test_find_by_cross_reference() {
        let fx = Fixture::new();
        fx.commit("first commit");
        let target = fx.commit("Land feature\n\nDifferential Revision: D12345678");
        fx.commit("unrelated commit");
        fx.name_head("main");

        let repo = fx.open();
        let found = repo.find_by_cross_reference("D12345678", "main").unwrap();
        assert_eq!(found, Some(target.to_string()));

        let missing = repo.find_by_cross_reference("D99999999", "main").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_first_commit_after_fork() {
        let fx = Fixture::new();
        fx.commit("root");
        fx.name_head("main");

        fx.checkout("main");
        fx.name_head("release");
        fx.checkout("release");
        let forked = fx.commit("first on release");
        fx.commit("second on release");

        let repo = fx.open();
        let first = repo.first_commit_after_fork("release", "main").unwrap();
        assert_eq!(first, Some(forked.to_string()));

        // A ref fully contained in mainline has no fork point.
        let none = repo.first_commit_after_fork("main", "main").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_offset_base_same_fork_returns_base() {
        let fx = Fixture::new();
        fx.commit("root");
        fx.name_head("main");

        // base and compare tag the same branch at different depths, so both
        // diverge from mainline at the same commit.
        fx.name_head("branch");
        fx.checkout("branch");
        fx.commit("on branch 1");
        fx.name_head("base-ref");
        fx.commit("on branch 2");
        fx.name_head("compare-ref");

        let repo = fx.open();
        let offset = repo.offset_base("base-ref", "compare-ref", "main").unwrap();
        assert_eq!(offset, "base-ref");
    }

    #[test]
    fn test_offset_base_distinct_forks() {
        let fx = Fixture::new();
        fx.commit("root");
        fx.name_head("main");

        fx.name_head("old-release");
        fx.checkout("old-release");
        let base_fork = fx.commit("old release work");

        fx.checkout("main");
        fx.commit("mainline progress");
        fx.name_head("new-release");
        fx.checkout("new-release");
        fx.commit("new release work");

        let repo = fx.open();
        let offset = repo
            .offset_base("old-release", "new-release", "main")
            .unwrap();
        assert_eq!(offset, base_fork.to_string());
    }

    #[test]
    fn test_mainline_resolver_roundtrip() {
        let fx = Fixture::new();
        let target = fx.commit("Work\n\nDifferential Revision: D1122334");
        fx.name_head("main");

        let resolver = MainlineResolver::new(&fx.path, "main");
        let found = resolver.resolve("D1122334").unwrap();
        assert_eq!(found, Some(target.to_string()));
    }
}
