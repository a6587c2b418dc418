//! Git repository operations

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{info, instrument};

use shiplog_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Names tried when locating the mainline branch
const MAINLINE_CANDIDATES: [&str; 2] = ["main", "master"];

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at the given path
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound(path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        info!(start_path = %start_path.display(), "discovering git repository");
        let repo = Repository::discover(start_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::NotARepository(start_path.to_path_buf())
            } else {
                GitError::OpenFailed(e.to_string())
            }
        })?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a ref name to its commit id
    pub fn resolve_ref(&self, name: &str) -> Result<git2::Oid> {
        self.repo
            .revparse_single(name)
            .and_then(|obj| obj.peel_to_commit())
            .map(|c| c.id())
            .map_err(|_| GitError::RefNotFound(name.to_string()))
    }

    /// Tip commit of the named mainline branch, or the first candidate that
    /// exists when `preferred` is absent
    pub fn mainline_tip(&self, preferred: &str) -> Result<git2::Oid> {
        let mut tried = Vec::new();
        for name in std::iter::once(preferred)
            .chain(MAINLINE_CANDIDATES.iter().copied())
        {
            if tried.contains(&name) {
                continue;
            }
            tried.push(name);
            if let Ok(branch) = self.repo.find_branch(name, git2::BranchType::Local) {
                if let Some(oid) = branch.get().target() {
                    return Ok(oid);
                }
            }
        }
        Err(GitError::MainlineNotFound(tried.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        (temp, repo)
    }

    fn commit_on_head(repo: &Repository, message: &str) -> git2::Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_open_repo() {
        let (_temp, _repo) = init_repo();
    }

    #[test]
    fn test_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let result = GitRepo::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let subdir = temp.path().join("sub").join("dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let repo = GitRepo::discover(&subdir).unwrap();
        let repo_path = repo.path().canonicalize().unwrap();
        let temp_path = temp.path().canonicalize().unwrap();
        assert_eq!(repo_path, temp_path);
    }

    #[test]
    fn test_mainline_tip_falls_back() {
        let (temp, repo) = init_repo();
        let oid = commit_on_head(&repo.repo, "initial");
        // The default branch name depends on the git config; rename to master
        // to exercise the fallback path.
        let head = repo.repo.head().unwrap();
        let branch_name = head.shorthand().unwrap().to_string();
        if branch_name != "master" {
            repo.repo
                .find_branch(&branch_name, git2::BranchType::Local)
                .unwrap()
                .rename("master", true)
                .unwrap();
        }
        drop(head);

        let reopened = GitRepo::open(temp.path()).unwrap();
        assert_eq!(reopened.mainline_tip("main").unwrap(), oid);
    }
}
