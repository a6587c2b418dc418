//! Wire types for the GitHub commits endpoint

use serde::Deserialize;

use shiplog_core::Commit;

/// One element of the `/repos/{slug}/commits` listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListedCommit {
    /// Full commit sha
    pub sha: String,
    /// Nested commit detail
    pub commit: CommitDetail,
    /// GitHub account of the author, absent for unlinked emails
    pub author: Option<AccountRef>,
}

/// Nested `commit` object in the listing
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Full commit message
    pub message: String,
}

/// Minimal account reference
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRef {
    /// Account login
    pub login: String,
}

impl From<ListedCommit> for Commit {
    fn from(listed: ListedCommit) -> Self {
        let mut commit = Commit::new(listed.sha, listed.commit.message);
        if let Some(account) = listed.author {
            commit = commit.with_author(account.login);
        }
        commit
    }
}
