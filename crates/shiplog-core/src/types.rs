//! Commit data model

use serde::{Deserialize, Serialize};

/// A single commit as seen by the triage pipeline.
///
/// Commits are never mutated; canonicalization replaces a commit with a new
/// value carrying the resolved sha and the original message and author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit hash
    pub sha: String,
    /// Full commit message; the first line is the subject
    pub message: String,
    /// Author login, when known
    pub author: Option<String>,
}

impl Commit {
    /// Create a new Commit
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
            author: None,
        }
    }

    /// Set the author login
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// First line of the commit message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// First 10 characters of the hash, for rendered links
    pub fn short_sha(&self) -> &str {
        let end = self.sha.len().min(10);
        &self.sha[..end]
    }

    /// A copy of this commit under a different (canonical) sha
    pub fn with_sha(&self, sha: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: self.message.clone(),
            author: self.author.clone(),
        }
    }
}
