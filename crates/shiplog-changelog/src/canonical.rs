//! Canonicalizer
//!
//! Maps commits to their canonical mainline form: a commit carrying a
//! `Differential Revision` cross-reference is looked up on mainline and, when
//! found, replaced by a commit with the resolved sha and the original
//! message and author. Lookups fan out with a hard concurrency cap; output
//! order always matches input order.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use shiplog_core::error::GitError;
use shiplog_core::Commit;
use shiplog_git::MainlineResolver;

/// Cross-reference line embedded by the internal review system
static CROSS_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Differential Revision:\s*(D\d+)").expect("Invalid regex"));

/// Extract the cross-reference id from a commit message, if present
pub fn cross_reference(commit: &Commit) -> Option<String> {
    CROSS_REF_REGEX
        .captures(&commit.message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Searches mainline history for the commit carrying a cross-reference id
pub trait CrossRefResolver: Send + Sync {
    /// Canonical sha for the id, or `None` when mainline has no match
    fn resolve(&self, id: &str) -> Result<Option<String>, GitError>;
}

impl CrossRefResolver for MainlineResolver {
    fn resolve(&self, id: &str) -> Result<Option<String>, GitError> {
        MainlineResolver::resolve(self, id)
    }
}

/// Result of canonicalizing one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalOutcome {
    /// The cross-reference resolved; the commit now carries the mainline sha
    Resolved(Commit),
    /// No cross-reference, a failed lookup, or no mainline match; the
    /// original commit is kept and the chased id (if any) is reported
    Unresolved(Commit, Option<String>),
}

impl CanonicalOutcome {
    /// The commit that continues through the pipeline
    pub fn into_commit(self) -> Commit {
        match self {
            Self::Resolved(commit) | Self::Unresolved(commit, _) => commit,
        }
    }
}

/// Canonicalize a single commit against the given resolver.
///
/// Lookup failures degrade to [`CanonicalOutcome::Unresolved`]; they never
/// abort the caller.
pub fn canonicalize_commit<R: CrossRefResolver + ?Sized>(
    commit: Commit,
    resolver: &R,
) -> CanonicalOutcome {
    let Some(id) = cross_reference(&commit) else {
        return CanonicalOutcome::Unresolved(commit, None);
    };

    match resolver.resolve(&id) {
        Ok(Some(sha)) => {
            let canonical = commit.with_sha(sha);
            CanonicalOutcome::Resolved(canonical)
        }
        Ok(None) => CanonicalOutcome::Unresolved(commit, Some(id)),
        Err(err) => {
            warn!(id, %err, "cross-reference lookup failed");
            CanonicalOutcome::Unresolved(commit, Some(id))
        }
    }
}

/// Canonicalized batch: commits in input order plus the ids that could not
/// be resolved
#[derive(Debug)]
pub struct Canonicalized {
    /// Commits in their original order, canonical where resolution succeeded
    pub commits: Vec<Commit>,
    /// Cross-reference ids that were chased but never found
    pub unresolved: Vec<String>,
}

/// Canonicalize a batch with at most `max_workers` lookups in flight.
///
/// Each lookup is blocking git work, so it runs on the blocking pool behind
/// a semaphore permit acquired before spawning.
#[instrument(skip(commits, resolver), fields(commit_count = commits.len()))]
pub async fn canonicalize<R: CrossRefResolver + ?Sized + 'static>(
    commits: Vec<Commit>,
    resolver: Arc<R>,
    max_workers: usize,
) -> Canonicalized {
    let total = commits.len();
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut handles = Vec::with_capacity(total);

    for (idx, commit) in commits.into_iter().enumerate() {
        // Commits without a cross-reference need no lookup and no permit.
        if cross_reference(&commit).is_none() {
            handles.push(Job::Immediate(idx, commit));
            continue;
        }

        let permit = semaphore.clone().acquire_owned().await.unwrap();
        let resolver = Arc::clone(&resolver);
        // The original commit stays on this side of the spawn so a crashed
        // task still degrades to unresolved instead of losing the entry.
        let fallback = commit.clone();
        handles.push(Job::Spawned {
            idx,
            fallback,
            handle: tokio::task::spawn_blocking(move || {
                let outcome = canonicalize_commit(commit, resolver.as_ref());
                drop(permit);
                outcome
            }),
        });
    }

    let mut slots: Vec<Option<Commit>> = (0..total).map(|_| None).collect();
    let mut failed: Vec<(usize, String)> = Vec::new();

    for job in handles {
        match job {
            Job::Immediate(idx, commit) => slots[idx] = Some(commit),
            Job::Spawned {
                idx,
                fallback,
                handle,
            } => match handle.await {
                Ok(outcome) => {
                    if let CanonicalOutcome::Unresolved(_, Some(id)) = &outcome {
                        failed.push((idx, id.clone()));
                    }
                    slots[idx] = Some(outcome.into_commit());
                }
                Err(err) => {
                    warn!(%err, "canonicalization task failed");
                    if let Some(id) = cross_reference(&fallback) {
                        failed.push((idx, id));
                    }
                    slots[idx] = Some(fallback);
                }
            },
        }
    }

    failed.sort_by_key(|(idx, _)| *idx);

    let canonicalized = Canonicalized {
        commits: slots.into_iter().flatten().collect(),
        unresolved: failed.into_iter().map(|(_, id)| id).collect(),
    };

    debug!(
        resolved = canonicalized.commits.len(),
        unresolved = canonicalized.unresolved.len(),
        "canonicalization batch complete"
    );
    canonicalized
}

enum Job {
    Immediate(usize, Commit),
    Spawned {
        idx: usize,
        fallback: Commit,
        handle: tokio::task::JoinHandle<CanonicalOutcome>,
    },
}
