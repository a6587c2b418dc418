//! Noise and already-published filters
//!
//! Both are pure, order-preserving subsequence filters with no reporting.

use tracing::debug;

use shiplog_core::Commit;

/// Case-insensitive markers for infrastructure commits that never describe
/// product behavior
const NOISE_MARKERS: [&str; 5] = [
    "circleci",
    "circle ci",
    "travis",
    "bump version numbers",
    "docker",
];

/// Drop commits whose message mentions CI services, automated version
/// bumps, or container tooling.
pub fn filter_noise(commits: &[Commit]) -> Vec<Commit> {
    let kept: Vec<Commit> = commits
        .iter()
        .filter(|commit| {
            let text = commit.message.to_lowercase();
            !NOISE_MARKERS.iter().any(|marker| text.contains(marker))
        })
        .cloned()
        .collect();

    debug!(
        dropped = commits.len() - kept.len(),
        kept = kept.len(),
        "noise filter applied"
    );
    kept
}

/// Drop commits whose sha already appears anywhere in the existing
/// changelog text. A plain substring check: the document is not parsed.
pub fn filter_published(existing: &str, commits: &[Commit]) -> Vec<Commit> {
    let kept: Vec<Commit> = commits
        .iter()
        .filter(|commit| !existing.contains(&commit.sha))
        .cloned()
        .collect();

    debug!(
        dropped = commits.len() - kept.len(),
        kept = kept.len(),
        "already-published filter applied"
    );
    kept
}
