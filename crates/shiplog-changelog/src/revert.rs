//! Revert resolver
//!
//! Cancels reverted commits against their reverts within the range: revert
//! commits themselves are always dropped, and each one's target description
//! is fuzzy-matched against the remaining subjects so the reverted original
//! is dropped too. Leftover targets are reported, not raised.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use shiplog_core::Commit;

/// Revert indicators, matched case-insensitively against the lowercased
/// subject: a structured `revert D########:` prefix, the bare keyword, or a
/// quoted back-out phrasing.
static REVERT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(revert d\d{8}: |revert\b|back out ".*")"#).expect("Invalid regex")
});

/// A candidate matches a pending target when the edit distance between the
/// two subjects is under the target length divided by this.
const MATCH_DISTANCE_DIVISOR: usize = 2;

/// Split commits into survivors and reverted pairs.
///
/// Returns the surviving subsequence plus the target descriptions that
/// never matched an original (the revert was found, its target was not).
#[instrument(skip(commits), fields(commit_count = commits.len()))]
pub fn resolve_reverts(commits: &[Commit]) -> (Vec<Commit>, Vec<String>) {
    let mut pending: Vec<String> = Vec::new();
    let mut candidates: Vec<&Commit> = Vec::new();

    for commit in commits {
        let subject = commit.subject().to_lowercase();
        match REVERT_PATTERN.find(&subject) {
            Some(found) => {
                let target = subject[found.end()..].trim().to_string();
                // A back-out phrasing can swallow the whole subject; an empty
                // target can never match and would only pad the report.
                if !target.is_empty() {
                    pending.push(target);
                }
            }
            None => candidates.push(commit),
        }
    }

    debug!(
        revert_count = commits.len() - candidates.len(),
        "collected revert targets"
    );

    let mut survivors = Vec::with_capacity(candidates.len());
    for commit in candidates {
        let subject = commit.subject().to_lowercase();
        let matched = pending.iter().position(|target| {
            // Compare in chars: the distance is char-level, and byte length
            // overstates non-ASCII targets.
            levenshtein(&subject, target) * MATCH_DISTANCE_DIVISOR < target.chars().count()
        });

        match matched {
            Some(idx) => {
                // Consumed: at most one original per revert.
                pending.remove(idx);
            }
            None => survivors.push(commit.clone()),
        }
    }

    (survivors, pending)
}

/// Character-level edit distance, two-row dynamic programming.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commits(messages: &[&str]) -> Vec<Commit> {
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| Commit::new(format!("sha{}", i), *m))
            .collect()
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_revert_and_original_both_excluded() {
        let input = commits(&["Revert D123: Fix bug", "Fix bug", "Unrelated work"]);
        let (survivors, unresolved) = resolve_reverts(&input);

        let subjects: Vec<_> = survivors.iter().map(|c| c.subject()).collect();
        assert_eq!(subjects, vec!["Unrelated work"]);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_unmatched_revert_is_reported() {
        let input = commits(&["Revert D123: Fix bug"]);
        let (survivors, unresolved) = resolve_reverts(&input);

        assert!(survivors.is_empty());
        assert_eq!(unresolved.len(), 1);
        assert!(unresolved[0].contains("fix bug"));
    }

    #[test]
    fn test_structured_revert_prefix() {
        let input = commits(&[
            "Revert D12345678: Add new bridging header",
            "Add new bridging header",
        ]);
        let (survivors, unresolved) = resolve_reverts(&input);

        assert!(survivors.is_empty());
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_match_consumed_once() {
        // Two near-identical commits; only one is cancelled by the revert.
        let input = commits(&["Revert D123: Fix bug", "Fix bug", "Fix bugs"]);
        let (survivors, unresolved) = resolve_reverts(&input);

        assert_eq!(survivors.len(), 1);
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_back_out_phrasing_is_dropped() {
        let input = commits(&[r#"Back out "Enable new renderer""#, "Keep me"]);
        let (survivors, _unresolved) = resolve_reverts(&input);

        let subjects: Vec<_> = survivors.iter().map(|c| c.subject()).collect();
        assert_eq!(subjects, vec!["Keep me"]);
    }

    #[test]
    fn test_threshold_counts_chars_not_bytes() {
        // The target is five chars but ten bytes; a byte-length threshold
        // would accept a subject three edits away, a char count must not.
        let input = commits(&["Revert D12345678: ééééé", "ééx"]);
        let (survivors, unresolved) = resolve_reverts(&input);

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].subject(), "ééx");
        assert_eq!(unresolved, vec!["ééééé"]);
    }

    #[test]
    fn test_distance_threshold_rejects_distant_subjects() {
        let input = commits(&["Revert D123: Fix scroll view bug", "Completely different"]);
        let (survivors, unresolved) = resolve_reverts(&input);

        assert_eq!(survivors.len(), 1);
        assert_eq!(unresolved.len(), 1);
    }
}
