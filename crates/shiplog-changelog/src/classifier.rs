//! Commit classifier
//!
//! Extracts a change type, platform category, and rendered message from each
//! commit. Classification is deterministic pattern matching over the commit
//! message; the type and platform rules are ordered tables so the priority
//! order is data, not control flow.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use shiplog_core::Commit;

use crate::types::{ChangeCategory, ChangeTaxonomy, ChangeType};

/// A line carrying one or more bracketed tags from the classification
/// vocabulary, e.g. `[General] [Added]`
static CHANGELOG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\[(breaking|added|changed|deprecated|removed|fixed|security|unknown|android|ios|general|internal)\]\s*)+",
    )
    .expect("Invalid regex")
});

/// Explicit platform tag, used to pick the display line
static PLATFORM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(ios|android|general)\]").expect("Invalid regex"));

/// Leading tag run to strip from the display line, optionally preceded by a
/// `changelog:` label
static TAG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*((changelog:\s*)?(\[\w+\]\s*)+)").expect("Invalid regex")
});

/// Trailing pull-request-number suffix, e.g. ` (#42)`
static PR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(#\d+\)$").expect("Invalid regex"));

/// Standalone TurboModules tag
static TM_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btm\b").expect("Invalid regex"));

/// Explicit internal tag
static INTERNAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[internal\]").expect("Invalid regex"));

/// Change-type keywords in detection priority order. First match wins;
/// reordering changes the outcome for messages with several keywords.
static TYPE_RULES: LazyLock<Vec<(Regex, ChangeType)>> = LazyLock::new(|| {
    [
        ("breaking", ChangeType::Breaking),
        ("added", ChangeType::Added),
        ("changed", ChangeType::Changed),
        ("fixed", ChangeType::Fixed),
        ("removed", ChangeType::Removed),
        ("deprecated", ChangeType::Deprecated),
        ("security", ChangeType::Security),
    ]
    .iter()
    .map(|(keyword, change_type)| {
        (
            Regex::new(&format!(r"(?i)\b{}\b", keyword)).expect("Invalid regex"),
            *change_type,
        )
    })
    .collect()
});

/// A platform detection rule: keywords that claim the platform, and the
/// explicit tags that veto the claim
struct PlatformRule {
    keywords: Regex,
    veto_tags: Regex,
    category: ChangeCategory,
}

/// Platform rules in priority order; general is the fallback
static PLATFORM_RULES: LazyLock<Vec<PlatformRule>> = LazyLock::new(|| {
    vec![
        PlatformRule {
            keywords: Regex::new(r"(?i)\b(android|java)\b").expect("Invalid regex"),
            veto_tags: Regex::new(r"(?i)\[(ios|general)\]").expect("Invalid regex"),
            category: ChangeCategory::Android,
        },
        PlatformRule {
            keywords: Regex::new(
                r"(?i)(\b(ios|xcode|swift|objective-?c|iphone|ipad|tvos)\b|\brct)",
            )
            .expect("Invalid regex"),
            veto_tags: Regex::new(r"(?i)\[(android|general)\]").expect("Invalid regex"),
            category: ChangeCategory::Ios,
        },
    ]
});

/// Change type for a classification input; first matching keyword wins
pub fn change_type(input: &str) -> ChangeType {
    TYPE_RULES
        .iter()
        .find(|(regex, _)| regex.is_match(input))
        .map(|(_, change_type)| *change_type)
        .unwrap_or(ChangeType::Unknown)
}

/// Platform category for a classification input. Mutually exclusive by
/// construction: the first rule whose keywords match without a veto tag
/// wins, and general is the fallback.
pub fn change_category(input: &str) -> ChangeCategory {
    PLATFORM_RULES
        .iter()
        .find(|rule| rule.keywords.is_match(input) && !rule.veto_tags.is_match(input))
        .map(|rule| rule.category)
        .unwrap_or(ChangeCategory::General)
}

/// True when the commit is dropped without reporting in non-verbose runs
fn is_hidden(input: &str) -> bool {
    input.to_lowercase().contains("fabric")
        || TM_WORD.is_match(input)
        || INTERNAL_TAG.is_match(input)
}

/// Classifier output: the populated taxonomy plus the shas of commits whose
/// message lacked the expected bracketed markers
#[derive(Debug)]
pub struct ClassifierOutput {
    /// The terminal artifact of the pipeline
    pub taxonomy: ChangeTaxonomy,
    /// Off-template commit shas, for reporting only
    pub off_template: Vec<String>,
}

/// Commit classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    repo_url: String,
    verbose: bool,
    only_message: bool,
}

impl Classifier {
    /// Create a classifier rendering links against the given repository URL
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            verbose: false,
            only_message: false,
        }
    }

    /// Classify internal/Fabric/TurboModules commits instead of dropping them
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Render entries without the link/author suffix
    pub fn only_message(mut self, only_message: bool) -> Self {
        self.only_message = only_message;
        self
    }

    /// Classify a commit sequence into a fresh taxonomy
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn classify(&self, commits: &[Commit]) -> ClassifierOutput {
        let mut taxonomy = ChangeTaxonomy::new();
        let mut off_template = Vec::new();

        for commit in commits {
            let input = match commit.message.lines().find(|l| CHANGELOG_LINE.is_match(l)) {
                Some(line) => line.to_string(),
                None => {
                    off_template.push(commit.sha.clone());
                    commit.message.clone()
                }
            };

            if !self.verbose && is_hidden(&input) {
                trace!(sha = %commit.sha, "dropping internal commit");
                continue;
            }

            let change_type = change_type(&input);
            let category = change_category(&input);
            taxonomy.append(change_type, category, self.display_message(commit));
        }

        debug!(
            entries = taxonomy.len(),
            off_template = off_template.len(),
            "classification complete"
        );

        ClassifierOutput {
            taxonomy,
            off_template,
        }
    }

    /// Human-readable entry for a commit: the tagged line stripped of its
    /// markers, plus a link/author suffix unless only-message mode is on
    fn display_message(&self, commit: &Commit) -> String {
        let lines: Vec<&str> = commit.message.lines().collect();
        let entry = lines
            .iter()
            .rev()
            .find(|line| PLATFORM_TAG.is_match(line))
            .or(lines.first())
            .copied()
            .unwrap_or("");

        let entry = TAG_PREFIX.replace(entry, "");
        let entry = PR_SUFFIX.replace(&entry, "");
        let entry = capitalize_first(entry.trim());

        if self.only_message {
            return entry;
        }

        let mut rendered = format!(
            "{} ([{}]({}/commit/{})",
            entry,
            commit.short_sha(),
            self.repo_url,
            commit.sha
        );
        if let Some(login) = &commit.author {
            rendered.push_str(&format!(
                " by [@{}](https://github.com/{})",
                login, login
            ));
        }
        rendered.push(')');
        rendered
    }
}

/// Uppercase the first letter when it is lowercase
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => s.to_string(),
    }
}
