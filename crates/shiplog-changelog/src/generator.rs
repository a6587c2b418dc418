//! Pipeline orchestrator
//!
//! Runs the triage stages in order: noise filter, revert resolver,
//! canonicalizer, already-published filter, classifier. Recoverable
//! conditions accumulate into a [`TriageReport`]; fatal errors never arise
//! past the commit source, so generation itself is infallible.

use std::sync::Arc;

use tracing::{info, instrument};

use shiplog_core::{Commit, GenerateConfig};

use crate::canonical::{self, CrossRefResolver};
use crate::classifier::Classifier;
use crate::filters;
use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::revert;
use crate::types::ChangeTaxonomy;

/// Recoverable conditions collected across the pipeline stages. Surfaced
/// once by the caller, never raised as errors.
#[derive(Debug, Default)]
pub struct TriageReport {
    /// Revert target descriptions whose original commit was not found
    pub unresolved_reverts: Vec<String>,
    /// Cross-reference ids that did not resolve to a mainline commit
    pub unresolved_revisions: Vec<String>,
    /// Shas of commits without the expected bracketed changelog markers
    pub off_template: Vec<String>,
}

impl TriageReport {
    /// Whether there is anything to report
    pub fn is_empty(&self) -> bool {
        self.unresolved_reverts.is_empty()
            && self.unresolved_revisions.is_empty()
            && self.off_template.is_empty()
    }
}

/// Changelog generator
pub struct ChangelogGenerator {
    classifier: Classifier,
    formatter: Box<dyn ChangelogFormatter>,
    max_workers: usize,
}

impl ChangelogGenerator {
    /// Create a generator from a run configuration
    pub fn new(config: &GenerateConfig) -> Self {
        Self {
            classifier: Classifier::new(config.repo_url())
                .verbose(config.verbose)
                .only_message(config.only_message),
            formatter: Box::new(MarkdownFormatter::new()),
            max_workers: config.max_workers,
        }
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Run the full triage pipeline over a fetched commit sequence.
    ///
    /// `existing` is the text of the previously published changelog; commits
    /// whose sha already appears there are skipped.
    #[instrument(skip_all, fields(commit_count = commits.len()))]
    pub async fn generate<R: CrossRefResolver + ?Sized + 'static>(
        &self,
        commits: Vec<Commit>,
        existing: &str,
        resolver: Arc<R>,
    ) -> (ChangeTaxonomy, TriageReport) {
        let mut report = TriageReport::default();

        let commits = filters::filter_noise(&commits);

        let (commits, unresolved_reverts) = revert::resolve_reverts(&commits);
        report.unresolved_reverts = unresolved_reverts;

        let batch = canonical::canonicalize(commits, resolver, self.max_workers).await;
        report.unresolved_revisions = batch.unresolved;

        let commits = filters::filter_published(existing, &batch.commits);

        let output = self.classifier.classify(&commits);
        report.off_template = output.off_template;

        info!(
            entries = output.taxonomy.len(),
            unresolved_reverts = report.unresolved_reverts.len(),
            unresolved_revisions = report.unresolved_revisions.len(),
            off_template = report.off_template.len(),
            "changelog generated"
        );

        (output.taxonomy, report)
    }

    /// Render a taxonomy to the configured format
    pub fn format(&self, taxonomy: &ChangeTaxonomy, version: &str) -> String {
        self.formatter.format(taxonomy, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CrossRefResolver;
    use crate::types::ChangeType;
    use shiplog_core::error::GitError;

    struct NoneResolver;

    impl CrossRefResolver for NoneResolver {
        fn resolve(&self, _id: &str) -> Result<Option<String>, GitError> {
            Ok(None)
        }
    }

    fn config() -> GenerateConfig {
        let mut config = GenerateConfig::new("v1.0.0", "v1.1.0");
        config.github_repo = "example/app".to_string();
        config.only_message = true;
        config
    }

    #[tokio::test]
    async fn test_end_to_end_single_entry() {
        let generator = ChangelogGenerator::new(&config());
        let commits = vec![
            Commit::new("noise1", "Update CircleCI workflow"),
            Commit::new("rev1", "Revert D123: Tweak scroll physics"),
            Commit::new("orig1", "Tweak scroll physics"),
            Commit::new(
                "keep1",
                "[General][Added] X\n\nDifferential Revision: D11111111",
            ),
        ];

        let (taxonomy, report) = generator
            .generate(commits, "", Arc::new(NoneResolver))
            .await;

        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.get(ChangeType::Added).general, vec!["X"]);
        for change_type in ChangeType::ALL {
            if change_type != ChangeType::Added {
                assert!(taxonomy.get(change_type).is_empty());
            }
        }

        assert!(report.unresolved_reverts.is_empty());
        assert_eq!(report.unresolved_revisions, vec!["D11111111"]);
    }

    #[tokio::test]
    async fn test_published_commits_are_skipped() {
        let generator = ChangelogGenerator::new(&config());
        let commits = vec![
            Commit::new("published1", "[General][Added] Old feature"),
            Commit::new("fresh1", "[General][Added] New feature"),
        ];

        let existing = "## v1.0.0\n- Old feature (published1)\n";
        let (taxonomy, _report) = generator
            .generate(commits, existing, Arc::new(NoneResolver))
            .await;

        assert_eq!(taxonomy.get(ChangeType::Added).general, vec!["New feature"]);
    }

    #[tokio::test]
    async fn test_format_renders_version_label() {
        let generator = ChangelogGenerator::new(&config());
        let (taxonomy, _) = generator
            .generate(
                vec![Commit::new("a", "[iOS][Fixed] Fix modal layout")],
                "",
                Arc::new(NoneResolver),
            )
            .await;

        let document = generator.format(&taxonomy, "v1.1.0");
        assert!(document.starts_with("## v1.1.0"));
        assert!(document.contains("- Fix modal layout"));
    }
}
