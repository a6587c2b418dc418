//! Generate command

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use tracing::info;

use shiplog_changelog::ChangelogGenerator;
use shiplog_core::config::DEFAULT_MAX_WORKERS;
use shiplog_core::{ChangelogError, GenerateConfig};
use shiplog_git::{GitRepo, MainlineResolver};
use shiplog_github::GitHubClient;

use crate::cli::{Cli, OutputFormat};

/// Generate a categorized changelog between two refs
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Base ref: the lower boundary of the range (exclusive)
    #[arg(long)]
    pub base: String,

    /// Compare ref: the upper boundary of the range (inclusive)
    #[arg(long)]
    pub compare: String,

    /// Path to the local repository working copy
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Existing changelog file; commits already listed there are skipped
    #[arg(long)]
    pub changelog: Option<PathBuf>,

    /// GitHub repository slug (owner/name) used as the commit source
    #[arg(long = "github-repo")]
    pub github_repo: String,

    /// Access token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN")]
    pub token: Option<String>,

    /// Mainline branch searched during canonicalization
    #[arg(long, default_value = "main")]
    pub mainline: String,

    /// Cap on concurrent canonicalization lookups
    #[arg(long = "max-workers", default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Render entries without the trailing link/author suffix
    #[arg(long = "only-message")]
    pub only_message: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = self.to_config(cli);
        info!(
            base = %config.base,
            compare = %config.compare,
            repo = %config.repo.display(),
            "executing generate command"
        );

        let repo = GitRepo::discover(&config.repo)?;

        let offset = repo.offset_base(&config.base, &config.compare, &config.mainline)?;
        let boundary = repo.resolve_ref(&offset)?.to_string();

        let client = GitHubClient::new(&config.github_repo, config.token.clone());
        let commits = client.fetch_commits(&boundary, &config.compare).await?;

        let existing = self.read_existing()?;

        let generator = ChangelogGenerator::new(&config);
        let resolver = Arc::new(MainlineResolver::new(repo.path(), &config.mainline));
        let (taxonomy, report) = generator.generate(commits, &existing, resolver).await;

        if !cli.quiet {
            print_report(&report);
        }

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&taxonomy)?);
            }
            OutputFormat::Text => {
                println!("{}", generator.format(&taxonomy, &config.compare));
            }
        }

        Ok(())
    }

    fn to_config(&self, cli: &Cli) -> GenerateConfig {
        let mut config = GenerateConfig::new(&self.base, &self.compare);
        config.repo = self.repo.clone();
        config.changelog = self.changelog.clone();
        config.github_repo = self.github_repo.clone();
        config.token = self.token.clone();
        config.mainline = self.mainline.clone();
        config.max_workers = self.max_workers;
        config.verbose = cli.verbose;
        config.only_message = self.only_message;
        config
    }

    /// Text of the previously published changelog; an unset path or a file
    /// that does not exist yet reads as empty.
    fn read_existing(&self) -> anyhow::Result<String> {
        match &self.changelog {
            Some(path) if path.exists() => {
                std::fs::read_to_string(path).map_err(|e| {
                    ChangelogError::ReadFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
            _ => Ok(String::new()),
        }
    }
}

/// Surface the recoverable conditions collected during triage.
fn print_report(report: &shiplog_changelog::TriageReport) {
    for target in &report.unresolved_reverts {
        eprintln!(
            "{} could not find the original commit for revert target {:?}",
            style("warning:").yellow().bold(),
            target
        );
    }

    if !report.unresolved_revisions.is_empty() {
        eprintln!(
            "{} {} commit(s) could not be resolved to mainline: {}",
            style("warning:").yellow().bold(),
            report.unresolved_revisions.len(),
            report.unresolved_revisions.join(", ")
        );
    }

    if !report.off_template.is_empty() {
        eprintln!(
            "{} {} commit(s) without changelog markers, classified best-effort: {}",
            style("warning:").yellow().bold(),
            report.off_template.len(),
            report.off_template.join(", ")
        );
    }
}
