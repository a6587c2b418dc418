//! Generation configuration

use std::path::PathBuf;

/// Default cap on concurrently in-flight canonicalization lookups
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Configuration for a single changelog generation run.
///
/// Populated from CLI arguments; there is no config file.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Base ref (lower boundary, exclusive)
    pub base: String,
    /// Compare ref (upper boundary, inclusive)
    pub compare: String,
    /// Path to the local repository working copy
    pub repo: PathBuf,
    /// Path to the existing changelog document, if any
    pub changelog: Option<PathBuf>,
    /// GitHub `owner/name` slug for the commit source and rendered links
    pub github_repo: String,
    /// Access token for the hosting API
    pub token: Option<String>,
    /// Mainline branch searched during canonicalization
    pub mainline: String,
    /// Cap on concurrent canonicalization lookups
    pub max_workers: usize,
    /// Classify internal/Fabric/TurboModules commits instead of dropping them
    pub verbose: bool,
    /// Render entries without the trailing link/author suffix
    pub only_message: bool,
}

impl GenerateConfig {
    /// Create a config for the given ref range with defaults everywhere else
    pub fn new(base: impl Into<String>, compare: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            compare: compare.into(),
            repo: PathBuf::from("."),
            changelog: None,
            github_repo: String::new(),
            token: None,
            mainline: "main".to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            verbose: false,
            only_message: false,
        }
    }

    /// Base URL for rendered commit links
    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}", self.github_repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerateConfig::new("v1.0.0", "v1.1.0");
        assert_eq!(config.max_workers, DEFAULT_MAX_WORKERS);
        assert_eq!(config.mainline, "main");
        assert!(!config.verbose);
    }

    #[test]
    fn test_repo_url() {
        let mut config = GenerateConfig::new("a", "b");
        config.github_repo = "example/app".to_string();
        assert_eq!(config.repo_url(), "https://github.com/example/app");
    }
}
