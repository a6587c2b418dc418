//! Paginated commit listing client

use reqwest::Client;
use tracing::{debug, instrument};

use shiplog_core::error::SourceError;
use shiplog_core::Commit;

use crate::types::ListedCommit;

/// Commits fetched per page
pub const PER_PAGE: usize = 100;

/// Safety cap on pages walked while looking for the base commit. The listing
/// is unbounded on the server side; without a cap an unexpected response
/// shape would loop forever.
pub const MAX_PAGES: usize = 50;

const API_ROOT: &str = "https://api.github.com";

/// Result type for commit source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Client for the GitHub repository commits endpoint
pub struct GitHubClient {
    client: Client,
    api_root: String,
    repo_slug: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `owner/name`, optionally authenticated
    pub fn new(repo_slug: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_root: API_ROOT.to_string(),
            repo_slug: repo_slug.into(),
            token,
        }
    }

    /// Override the API root (used by tests against a local server)
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }

    /// Fetch the commits reachable from `compare`, newest first, stopping
    /// at (and excluding) the first commit whose sha starts with `base`.
    ///
    /// Fails with [`SourceError::BaseNotFound`] when the listing is
    /// exhausted, or the page cap is hit, without seeing the boundary.
    #[instrument(skip(self), fields(repo = %self.repo_slug))]
    pub async fn fetch_commits(&self, base: &str, compare: &str) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();

        for page in 1..=MAX_PAGES {
            let listing = self.fetch_page(compare, page).await?;
            let page_len = listing.len();
            debug!(page, count = page_len, "fetched commit page");

            if take_until_base(listing, base, &mut commits) {
                return Ok(commits);
            }

            // A short page means the history ran out.
            if page_len < PER_PAGE {
                return Err(SourceError::BaseNotFound {
                    base: base.to_string(),
                    pages: page,
                });
            }
        }

        Err(SourceError::BaseNotFound {
            base: base.to_string(),
            pages: MAX_PAGES,
        })
    }

    async fn fetch_page(&self, compare: &str, page: usize) -> Result<Vec<ListedCommit>> {
        let url = format!("{}/repos/{}/commits", self.api_root, self.repo_slug);

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("sha", compare),
                ("page", &page.to_string()),
                ("per_page", &PER_PAGE.to_string()),
            ])
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "shiplog");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Append listed commits to `out` until one matching `base` is seen.
/// Returns true when the boundary was found; the boundary commit itself is
/// not appended.
fn take_until_base(listing: Vec<ListedCommit>, base: &str, out: &mut Vec<Commit>) -> bool {
    for listed in listing {
        if listed.sha.starts_with(base) {
            return true;
        }
        out.push(listed.into());
    }
    false
}
