//! Shiplog GitHub - Commit source backed by the GitHub REST API
//!
//! Fetches the commit listing between two refs by paginating the repository
//! commits endpoint until the base boundary commit is seen.

mod client;
mod types;

pub use client::{GitHubClient, MAX_PAGES, PER_PAGE};
pub use types::ListedCommit;
