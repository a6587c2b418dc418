//! Changelog formatters

mod markdown;

pub use markdown::MarkdownFormatter;

use crate::types::ChangeTaxonomy;

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Render a taxonomy under the given version label
    fn format(&self, taxonomy: &ChangeTaxonomy, version: &str) -> String;

    /// File extension for this format
    fn extension(&self) -> &'static str;
}
