//! Shiplog Changelog - Commit triage and changelog rendering
//!
//! This crate turns a raw commit listing into a categorized changelog: it
//! drops infrastructure noise, cancels reverted commits against their
//! reverts, swaps commits for their canonical mainline form, skips commits
//! already published, and classifies the survivors into a change-type by
//! platform taxonomy.

pub mod canonical;
pub mod classifier;
pub mod filters;
pub mod formatter;
pub mod generator;
pub mod revert;
pub mod types;

pub use canonical::{CanonicalOutcome, CrossRefResolver};
pub use classifier::Classifier;
pub use formatter::{ChangelogFormatter, MarkdownFormatter};
pub use generator::{ChangelogGenerator, TriageReport};
pub use types::{ChangeCategory, ChangeTaxonomy, ChangeType};
