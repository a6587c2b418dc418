//! Shiplog Core - Shared types for changelog generation
//!
//! This crate provides the commit data model, generation configuration,
//! and the error hierarchy used across the shiplog crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::GenerateConfig;
pub use error::{ChangelogError, GitError, Result, ShiplogError, SourceError};
pub use types::Commit;
