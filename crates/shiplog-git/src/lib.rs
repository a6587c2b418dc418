//! Shiplog Git - Local git operations for changelog generation
//!
//! This crate wraps git2 for the two local-history questions the pipeline
//! asks: "which mainline commit carries this review cross-reference?" and
//! "where did this ref fork off mainline?".

mod crossref;
mod repository;

pub use crossref::MainlineResolver;
pub use repository::{GitRepo, Result};
